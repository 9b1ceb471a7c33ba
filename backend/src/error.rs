//! Error types and error handling for the chat backend
//!
//! Every failure a chat turn can hit is represented by [`ChatError`]. The
//! session controller turns these into the error banner and the fallback
//! transcript entry; nothing here is retried.

use thiserror::Error;

/// Errors that can occur while configuring or running a chat turn
#[derive(Error, Debug)]
pub enum ChatError {
    /// No API key was configured, so no request can be made
    #[error("API key is empty")]
    EmptyApiKey,

    /// Configuration value is out of range or missing
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The API answered with a non-2xx status
    #[error("API Error: {status} - {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Server-provided error message (or "Unknown error")
        message: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, connection reset...)
    ///
    /// The URL is stripped on conversion since it carries the API key.
    #[error("Network error: {0}")]
    Transport(reqwest::Error),

    /// The API answered 2xx but the body could not be decoded
    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    /// The task running the request went away before reporting a result
    #[error("Request was interrupted before a response arrived")]
    Interrupted,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Transport(e.without_url())
    }
}

impl ChatError {
    /// HTTP status attached to this error, if the API produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
