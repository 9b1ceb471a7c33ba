//! Gemini Chat Backend Library
//!
//! Session controller, configuration and API client shared by the desktop
//! front-end and the `chat_smoke` utility.

pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod gemini;

pub use chat::{ChatSession, SubmitOutcome};
pub use config::{ChatConfig, ChatVariant};
pub use error::ChatError;
pub use gemini::{GeminiClient, GenerationBackend};
