//! Chat data models
//!
//! Defines the message type held in a session transcript.

use chrono::Local;

use crate::constants::TIMESTAMP_FORMAT;
use crate::gemini::types::{Content, TurnRole};

/// Sequential message identifier within one session
pub type MessageId = u64;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
}

impl MessageRole {
    /// Role in the API's vocabulary
    pub fn turn_role(&self) -> TurnRole {
        match self {
            MessageRole::User => TurnRole::User,
            MessageRole::Assistant => TurnRole::Model,
        }
    }
}

/// Delivery state of a user message (persona variant only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Request in flight
    Pending,
    /// API answered
    Delivered,
    /// Request failed
    Failed,
}

/// A single message in the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Position-independent id, assigned by the session
    pub id: MessageId,
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub text: String,
    /// Wall-clock time at creation, already formatted for display
    pub timestamp: Option<String>,
    /// Delivery state, only set on user messages that track it
    pub delivery_status: Option<DeliveryStatus>,
}

impl Message {
    /// Create a new message with no presentation metadata
    pub fn new(id: MessageId, role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            timestamp: None,
            delivery_status: None,
        }
    }

    /// Stamp the message with the current local time
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Local::now().format(TIMESTAMP_FORMAT).to_string());
        self
    }

    /// Attach a delivery status
    pub fn with_status(mut self, status: DeliveryStatus) -> Self {
        self.delivery_status = Some(status);
        self
    }

    /// Whether this message was written by the user
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Map to an API turn
    pub fn to_turn(&self) -> Content {
        Content::text(self.role.turn_role(), self.text.clone())
    }
}
