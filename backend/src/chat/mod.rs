//! Chat module
//!
//! Holds the transcript model and the session controller that drives one
//! conversation against the generation API.

pub mod models;
pub mod session;

pub use models::{DeliveryStatus, Message, MessageId, MessageRole};
pub use session::{ChatSession, PendingTurn, RejectReason, SessionView, SubmitOutcome};
