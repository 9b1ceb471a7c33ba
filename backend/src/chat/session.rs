//! Chat session controller
//!
//! Owns the transcript of one conversation and runs submissions through a
//! [`GenerationBackend`]. All mutation goes through `&mut self`, so the
//! controller lives on whatever thread drives the UI; only the network call
//! may run elsewhere.
//!
//! A submission can be driven in one go with [`ChatSession::submit`], or in
//! two halves with [`ChatSession::begin_submit`] and
//! [`ChatSession::complete_submit`] when the caller runs the request on a
//! separate task and reports back later.

use tracing::{debug, info, warn};

use crate::chat::models::{DeliveryStatus, Message, MessageId, MessageRole};
use crate::config::ChatConfig;
use crate::constants::{ERROR_BANNER_HINT, FAILURE_REPLY, SOFT_FAILURE_REPLY};
use crate::error::ChatError;
use crate::gemini::client::GenerationBackend;
use crate::gemini::types::{GenerateContentRequest, SystemInstruction};

/// Why a submission was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty after trimming
    EmptyInput,
    /// Another submission is still in flight
    InFlight,
}

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended
    Rejected(RejectReason),
    /// The model's reply was appended
    Replied,
    /// The API answered without text; the soft-failure reply was appended
    SoftFailure,
    /// The request failed; the failure reply was appended and the banner set
    Failed,
}

/// A submission that has been accepted and is waiting for the API
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Id of the user message that started this turn
    pub message_id: MessageId,
    /// Request to send, built from the transcript including the new message
    pub request: GenerateContentRequest,
}

/// Snapshot of everything a presentation layer needs to draw
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<'a> {
    /// Header title
    pub title: &'static str,
    /// Transcript in insertion order
    pub messages: &'a [Message],
    /// Typing indicator label, present while a reply is pending
    pub typing: Option<String>,
    /// Error banner, present after a failed turn until the next submission
    pub error_banner: Option<&'a str>,
}

/// The chat session controller
#[derive(Debug)]
pub struct ChatSession {
    config: ChatConfig,
    messages: Vec<Message>,
    in_flight: Option<MessageId>,
    last_error: Option<String>,
    next_id: MessageId,
}

impl ChatSession {
    /// Start a fresh session seeded with the variant greeting
    pub fn new(config: ChatConfig) -> Self {
        let greeting = config.variant.greeting();
        let mut session = Self::empty(config);
        session.push(MessageRole::Assistant, greeting.to_string(), None);
        session
    }

    /// Start a session from an existing transcript (no greeting is added)
    pub fn with_history<I, S>(config: ChatConfig, history: I) -> Self
    where
        I: IntoIterator<Item = (MessageRole, S)>,
        S: Into<String>,
    {
        let mut session = Self::empty(config);
        for (role, text) in history {
            session.push(role, text.into(), None);
        }
        session
    }

    fn empty(config: ChatConfig) -> Self {
        Self {
            config,
            messages: Vec::new(),
            in_flight: None,
            last_error: None,
            next_id: 1,
        }
    }

    /// Configuration this session was built with
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Transcript in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a submission is in flight
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Error banner text of the last failed turn
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current view of the session
    pub fn render(&self) -> SessionView<'_> {
        SessionView {
            title: self.config.variant.title(),
            messages: &self.messages,
            typing: self
                .is_pending()
                .then(|| self.config.variant.typing_label()),
            error_banner: self.last_error(),
        }
    }

    fn push(&mut self, role: MessageRole, text: String, status: Option<DeliveryStatus>) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;

        let mut message = Message::new(id, role, text);
        if self.config.variant.stamps_messages() {
            message = message.stamped();
        }
        if let Some(status) = status {
            message = message.with_status(status);
        }
        self.messages.push(message);
        id
    }

    fn set_status(&mut self, id: MessageId, status: DeliveryStatus) {
        if let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.delivery_status.is_some())
        {
            message.delivery_status = Some(status);
        }
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.messages.iter().map(Message::to_turn).collect(),
            generation_config: self.config.sampling.clone(),
            safety_settings: self.config.safety_settings.clone(),
            system_instruction: SystemInstruction::new(self.config.system_prompt.clone()),
        }
    }

    /// Accept a submission: append the user message and build the request
    ///
    /// The request's turns are the transcript as it stands after the append,
    /// so the new message appears exactly once, last.
    ///
    /// # Errors
    /// * `RejectReason::EmptyInput` if `text` is blank (nothing changes)
    /// * `RejectReason::InFlight` if a submission is already pending (nothing changes)
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingTurn, RejectReason> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RejectReason::EmptyInput);
        }
        if self.is_pending() {
            debug!("Submission rejected: another turn is in flight");
            return Err(RejectReason::InFlight);
        }

        let status = self
            .config
            .variant
            .tracks_delivery()
            .then_some(DeliveryStatus::Pending);
        let message_id = self.push(MessageRole::User, text.to_string(), status);
        self.last_error = None;
        self.in_flight = Some(message_id);

        let request = self.build_request();
        debug!(
            message_id = message_id,
            turns = request.contents.len(),
            "Submission accepted"
        );

        Ok(PendingTurn {
            message_id,
            request,
        })
    }

    /// Settle the in-flight turn with the backend's result
    ///
    /// Returns `None` (and changes nothing) if `message_id` is not the turn
    /// currently in flight.
    pub fn complete_submit(
        &mut self,
        message_id: MessageId,
        result: Result<Option<String>, ChatError>,
    ) -> Option<SubmitOutcome> {
        if self.in_flight != Some(message_id) {
            warn!(message_id = message_id, "Ignoring result for a turn that is not in flight");
            return None;
        }
        Some(self.settle(message_id, result))
    }

    fn settle(
        &mut self,
        message_id: MessageId,
        result: Result<Option<String>, ChatError>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(Some(text)) => {
                self.set_status(message_id, DeliveryStatus::Delivered);
                self.push(MessageRole::Assistant, text, None);
                SubmitOutcome::Replied
            }
            Ok(None) => {
                self.set_status(message_id, DeliveryStatus::Delivered);
                self.push(MessageRole::Assistant, SOFT_FAILURE_REPLY.to_string(), None);
                SubmitOutcome::SoftFailure
            }
            Err(err) => {
                warn!(message_id = message_id, error = %err, "Chat turn failed");
                self.last_error = Some(format!("Error: {}. {}", err, ERROR_BANNER_HINT));
                self.set_status(message_id, DeliveryStatus::Failed);
                self.push(MessageRole::Assistant, FAILURE_REPLY.to_string(), None);
                SubmitOutcome::Failed
            }
        };
        self.in_flight = None;

        info!(
            message_id = message_id,
            outcome = ?outcome,
            transcript_len = self.messages.len(),
            "Chat turn settled"
        );
        outcome
    }

    /// Run a whole submission: accept, call the backend once, settle
    ///
    /// If the returned future is dropped while the backend call is still
    /// running, the turn is settled as [`ChatError::Interrupted`], so the
    /// session never stays pending.
    pub async fn submit<B>(&mut self, backend: &B, text: &str) -> SubmitOutcome
    where
        B: GenerationBackend + ?Sized,
    {
        let turn = match self.begin_submit(text) {
            Ok(turn) => turn,
            Err(reason) => return SubmitOutcome::Rejected(reason),
        };
        let mut guard = SettleOnDrop {
            session: self,
            message_id: turn.message_id,
            armed: true,
        };
        let result = backend.generate(&turn.request).await;
        guard.armed = false;
        guard.session.settle(turn.message_id, result)
    }
}

/// Settles an in-flight turn as interrupted if `submit` is cancelled
struct SettleOnDrop<'a> {
    session: &'a mut ChatSession,
    message_id: MessageId,
    armed: bool,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.settle(self.message_id, Err(ChatError::Interrupted));
        }
    }
}
