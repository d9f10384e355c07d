//! Conversation controller
//!
//! Owns the session state and is the only thing that mutates it. A submit
//! is two explicit phases: [`ConversationController::begin`] appends the
//! user message and returns the pending request, and
//! [`ConversationController::resolve`] performs it and folds the outcome
//! back in. Every client error stops here and becomes the session's error
//! string.

use crate::llm::CompletionService;
use crate::sms::MessagingService;
use crate::state_machine::{
    transition, Effect, Event, MessageId, Mode, SessionState, Stamp, TransitionError,
};
use chrono::Utc;

/// Strictly increasing ids derived from the wall clock
#[derive(Debug, Default)]
pub struct MessageIdSource {
    last: u64,
}

impl MessageIdSource {
    pub fn next_stamp(&mut self) -> Stamp {
        let timestamp = Utc::now();
        let micros = u64::try_from(timestamp.timestamp_micros()).unwrap_or(0);
        let id = micros.max(self.last.saturating_add(1));
        self.last = id;
        Stamp {
            id: MessageId(id),
            timestamp,
        }
    }
}

pub struct ConversationController<C, M> {
    completion: C,
    messaging: M,
    state: SessionState,
    ids: MessageIdSource,
}

impl<C: CompletionService, M: MessagingService> ConversationController<C, M> {
    pub fn new(completion: C, messaging: M) -> Self {
        Self {
            completion,
            messaging,
            state: SessionState::default(),
            ids: MessageIdSource::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn completion_ready(&self) -> bool {
        self.completion.is_configured()
    }

    pub fn messaging_ready(&self) -> bool {
        self.messaging.is_configured()
    }

    /// Apply an event. Rejected events leave the state as it was.
    fn apply(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        Ok(result.effects)
    }

    /// Phase one of a submit. Returns the request to perform, if any.
    ///
    /// Empty text and submits while a request is in flight are ignored.
    pub fn begin(&mut self, text: &str, mode: Mode, destination: Option<&str>) -> Option<Effect> {
        let event = Event::Submit {
            text: text.to_string(),
            mode,
            destination: destination.map(str::to_string),
            stamp: self.ids.next_stamp(),
        };

        match self.apply(event) {
            Ok(effects) => effects.into_iter().next(),
            Err(e) => {
                tracing::debug!(reason = %e, mode = mode.as_str(), "Submit ignored");
                None
            }
        }
    }

    /// Phase two of a submit: perform `effect` and record the outcome.
    pub async fn resolve(&mut self, effect: Effect) {
        let outcome = match effect {
            Effect::RequestCompletion { text } => match self.completion.complete(&text).await {
                Ok(reply) => Event::CompletionReceived {
                    reply,
                    stamp: self.ids.next_stamp(),
                },
                Err(e) => Event::RequestFailed { message: e.message },
            },
            Effect::SendSms { to, body } => match self.messaging.send_sms(&to, &body).await {
                Ok(_) => Event::SmsSent {
                    destination: to,
                    stamp: self.ids.next_stamp(),
                },
                Err(e) => Event::RequestFailed { message: e.message },
            },
        };

        if let Err(e) = self.apply(outcome) {
            // The session was cleared while the request was in flight
            tracing::debug!(reason = %e, "Discarding request outcome");
        }
    }

    pub async fn submit(&mut self, text: &str, mode: Mode, destination: Option<&str>) {
        if let Some(effect) = self.begin(text, mode, destination) {
            self.resolve(effect).await;
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.apply(Event::Clear) {
            tracing::warn!(reason = %e, "Clear rejected");
        }
    }

    pub fn dismiss_error(&mut self) {
        if let Err(e) = self.apply(Event::DismissError) {
            tracing::warn!(reason = %e, "Dismiss rejected");
        }
    }
}
