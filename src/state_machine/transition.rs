//! Pure state transition function
//!
//! Given the same state and event this always produces the same result.
//! All I/O is described by the returned effects.

use super::{Effect, Event, Message, Mode, Phase, Role, SessionState, Stamp};
use crate::phone::{format_for_display, is_sendable};
use thiserror::Error;

pub const MISSING_DESTINATION: &str = "Please enter a phone number";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the current state does not accept. The state is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in flight")]
    Busy,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No request is waiting for this outcome")]
    UnexpectedOutcome,
}

fn message(stamp: Stamp, role: Role, kind: Mode, content: impl Into<String>) -> Message {
    Message {
        id: stamp.id,
        content: content.into(),
        role,
        timestamp: stamp.timestamp,
        kind,
    }
}

/// Confirmation text for a sent SMS. US numbers are shown the way the
/// recipient field displays them; anything else as typed.
fn sent_confirmation(destination: &str) -> String {
    if is_sendable(destination) {
        format!("SMS sent to {}", format_for_display(destination))
    } else {
        format!("SMS sent to {}", destination.trim())
    }
}

pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::Submit {
            text,
            mode,
            destination,
            stamp,
        } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            if state.is_loading() {
                return Err(TransitionError::Busy);
            }

            let mut next = state.clone();
            next.messages.push(message(stamp, Role::User, mode, text));
            next.error = None;

            match mode {
                Mode::Chat => {
                    next.phase = Phase::Sending { mode };
                    Ok(TransitionResult::new(next).with_effect(Effect::RequestCompletion {
                        text: text.to_string(),
                    }))
                }
                Mode::Sms => match destination.filter(|d| !d.trim().is_empty()) {
                    Some(to) => {
                        next.phase = Phase::Sending { mode };
                        Ok(TransitionResult::new(next).with_effect(Effect::SendSms {
                            to,
                            body: text.to_string(),
                        }))
                    }
                    None => {
                        next.phase = Phase::Idle;
                        next.error = Some(MISSING_DESTINATION.to_string());
                        Ok(TransitionResult::new(next))
                    }
                },
            }
        }

        Event::CompletionReceived { reply, stamp } => match state.phase {
            Phase::Sending { mode: Mode::Chat } => {
                let mut next = state.clone();
                next.messages
                    .push(message(stamp, Role::Assistant, Mode::Chat, reply));
                next.phase = Phase::Idle;
                Ok(TransitionResult::new(next))
            }
            _ => Err(TransitionError::UnexpectedOutcome),
        },

        Event::SmsSent { destination, stamp } => match state.phase {
            Phase::Sending { mode: Mode::Sms } => {
                let mut next = state.clone();
                next.messages.push(message(
                    stamp,
                    Role::Assistant,
                    Mode::Sms,
                    sent_confirmation(&destination),
                ));
                next.phase = Phase::Idle;
                Ok(TransitionResult::new(next))
            }
            _ => Err(TransitionError::UnexpectedOutcome),
        },

        Event::RequestFailed { message } => match state.phase {
            Phase::Sending { .. } => {
                let mut next = state.clone();
                next.error = Some(message);
                next.phase = Phase::Idle;
                Ok(TransitionResult::new(next))
            }
            Phase::Idle => Err(TransitionError::UnexpectedOutcome),
        },

        Event::Clear => Ok(TransitionResult::new(SessionState::default())),

        Event::DismissError => {
            let mut next = state.clone();
            next.error = None;
            Ok(TransitionResult::new(next))
        }
    }
}
