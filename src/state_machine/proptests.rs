//! Property-based tests for session transitions
//!
//! Random event sequences are applied the way the controller applies them
//! (rejected events leave the state untouched) and checked for:
//! - insertion order and strictly increasing ids
//! - loading iff an effect is outstanding
//! - rejected submits never append
//! - clear always yields the empty session

use super::transition::TransitionError;
use super::{transition, Effect, Event, MessageId, Mode, SessionState, Stamp};
use chrono::Utc;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Submit {
        text: String,
        mode: Mode,
        destination: Option<String>,
    },
    Reply(String),
    Sent,
    Fail(String),
    Clear,
    Dismiss,
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Chat), Just(Mode::Sms)]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[a-zA-Z0-9 ]{1,30}",
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (arb_text(), arb_mode(), proptest::option::of(prop_oneof![Just(String::new()), "[0-9]{10}"]))
            .prop_map(|(text, mode, destination)| Action::Submit { text, mode, destination }),
        2 => "[a-z ]{1,20}".prop_map(Action::Reply),
        2 => Just(Action::Sent),
        2 => "[a-z ]{1,20}".prop_map(Action::Fail),
        1 => Just(Action::Clear),
        1 => Just(Action::Dismiss),
    ]
}

struct Harness {
    state: SessionState,
    next_id: u64,
    outstanding: Option<Effect>,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: SessionState::default(),
            next_id: 1,
            outstanding: None,
        }
    }

    fn stamp(&mut self) -> Stamp {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        Stamp {
            id,
            timestamp: Utc::now(),
        }
    }

    fn event_for(&mut self, action: &Action) -> Event {
        match action.clone() {
            Action::Submit {
                text,
                mode,
                destination,
            } => Event::Submit {
                text,
                mode,
                destination,
                stamp: self.stamp(),
            },
            Action::Reply(reply) => Event::CompletionReceived {
                reply,
                stamp: self.stamp(),
            },
            Action::Sent => Event::SmsSent {
                destination: "5551234567".to_string(),
                stamp: self.stamp(),
            },
            Action::Fail(message) => Event::RequestFailed { message },
            Action::Clear => Event::Clear,
            Action::Dismiss => Event::DismissError,
        }
    }

    fn apply(&mut self, action: &Action) -> Result<(), TransitionError> {
        let event = self.event_for(action);
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        match action {
            Action::Submit { .. } => self.outstanding = result.effects.into_iter().next(),
            Action::Reply(_) | Action::Sent | Action::Fail(_) | Action::Clear => {
                self.outstanding = None;
            }
            Action::Dismiss => {}
        }
        Ok(())
    }
}

proptest! {
    #[test]
    fn sequences_preserve_invariants(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let mut h = Harness::new();

        for action in &actions {
            let before = h.state.clone();
            let outcome = h.apply(action);

            match (action, &outcome) {
                (Action::Submit { text, .. }, Err(_)) => {
                    prop_assert!(text.trim().is_empty() || before.is_loading());
                    prop_assert_eq!(&h.state, &before);
                }
                (Action::Submit { text, .. }, Ok(())) => {
                    prop_assert_eq!(h.state.messages.len(), before.messages.len() + 1);
                    prop_assert_eq!(&h.state.messages.last().unwrap().content, text.trim());
                }
                (Action::Clear, _) => prop_assert_eq!(&h.state, &SessionState::default()),
                (_, Err(_)) => prop_assert_eq!(&h.state, &before),
                _ => {}
            }

            prop_assert_eq!(h.state.is_loading(), h.outstanding.is_some());

            let ids: Vec<u64> = h.state.messages.iter().map(|m| m.id.0).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn submit_while_loading_never_appends(first in "[a-z]{1,10}", second in arb_text(), mode in arb_mode()) {
        let mut h = Harness::new();
        h.apply(&Action::Submit { text: first, mode: Mode::Chat, destination: None }).unwrap();
        let before = h.state.clone();

        let outcome = h.apply(&Action::Submit { text: second, mode, destination: Some("5551234567".to_string()) });
        prop_assert!(outcome.is_err());
        prop_assert_eq!(h.state, before);
    }

    #[test]
    fn dismiss_only_touches_error(actions in proptest::collection::vec(arb_action(), 0..20)) {
        let mut h = Harness::new();
        for action in &actions {
            let _ = h.apply(action);
        }
        let before = h.state.clone();
        h.apply(&Action::Dismiss).unwrap();
        prop_assert_eq!(h.state.error, None);
        prop_assert_eq!(h.state.messages, before.messages);
        prop_assert_eq!(h.state.phase, before.phase);
    }
}
