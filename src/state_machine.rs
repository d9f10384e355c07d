//! Session state machine
//!
//! Pure state transitions in the Elm Architecture style. The controller
//! feeds events in and executes the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, Stamp};
pub use state::{Message, MessageId, Mode, Phase, Role, SessionState};
pub use transition::{transition, TransitionError};
