//! Events that drive the session

use super::state::{MessageId, Mode};
use chrono::{DateTime, Utc};

/// Identity and creation time for a message about to be appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub id: MessageId,
    pub timestamp: DateTime<Utc>,
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
        mode: Mode,
        /// SMS recipient as typed, ignored in chat mode
        destination: Option<String>,
        stamp: Stamp,
    },
    Clear,
    DismissError,

    // Request outcomes
    CompletionReceived {
        reply: String,
        stamp: Stamp,
    },
    SmsSent {
        destination: String,
        stamp: Stamp,
    },
    RequestFailed {
        message: String,
    },
}
