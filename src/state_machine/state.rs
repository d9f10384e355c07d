//! Session state types

use chrono::{DateTime, Utc};

/// Message identifier, strictly increasing within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Where a submitted message goes, and which thread a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Chat,
    Sms,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Sms => "sms",
        }
    }
}

/// An entry in the session log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    pub kind: Mode,
}

/// Request slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Exactly one outbound request is in flight
    Sending { mode: Mode },
}

/// Everything the surface renders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub phase: Phase,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Sending { .. })
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
