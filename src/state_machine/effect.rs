//! Effects produced by state transitions

/// Outbound work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the completion provider for a reply
    RequestCompletion { text: String },

    /// Hand a message to the carrier
    SendSms { to: String, body: String },
}
