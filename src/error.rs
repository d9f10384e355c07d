//! Dispatch error types
//!
//! Both provider clients report failures as a [`DispatchError`]: a
//! classification plus the message shown to the user.

use thiserror::Error;

/// Client error with classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DispatchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DispatchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn invalid_phone(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPhone, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimit, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Provider, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyResponse, message)
    }

    pub fn send_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SendFailed, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required credential absent, detected before any network call
    Config,
    /// Destination number could not be normalized
    InvalidPhone,
    /// Provider rejected the credentials (401)
    Auth,
    /// Provider rate limited the request (429)
    RateLimit,
    /// Carrier rejected the request parameters (400)
    BadRequest,
    /// Carrier account suspended or lacking permission (403)
    Forbidden,
    /// Any other provider failure
    Provider,
    /// Transport failure talking to the completion provider
    Network,
    /// Completion provider answered without any text
    EmptyResponse,
    /// Transport failure talking to the carrier
    SendFailed,
}

impl ErrorKind {
    /// Failures a caller could reasonably retry. Nothing in this crate does.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::SendFailed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::InvalidPhone => "invalid_phone",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::BadRequest => "bad_request",
            Self::Forbidden => "forbidden",
            Self::Provider => "provider",
            Self::Network => "network",
            Self::EmptyResponse => "empty_response",
            Self::SendFailed => "send_failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
