//! SMS carrier abstraction

mod twilio;

pub use twilio::TwilioService;

use crate::error::DispatchError;
use async_trait::async_trait;
use std::sync::Arc;

/// A message accepted by the carrier. Delivery is not tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentMessage {
    pub sid: Option<String>,
}

/// Common interface for SMS carriers
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Send `body` to `to`. `to` is normalized by the implementation.
    async fn send_sms(&self, to: &str, body: &str) -> Result<SentMessage, DispatchError>;

    /// Whether all carrier credentials are present
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl<T: MessagingService + ?Sized> MessagingService for Arc<T> {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SentMessage, DispatchError> {
        (**self).send_sms(to, body).await
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

/// Logging wrapper for messaging services
pub struct LoggingMessaging<S> {
    inner: S,
}

impl<S: MessagingService> LoggingMessaging<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: MessagingService> MessagingService for LoggingMessaging<S> {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SentMessage, DispatchError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_sms(to, body).await;
        let duration = start.elapsed();

        match &result {
            Ok(sent) => {
                tracing::info!(
                    sid = sent.sid.as_deref().unwrap_or("unknown"),
                    duration_ms = %duration.as_millis(),
                    "SMS sent successfully"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    error_kind = %e.kind,
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "SMS send failed"
                );
            }
        }

        result
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
