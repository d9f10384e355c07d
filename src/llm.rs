//! Chat-completion provider abstraction
//!
//! One user utterance in, one assistant reply out.

mod openai;

pub use openai::OpenAIService;

use crate::error::DispatchError;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for completion providers
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `user_text` and return the first reply's text
    async fn complete(&self, user_text: &str) -> Result<String, DispatchError>;

    /// Get the model ID
    fn model_id(&self) -> &str;

    /// Whether credentials are present for this provider
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, user_text: &str) -> Result<String, DispatchError> {
        (**self).complete(user_text).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

/// Logging wrapper for completion services
pub struct LoggingCompletion<S> {
    inner: S,
}

impl<S: CompletionService> LoggingCompletion<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: CompletionService> CompletionService for LoggingCompletion<S> {
    async fn complete(&self, user_text: &str) -> Result<String, DispatchError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(user_text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.chars().count(),
                    "Completion request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    error_kind = %e.kind,
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
