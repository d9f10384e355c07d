//! Mock implementations for testing
//!
//! Queued-response provider mocks and local HTTP stub servers.

use crate::error::DispatchError;
use crate::llm::CompletionService;
use crate::phone::normalize_recipient;
use crate::sms::{MessagingService, SentMessage};
use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Completion Service
// ============================================================================

/// Mock completion service that returns queued replies
pub struct MockCompletion {
    replies: Mutex<VecDeque<Result<String, DispatchError>>>,
    /// Record of every prompt received
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_error(&self, error: DispatchError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, user_text: &str) -> Result<String, DispatchError> {
        self.prompts.lock().unwrap().push(user_text.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

// ============================================================================
// Mock Messaging Service
// ============================================================================

/// Mock carrier that normalizes recipients like the real one
pub struct MockMessaging {
    results: Mutex<VecDeque<Result<SentMessage, DispatchError>>>,
    /// Record of (normalized recipient, body) pairs
    sends: Mutex<Vec<(String, String)>>,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            sends: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_success(&self, sid: &str) {
        self.results.lock().unwrap().push_back(Ok(SentMessage {
            sid: Some(sid.to_string()),
        }));
    }

    pub fn queue_error(&self, error: DispatchError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_sends(&self) -> Vec<(String, String)> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingService for MockMessaging {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SentMessage, DispatchError> {
        let recipient = normalize_recipient(to)?;
        self.sends.lock().unwrap().push((recipient, body.to_string()));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::send_failed("No mock response queued")))
    }

    fn is_configured(&self) -> bool {
        true
    }
}

// ============================================================================
// HTTP stubs
// ============================================================================

/// Canned HTTP response for a stub route
#[derive(Debug, Clone)]
pub struct StubReply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

impl StubReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "text/plain",
            body: body.to_string(),
        }
    }

    pub fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
