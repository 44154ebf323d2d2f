/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::replying(text)` - Always succeeds with a fixed reply
 * - `MockProvider::echo()` - Replies with the batch payload found in the prompt
 * - `MockProvider::failing(kind)` - Always fails with the given error kind
 * - `MockProvider::empty()` - Succeeds with an empty reply
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{GenerationRequest, GenerationResponse, Provider};

/// Kind of error a failing mock returns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockFailure {
    /// Authentication error (invalid API key)
    Auth,
    /// Connection error
    Connection,
    /// Request timeout
    Timeout,
    /// Unknown model
    ModelNotFound,
    /// Generic API error
    Api,
}

impl MockFailure {
    fn to_error(self, model: &str) -> ProviderError {
        match self {
            Self::Auth => ProviderError::AuthenticationError("API key not valid".into()),
            Self::Connection => ProviderError::ConnectionError("Connection refused".into()),
            Self::Timeout => ProviderError::Timeout(120),
            Self::ModelNotFound => ProviderError::ModelNotFound(format!("models/{} is not found", model)),
            Self::Api => ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".into(),
            },
        }
    }
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds with this reply
    Reply(String),
    /// Replies with the batch payload embedded in the prompt
    Echo,
    /// Always fails with an error
    Failing(MockFailure),
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64, reply: String },
}

/// Mock provider for testing transform and probe behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Models that answer; `None` means every model answers
    available_models: Option<Vec<String>>,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            available_models: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always replies with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Create a mock that echoes the batch payload back unchanged
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(kind: MockFailure) -> Self {
        Self::new(MockBehavior::Failing(kind))
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Restrict which model identifiers answer; others fail with `ModelNotFound`
    pub fn with_available_models(mut self, models: &[&str]) -> Self {
        self.available_models = Some(models.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Text between the last `:\n` header line and the closing instruction of a batch prompt
    fn echo_payload(prompt: &str) -> String {
        let body: Vec<&str> = prompt.split("\n\n").collect();
        if body.len() >= 3 {
            body[body.len() - 2].lines().skip(1).collect::<Vec<_>>().join("\n")
        } else {
            prompt.to_string()
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(models) = &self.available_models {
            if !models.iter().any(|m| m == &request.model) {
                return Err(MockFailure::ModelNotFound.to_error(&request.model));
            }
        }

        let text = match &self.behavior {
            MockBehavior::Reply(reply) => reply.clone(),
            MockBehavior::Echo => Self::echo_payload(&request.prompt),
            MockBehavior::Failing(kind) => return Err(kind.to_error(&request.model)),
            MockBehavior::Empty => String::new(),
            MockBehavior::Slow { delay_ms, reply } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                reply.clone()
            }
        };

        Ok(GenerationResponse {
            prompt_tokens: Some(request.prompt.chars().count() as u64),
            completion_tokens: Some(text.chars().count() as u64),
            text,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
