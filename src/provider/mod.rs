//! Completion-service abstraction and implementations

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors that can occur when calling the completion service
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion service returned an empty reply")]
    Empty,
}

/// Payload for vision-mode requests
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A single request to the completion service
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full natural-language prompt, including the output contract
    pub prompt: String,

    /// Image to analyze alongside the prompt, if any
    pub image: Option<ImagePayload>,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(
        prompt: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(ImagePayload {
                mime_type: mime_type.into(),
                data,
            }),
        }
    }
}

/// Raw reply text from the completion service
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
}

/// Trait for completion-service backends
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/identification
    fn name(&self) -> &str;

    /// Send one completion request. One outbound call per incoming
    /// request; callers do not retry.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ProviderError>;
}

/// Scripted provider for tests: pops queued outcomes in order and counts
/// how many calls were made
#[derive(Default)]
pub struct MockProvider {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Queue a successful reply
    pub fn push_text(&self, text: impl Into<String>) {
        self.outcomes.lock().push_back(Ok(text.into()));
    }

    /// Queue a simulated service failure
    pub fn push_failure(&self, status: u16, body: impl Into<String>) {
        self.outcomes.lock().push_back(Err(ProviderError::Api {
            status,
            body: body.into(),
        }));
    }

    /// Number of completion calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.lock().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse { text }),
            Some(Err(err)) => Err(err),
            None => Err(ProviderError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_pops_outcomes_in_order() {
        let mock = MockProvider::default();
        mock.push_text("first");
        mock.push_failure(503, "unavailable");

        let request = CompletionRequest::text("prompt");
        let reply = mock.complete(&request).await.unwrap();
        assert_eq!(reply.text, "first");

        let err = mock.complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 503, .. }));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_exhausted_queue_is_empty_reply() {
        let mock = MockProvider::default();
        let err = mock
            .complete(&CompletionRequest::text("prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Empty));
    }
}
