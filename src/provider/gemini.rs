//! Gemini generateContent provider (text and vision)

use super::{CompletionProvider, CompletionRequest, CompletionResponse, ProviderError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider. Text requests go to the text model, requests
/// carrying an image payload to the vision model.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    vision_model: String,
}

impl GeminiProvider {
    /// Create a provider against the public Gemini endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url("https://generativelanguage.googleapis.com", api_key)
    }

    /// Create with a custom base URL (useful for proxies and tests)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
            api_key: api_key.into(),
            text_model: "gemini-2.5-flash".to_string(),
            vision_model: "gemini-1.5-pro".to_string(),
        }
    }

    /// Override the text and vision model names
    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.vision_model = vision_model.into();
        self
    }

    fn model_for(&self, request: &CompletionRequest) -> &str {
        if request.image.is_some() {
            &self.vision_model
        } else {
            &self.text_model
        }
    }
}

/// Gemini API request format
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Gemini API response format
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let model = self.model_for(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let mut parts = vec![Part {
            text: Some(request.prompt.clone()),
            inline_data: None,
        }];
        if let Some(image) = &request.image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.mime_type.clone(),
                    data: BASE64.encode(&image.data),
                }),
            });
        }

        let payload = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply.into_text();
        if text.is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(CompletionResponse { text })
    }
}
