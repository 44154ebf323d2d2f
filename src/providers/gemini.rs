use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::{Client, StatusCode};
use log::{debug, error};

use crate::errors::ProviderError;
use crate::providers::{GenerationRequest, GenerationResponse, Provider};

/// Default Generative Language API base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client for the `generateContent` endpoint
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Request timeout, reported in timeout errors
    timeout_secs: u64,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns; this client always sends a single user turn
    pub contents: Vec<GeminiContent>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// One conversation turn
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the turn author (user, model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Text parts of the turn
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Option<Vec<GeminiCandidate>>,

    /// Token counts
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,

    /// Set when the prompt itself was blocked
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: Option<u64>,

    #[serde(default)]
    pub candidates_token_count: Option<u64>,
}

/// Prompt safety feedback
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiRequest {
    /// Build the wire request from a provider-neutral request
    pub fn from_generation_request(request: &GenerationRequest) -> Self {
        let generation_config = if request.temperature.is_some() || request.max_output_tokens.is_some() {
            Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            })
        } else {
            None
        };

        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: request.prompt.clone() }],
            }],
            generation_config,
        }
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = endpoint.into();
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
            timeout_secs,
        })
    }

    /// URL of the generateContent method for `model`
    pub fn generate_url(&self, model: &str) -> String {
        let model = model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.endpoint.trim_end_matches('/'), model)
    }

    /// Extract text from a Gemini response
    ///
    /// Joins the text parts of the first candidate. A blocked prompt, a
    /// response without candidates or a first candidate without text is
    /// treated as malformed.
    pub fn extract_text_from_response(response: &GeminiResponse) -> Result<String, ProviderError> {
        if let Some(reason) = response.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            return Err(ProviderError::ParseError(format!("Prompt blocked by safety filters: {}", reason)));
        }

        let candidate = response.candidates.as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| ProviderError::ParseError("No candidates returned".to_string()))?;

        let text = candidate.content.as_ref()
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::ParseError(format!(
                "Candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }

    /// Map a non-success HTTP status and body onto a provider error
    fn error_for_status(status: StatusCode, body: &str) -> ProviderError {
        let detail = serde_json::from_str::<GeminiErrorBody>(body)
            .map(|b| match b.error.status {
                Some(s) => format!("{} ({})", b.error.message, s),
                None => b.error.message,
            })
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(detail),
            StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
                ProviderError::AuthenticationError(detail)
            }
            StatusCode::NOT_FOUND => ProviderError::ModelNotFound(detail),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(detail),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message: detail,
            },
        }
    }

    fn error_for_transport(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = self.generate_url(&request.model);
        let body = GeminiRequest::from_generation_request(&request);
        debug!("Gemini request to {} ({} prompt chars)", url, request.prompt.chars().count());

        let response = self.client.post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.error_for_transport(e))?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| self.error_for_transport(e))?;

        if !status.is_success() {
            error!("Gemini API error ({}): {}", status, text);
            return Err(Self::error_for_status(status, &text));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let generated = Self::extract_text_from_response(&gemini_response)?;
        let usage = gemini_response.usage_metadata.as_ref();

        Ok(GenerationResponse {
            text: generated,
            prompt_tokens: usage.and_then(|u| u.prompt_token_count),
            completion_tokens: usage.and_then(|u| u.candidates_token_count),
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
