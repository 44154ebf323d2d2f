/*!
 * Provider implementations for text-generation services.
 *
 * This module contains the collaborator seam used by the transform protocol:
 * - Gemini: Google Generative Language API client
 * - Mock: scriptable provider for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single-shot generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `gemini-1.5-flash` or `models/gemini-1.5-flash`
    pub model: String,

    /// Full prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a new request with no generation parameters set
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Generated text plus whatever usage data the service reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// The generated text
    pub text: String,
    /// Prompt tokens, when reported
    pub prompt_tokens: Option<u64>,
    /// Completion tokens, when reported
    pub completion_tokens: Option<u64>,
}

/// Common trait for all text-generation providers
///
/// Implementations perform exactly one request per call: no retries,
/// no streaming, no model fallback.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<GenerationResponse, ProviderError>` - The generated text or an error
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

pub mod gemini;
pub mod mock;
