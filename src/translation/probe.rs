/*!
 * Model selection and credential checks.
 *
 * Candidate model identifiers are probed in order with a tiny prompt and
 * the first one that answers with non-empty text is selected.
 */

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::gemini::Gemini;
use crate::providers::{GenerationRequest, Provider};

/// Prompt sent to each candidate
pub const PROBE_PROMPT: &str = "Test";

/// Temperature used by the probe
pub const PROBE_TEMPERATURE: f32 = 0.1;

/// Output token cap used by the probe
pub const PROBE_MAX_OUTPUT_TOKENS: u32 = 5;

/// Result of probing one model
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The model answered with text
    Usable,
    /// The model answered, but with no text
    Empty,
    /// The request failed
    Failed(ProviderError),
}

impl ProbeOutcome {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Usable)
    }
}

/// Result of a credential check, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCheck {
    /// Whether a usable model was found
    pub ok: bool,
    /// Selected model on success, failure description otherwise
    pub detail: String,
}

/// Send the probe prompt to a single model
pub async fn probe_model<P: Provider + ?Sized>(provider: &P, model: &str) -> ProbeOutcome {
    let request = GenerationRequest::new(model, PROBE_PROMPT)
        .temperature(PROBE_TEMPERATURE)
        .max_output_tokens(PROBE_MAX_OUTPUT_TOKENS);

    match provider.complete(request).await {
        Ok(response) if !response.text.trim().is_empty() => ProbeOutcome::Usable,
        Ok(_) => ProbeOutcome::Empty,
        Err(e) => ProbeOutcome::Failed(e),
    }
}

/// Pick the first candidate model that answers the probe.
///
/// Connection and authentication failures end the scan at once, since no
/// other model can succeed with the same endpoint and key.
pub async fn select_model<P: Provider + ?Sized>(provider: &P, candidates: &[String]) -> Result<String, ProviderError> {
    let mut tried = Vec::with_capacity(candidates.len());

    for model in candidates {
        tried.push(model.clone());
        match probe_model(provider, model).await {
            ProbeOutcome::Usable => {
                info!("Selected model {}", model);
                return Ok(model.clone());
            }
            ProbeOutcome::Empty => {
                debug!("Model {} returned empty text", model);
            }
            ProbeOutcome::Failed(e) if e.is_connectivity_or_auth() => {
                warn!("Probe of {} failed: {}", model, e);
                return Err(e);
            }
            ProbeOutcome::Failed(e) => {
                debug!("Model {} unavailable: {}", model, e);
            }
        }
    }

    Err(ProviderError::NoUsableModel { tried })
}

/// Check a key by running the model selection against it
pub async fn check_provider<P: Provider + ?Sized>(provider: &P, candidates: &[String]) -> CredentialCheck {
    match select_model(provider, candidates).await {
        Ok(model) => CredentialCheck { ok: true, detail: model },
        Err(e) => CredentialCheck { ok: false, detail: e.to_string() },
    }
}

/// Verify a Gemini API key using the endpoint and candidates from `config`
pub async fn verify_credentials(config: &Config, api_key: &str) -> CredentialCheck {
    if api_key.trim().is_empty() {
        return CredentialCheck {
            ok: false,
            detail: "API key is required".to_string(),
        };
    }

    let client = match Gemini::new(api_key.trim(), config.endpoint.clone(), config.timeout_secs) {
        Ok(client) => client,
        Err(e) => return CredentialCheck { ok: false, detail: e.to_string() },
    };

    check_provider(&client, &config.candidate_models).await
}
