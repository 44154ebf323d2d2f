/*!
 * Core transform service.
 *
 * This module contains the `TranslationService`, which runs the batched
 * correct/translate protocol against a single selected model.
 */

use std::time::{Duration, Instant};
use log::{debug, info};

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{GenerationRequest, Provider};
use crate::subtitle_processor::{self, CaptionBlock};
use super::batch::{self, Reconciliation};
use super::prompts::TransformIntent;

/// Generation parameters sent with every transform request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature; `None` leaves the model default
    pub temperature: Option<f32>,

    /// Output token cap; `None` leaves the model default
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Options taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Summary of one transform call
#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    /// Blocks that went through the transform
    pub blocks: usize,

    /// Malformed entries dropped while decoding
    pub dropped: usize,

    /// How the reply pieces lined up with the blocks
    pub reconciliation: Reconciliation,

    /// Prompt tokens, when reported
    pub prompt_tokens: Option<u64>,

    /// Completion tokens, when reported
    pub completion_tokens: Option<u64>,

    /// Time spent waiting on the provider
    pub api_duration: Duration,
}

impl TransformReport {
    /// Generate a one-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} blocks, {} dropped, {} received, {} padded, {} truncated, {} prompt / {} completion tokens, {:.1}s",
            self.blocks,
            self.dropped,
            self.reconciliation.received,
            self.reconciliation.padded,
            self.reconciliation.truncated,
            self.prompt_tokens.map_or("?".to_string(), |t| t.to_string()),
            self.completion_tokens.map_or("?".to_string(), |t| t.to_string()),
            self.api_duration.as_secs_f64(),
        )
    }
}

/// Batched correct/translate service bound to one provider and model
#[derive(Debug, Clone)]
pub struct TranslationService<P: Provider> {
    /// Provider implementation
    provider: P,

    /// Model selected by the probe
    model: String,

    /// Generation parameters
    pub options: GenerationOptions,
}

impl<P: Provider> TranslationService<P> {
    /// Create a new service for `model`
    pub fn new(provider: P, model: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            provider,
            model: model.into(),
            options,
        }
    }

    /// The model every request is sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fix grammar, spelling and punctuation of a Chinese document
    pub async fn correct(&self, document: &str, style: Option<&str>) -> Result<String, ProviderError> {
        self.transform(document, TransformIntent::Correct, style).await
    }

    /// Translate a Chinese document into Vietnamese
    pub async fn translate(&self, document: &str, style: Option<&str>) -> Result<String, ProviderError> {
        self.transform(document, TransformIntent::Translate, style).await
    }

    /// Run one batched transform over a whole document
    pub async fn transform(&self, document: &str, intent: TransformIntent, style: Option<&str>) -> Result<String, ProviderError> {
        let (output, _) = self.transform_with_report(document, intent, style).await?;
        Ok(output)
    }

    /// Run one batched transform and return its report alongside the output
    ///
    /// Exactly one provider request is made, unless the document holds no
    /// blocks, in which case nothing is sent and an empty document is returned.
    /// A reply with no text at all is an error, not a reply of zero pieces.
    pub async fn transform_with_report(
        &self,
        document: &str,
        intent: TransformIntent,
        style: Option<&str>,
    ) -> Result<(String, TransformReport), ProviderError> {
        let decoded = subtitle_processor::decode_with_report(document);
        let mut blocks: Vec<CaptionBlock> = decoded.blocks;
        let mut report = TransformReport {
            blocks: blocks.len(),
            dropped: decoded.dropped,
            ..Default::default()
        };

        if blocks.is_empty() {
            info!("Nothing to do: document has no caption blocks");
            return Ok((String::new(), report));
        }

        let prompt = intent.build_prompt(&batch::pack_texts(&blocks), blocks.len(), style);
        let mut request = GenerationRequest::new(self.model.clone(), prompt);
        request.temperature = self.options.temperature;
        request.max_output_tokens = self.options.max_output_tokens;

        info!("{} {} blocks with {} ({})", intent.describe(), blocks.len(), self.model, self.provider.name());
        let start_time = Instant::now();
        let response = self.provider.complete(request).await?;
        report.api_duration = start_time.elapsed();
        report.prompt_tokens = response.prompt_tokens;
        report.completion_tokens = response.completion_tokens;

        if response.text.trim().is_empty() {
            return Err(ProviderError::ParseError(format!("{} returned no text", self.model)));
        }

        let pieces = batch::split_response(&response.text);
        let (texts, reconciliation) = batch::reconcile(pieces, &blocks);
        report.reconciliation = reconciliation;
        batch::apply_texts(&mut blocks, texts);

        debug!("Transform finished: {}", report.summary());
        Ok((subtitle_processor::encode(&blocks), report))
    }
}
