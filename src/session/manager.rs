/*!
 * In-memory session holding the documents of one correct/translate run.
 *
 * A session is owned by its caller; independent sessions share nothing.
 * Every action either stores its result or fails leaving the stored
 * documents untouched.
 */

use log::{debug, info};
use regex::Regex;

use crate::errors::{SubtitleError, TranslationError};
use crate::providers::Provider;
use crate::subtitle_processor;
use crate::translation::{TransformIntent, TransformReport, TranslationService};
use super::models::{ExportFile, Stage};

/// State of one user session
#[derive(Debug)]
pub struct Session<P: Provider> {
    /// Service bound to the verified model; absent until verified
    service: Option<TranslationService<P>>,

    /// Style hint passed to every action
    pub style: Option<String>,

    original: String,
    corrected: String,
    translated: String,
}

impl<P: Provider> Default for Session<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Session<P> {
    /// Create an empty session with no service attached
    pub fn new() -> Self {
        Self {
            service: None,
            style: None,
            original: String::new(),
            corrected: String::new(),
            translated: String::new(),
        }
    }

    /// Set the style hint; blank values clear it
    pub fn with_style(mut self, style: Option<&str>) -> Self {
        self.style = style.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Attach a service bound to a verified model
    pub fn attach(&mut self, service: TranslationService<P>) {
        info!("Session using model {}", service.model());
        self.service = Some(service);
    }

    /// The attached service, if any
    pub fn service(&self) -> Option<&TranslationService<P>> {
        self.service.as_ref()
    }

    /// Whether a model has been verified and attached
    pub fn is_ready(&self) -> bool {
        self.service.is_some()
    }

    /// Load a new source document, clearing earlier results
    pub fn load_document(&mut self, content: impl Into<String>) -> Result<usize, TranslationError> {
        let content = content.into();
        let report = subtitle_processor::decode_with_report(&content);
        if report.blocks.is_empty() {
            return Err(SubtitleError::Empty.into());
        }

        self.original = content;
        self.corrected.clear();
        self.translated.clear();
        debug!("Loaded document with {} blocks", report.blocks.len());
        Ok(report.blocks.len())
    }

    /// Load a document that was already corrected, ready for translation
    pub fn load_corrected(&mut self, content: impl Into<String>) -> Result<usize, TranslationError> {
        let content = content.into();
        let blocks = self.load_document(content.clone())?;
        self.corrected = content;
        Ok(blocks)
    }

    /// Document text for a stage; empty when the stage has not run
    pub fn content(&self, stage: Stage) -> &str {
        match stage {
            Stage::Original => &self.original,
            Stage::Corrected => &self.corrected,
            Stage::Translated => &self.translated,
        }
    }

    /// Correct the original document and store the result
    pub async fn correct(&mut self) -> Result<TransformReport, TranslationError> {
        let service = self.require_service()?;
        if self.original.is_empty() {
            return Err(TranslationError::NotReady("No document loaded".to_string()));
        }

        let (corrected, report) = service
            .transform_with_report(&self.original, TransformIntent::Correct, self.style.as_deref())
            .await?;
        self.corrected = corrected;
        Ok(report)
    }

    /// Translate the corrected document and store the result
    pub async fn translate(&mut self) -> Result<TransformReport, TranslationError> {
        let service = self.require_service()?;
        if self.corrected.is_empty() {
            return Err(TranslationError::NotReady("Correct the document before translating".to_string()));
        }

        let (translated, report) = service
            .transform_with_report(&self.corrected, TransformIntent::Translate, self.style.as_deref())
            .await?;
        self.translated = translated;
        Ok(report)
    }

    /// Replace every occurrence of `search` in the translation; returns the count
    pub fn replace_all(&mut self, search: &str, replacement: &str) -> Result<usize, TranslationError> {
        self.replace_translated(search, replacement, false)
    }

    /// Replace every match of the `pattern` regex in the translation; returns the count
    pub fn replace_all_regex(&mut self, pattern: &str, replacement: &str) -> Result<usize, TranslationError> {
        self.replace_translated(pattern, replacement, true)
    }

    fn replace_translated(&mut self, search: &str, replacement: &str, use_regex: bool) -> Result<usize, TranslationError> {
        if self.translated.is_empty() {
            return Err(TranslationError::NotReady("Nothing translated yet".to_string()));
        }

        let (replaced, count) = replace_text(&self.translated, search, replacement, use_regex)?;
        if count > 0 {
            self.translated = replaced;
        }
        Ok(count)
    }

    /// Replace the translation with a manually edited version
    pub fn set_translated(&mut self, edited: impl Into<String>) {
        self.translated = edited.into();
    }

    /// Stages that have content, in pipeline order
    pub fn exports(&self) -> Vec<ExportFile> {
        Stage::ALL.iter()
            .filter(|stage| !self.content(**stage).is_empty())
            .map(|stage| ExportFile {
                stage: *stage,
                file_name: stage.export_file_name(),
                content: self.content(*stage).to_string(),
            })
            .collect()
    }

    fn require_service(&self) -> Result<&TranslationService<P>, TranslationError> {
        self.service.as_ref()
            .ok_or_else(|| TranslationError::NotReady("No verified model; check the API key first".to_string()))
    }
}

/// Replace all occurrences of `search` in `text`, literally or as a regex.
///
/// Both `search` and `replacement` must be non-empty. Returns the new text
/// and the number of replacements made.
pub fn replace_text(text: &str, search: &str, replacement: &str, use_regex: bool) -> Result<(String, usize), TranslationError> {
    if search.is_empty() || replacement.is_empty() {
        return Err(TranslationError::NotReady("Both search and replacement text are required".to_string()));
    }

    if use_regex {
        let regex = Regex::new(search)
            .map_err(|e| TranslationError::NotReady(format!("Invalid pattern: {}", e)))?;
        let count = regex.find_iter(text).count();
        Ok((regex.replace_all(text, replacement).into_owned(), count))
    } else {
        let count = text.matches(search).count();
        Ok((text.replace(search, replacement), count))
    }
}
