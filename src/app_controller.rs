use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::session::{replace_text, Session, Stage};
use crate::translation::{select_model, GenerationOptions, TransformReport, TranslationService};

// @module: Application controller for subtitle correction and translation

/// Main application controller driving one session
pub struct Controller<P: Provider> {
    // @field: App configuration
    config: Config,

    // @field: Session state
    session: Session<P>,
}

impl<P: Provider> Controller<P> {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let session = Session::new().with_style(config.style());
        Ok(Self { config, session })
    }

    /// The session driven by this controller
    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// Probe the candidate models and attach the first usable one
    pub async fn connect(&mut self, provider: P) -> Result<String> {
        let spinner = Self::spinner("Checking API key...");
        let selected = select_model(&provider, &self.config.candidate_models).await;
        spinner.finish_and_clear();

        let model = selected.map_err(|e| anyhow!("API check failed: {}", e))?;
        self.session.attach(TranslationService::new(
            provider,
            model.clone(),
            GenerationOptions::from_config(&self.config),
        ));
        Ok(model)
    }

    /// Correct a Chinese subtitle file and write the result
    pub async fn run_correct(&mut self, input_file: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<PathBuf> {
        self.load(input_file, Stage::Original)?;
        self.correct().await?;
        self.write_stage(Stage::Corrected, input_file, output_dir, force_overwrite)
    }

    /// Translate an already corrected subtitle file and write the result
    pub async fn run_translate(&mut self, input_file: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<PathBuf> {
        self.load(input_file, Stage::Corrected)?;
        self.translate().await?;
        self.write_stage(Stage::Translated, input_file, output_dir, force_overwrite)
    }

    /// Correct then translate a file, writing both results
    pub async fn run_pipeline(&mut self, input_file: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<Vec<PathBuf>> {
        let start_time = std::time::Instant::now();
        self.load(input_file, Stage::Original)?;

        self.correct().await?;
        let corrected = self.write_stage(Stage::Corrected, input_file, output_dir, force_overwrite)?;

        self.translate().await?;
        let translated = self.write_stage(Stage::Translated, input_file, output_dir, force_overwrite)?;

        info!("Done in {}", Self::format_duration(start_time.elapsed()));
        Ok(vec![corrected, translated])
    }

    fn load(&mut self, input_file: &Path, stage: Stage) -> Result<()> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let content = FileManager::read_subtitle(input_file)?;
        let blocks = match stage {
            Stage::Corrected => self.session.load_corrected(content)?,
            _ => self.session.load_document(content)?,
        };
        info!("Loaded {} caption blocks from {:?}", blocks, input_file);
        Ok(())
    }

    async fn correct(&mut self) -> Result<()> {
        let spinner = Self::spinner("Correcting Chinese text...");
        let result = self.session.correct().await;
        spinner.finish_and_clear();

        let report = result.context("Correction failed")?;
        Self::log_report("Correction", &report);
        Ok(())
    }

    async fn translate(&mut self) -> Result<()> {
        let spinner = Self::spinner("Translating to Vietnamese...");
        let result = self.session.translate().await;
        spinner.finish_and_clear();

        let report = result.context("Translation failed")?;
        Self::log_report("Translation", &report);
        Ok(())
    }

    fn write_stage(&self, stage: Stage, input_file: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<PathBuf> {
        let output_path = self.output_path(stage, input_file, output_dir);
        FileManager::write_output(&output_path, self.session.content(stage), force_overwrite)?;
        info!("Wrote {} subtitles to {:?}", stage, output_path);
        Ok(output_path)
    }

    /// Output path for a stage: `<stem>.<export name>` in the output directory
    pub fn output_path(&self, stage: Stage, input_file: &Path, output_dir: Option<&Path>) -> PathBuf {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => FileManager::output_dir_for(input_file, self.config.output_dir.as_deref()),
        };
        let stem = input_file.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "subtitles".to_string());
        dir.join(format!("{}.{}", stem, stage.export_file_name()))
    }

    fn log_report(action: &str, report: &TransformReport) {
        if report.dropped > 0 {
            warn!("{}: {} malformed entries were skipped", action, report.dropped);
        }
        if !report.reconciliation.is_exact() {
            warn!("{}: model returned {} pieces for {} blocks",
                  action, report.reconciliation.received, report.blocks);
        }
        info!("{} finished in {}: {}", action, Self::format_duration(report.api_duration), report.summary());
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

/// Search and replace inside a translated subtitle file, in place
pub fn replace_in_file(path: &Path, search: &str, replacement: &str, use_regex: bool) -> Result<usize> {
    let content = FileManager::read_subtitle(path)?;
    let (replaced, count) = replace_text(&content, search, replacement, use_regex)?;

    if count > 0 {
        FileManager::write_output(path, &replaced, true)?;
    }
    info!("Replaced {} occurrence(s) of '{}' → '{}' in {:?}", count, search, replacement, path);
    Ok(count)
}
