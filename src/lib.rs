/*!
 * # zhvi - Chinese subtitle correction and Vietnamese translation
 *
 * A Rust library that corrects Chinese SRT subtitles and translates them to
 * Vietnamese with a Gemini model, one batched request per document.
 *
 * ## Features
 *
 * - Decode and re-encode SRT-style caption blocks, keeping indices and
 *   timestamps verbatim
 * - Pack every caption text into one delimited prompt and map the reply back
 *   by position, padding or truncating when the counts differ
 * - Probe a list of candidate models and keep the first one that answers
 * - Keep each run in an explicit `Session` owned by the caller
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Caption block codec
 * - `translation`: Batched correct/translate protocol:
 *   - `translation::core`: `TranslationService`
 *   - `translation::batch`: Delimiter packing and count reconciliation
 *   - `translation::prompts`: Prompt templates
 *   - `translation::probe`: Model selection and credential checks
 * - `providers`: Text-generation clients:
 *   - `providers::gemini`: Google Gemini API client
 *   - `providers::mock`: Scriptable mock provider
 * - `session`: In-memory session state
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod providers;
pub mod session;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{CaptionBlock, decode, encode};
pub use translation::{TransformIntent, TranslationService, verify_credentials};
pub use session::Session;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
