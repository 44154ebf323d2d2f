/*!
 * Batched correct/translate protocol over a text-generation provider.
 *
 * - `core`: `TranslationService` running one request per document
 * - `batch`: delimiter packing, reply splitting and count reconciliation
 * - `prompts`: the correct and translate prompt templates
 * - `probe`: model selection and credential checks
 */

// Re-export main types for easier usage
pub use self::batch::{BATCH_DELIMITER, Reconciliation};
pub use self::core::{GenerationOptions, TransformReport, TranslationService};
pub use self::probe::{CredentialCheck, ProbeOutcome, select_model, verify_credentials};
pub use self::prompts::TransformIntent;

// Submodules
pub mod batch;
pub mod core;
pub mod probe;
pub mod prompts;
