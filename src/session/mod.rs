/*!
 * Session state for a correct/translate run.
 *
 * This module provides:
 * - The `Session` object holding original, corrected and translated documents
 * - Stage descriptors and export file names
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::{replace_text, Session};
pub use models::{ExportFile, Stage};
