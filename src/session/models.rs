/*!
 * Session stages and export descriptors.
 */

use std::fmt;

/// Pipeline stage of a document held by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The document as loaded
    Original,
    /// After grammar/spelling correction
    Corrected,
    /// After translation to Vietnamese
    Translated,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 3] = [Stage::Original, Stage::Corrected, Stage::Translated];

    /// File name used when exporting this stage
    pub fn export_file_name(&self) -> &'static str {
        match self {
            Stage::Original => "original.srt",
            Stage::Corrected => "corrected_chinese.srt",
            Stage::Translated => "translated_vietnamese.srt",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Original => write!(f, "original"),
            Stage::Corrected => write!(f, "corrected"),
            Stage::Translated => write!(f, "translated"),
        }
    }
}

/// A stage ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Which stage the content belongs to
    pub stage: Stage,
    /// Suggested file name
    pub file_name: &'static str,
    /// Document text
    pub content: String,
}
