use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{warn, debug};

// @module: Subtitle codec (SRT-style caption blocks)

// @const: CRLF or lone CR line endings
static LINE_ENDING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n?").unwrap()
});

// @const: Separator between caption blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

// @const: Minimum lines for a well-formed entry (index, timestamp, text)
pub const MIN_ENTRY_LINES: usize = 3;

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionBlock {
    // @field: Sequence label, kept verbatim
    pub index: String,

    // @field: Timing range, kept verbatim
    pub timestamp: String,

    // @field: Display text, may span several lines
    pub text: String,
}

impl CaptionBlock {
    pub fn new(index: impl Into<String>, timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        CaptionBlock {
            index: index.into(),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }

    /// Build a block from the lines of one entry, or `None` when the entry is too short
    fn from_entry(entry: &str) -> Option<Self> {
        let lines: Vec<&str> = entry.split('\n').collect();
        if lines.len() < MIN_ENTRY_LINES {
            return None;
        }

        Some(CaptionBlock {
            index: lines[0].to_string(),
            timestamp: lines[1].to_string(),
            text: lines[2..].join("\n"),
        })
    }
}

impl fmt::Display for CaptionBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.index, self.timestamp, self.text)
    }
}

/// Result of decoding a document, including how many entries were dropped
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    /// Blocks in document order
    pub blocks: Vec<CaptionBlock>,

    /// Non-empty entries skipped for having fewer than three lines
    pub dropped: usize,
}

/// Decode a subtitle document into caption blocks.
///
/// Entries with fewer than three lines are skipped; see [`decode_with_report`]
/// to learn how many were lost.
pub fn decode(document: &str) -> Vec<CaptionBlock> {
    decode_with_report(document).blocks
}

/// Decode a subtitle document and report dropped entries
pub fn decode_with_report(document: &str) -> DecodeReport {
    let normalized = LINE_ENDING_REGEX.replace_all(document, "\n");
    let mut report = DecodeReport::default();

    for (position, entry) in normalized.trim().split(BLOCK_SEPARATOR).enumerate() {
        let entry = entry.trim();
        match CaptionBlock::from_entry(entry) {
            Some(block) => report.blocks.push(block),
            None if entry.is_empty() => {}
            None => {
                warn!("Skipping malformed subtitle entry #{} (fewer than {} lines): {:?}",
                      position + 1, MIN_ENTRY_LINES, entry);
                report.dropped += 1;
            }
        }
    }

    debug!("Decoded {} caption blocks ({} dropped)", report.blocks.len(), report.dropped);
    report
}

/// Encode caption blocks back into a subtitle document
pub fn encode(blocks: &[CaptionBlock]) -> String {
    blocks.iter()
        .map(|block| block.to_string())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
