/*!
 * Batch packing for the one-request-per-document protocol.
 *
 * All block texts travel in a single prompt separated by a sentinel token,
 * and the reply is split on that same token and mapped back by position.
 */

use log::warn;

use crate::subtitle_processor::CaptionBlock;

/// Sentinel separating texts in a batch and in the reply
pub const BATCH_DELIMITER: &str = "===PHÂN_CÁCH===";

/// How the reply pieces were reconciled with the block count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Non-empty pieces found in the reply
    pub received: usize,
    /// Trailing blocks that kept their original text
    pub padded: usize,
    /// Extra pieces that were discarded
    pub truncated: usize,
}

impl Reconciliation {
    /// True when the reply had exactly one piece per block
    pub fn is_exact(&self) -> bool {
        self.padded == 0 && self.truncated == 0
    }
}

/// Join block texts into one delimited payload
pub fn pack_texts(blocks: &[CaptionBlock]) -> String {
    let separator = format!("\n{}\n", BATCH_DELIMITER);
    blocks.iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Split a reply on the delimiter, trimming pieces and dropping empty ones
pub fn split_response(response: &str) -> Vec<String> {
    response.split(BATCH_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fit `pieces` to the block count.
///
/// Missing trailing pieces take the original text of the matching block;
/// surplus pieces are dropped.
pub fn reconcile(mut pieces: Vec<String>, originals: &[CaptionBlock]) -> (Vec<String>, Reconciliation) {
    let expected = originals.len();
    let mut report = Reconciliation {
        received: pieces.len(),
        ..Default::default()
    };

    if pieces.len() < expected {
        report.padded = expected - pieces.len();
        warn!("Reply has {} of {} pieces; keeping original text for the last {}",
              pieces.len(), expected, report.padded);
        let start = pieces.len();
        pieces.extend(originals[start..].iter().map(|b| b.text.clone()));
    } else if pieces.len() > expected {
        report.truncated = pieces.len() - expected;
        warn!("Reply has {} pieces for {} blocks; discarding {} extra",
              pieces.len(), expected, report.truncated);
        pieces.truncate(expected);
    }

    (pieces, report)
}

/// Assign texts to blocks positionally
pub fn apply_texts(blocks: &mut [CaptionBlock], texts: Vec<String>) {
    for (block, text) in blocks.iter_mut().zip(texts) {
        block.text = text;
    }
}
