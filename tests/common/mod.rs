/*!
 * Common test utilities for the zhvi test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use zhvi::translation::BATCH_DELIMITER;

/// Two-block Chinese document used across tests
pub const TWO_BLOCKS: &str = "1\n00:00:01,000 --> 00:00:02,000\n你好\n\n2\n00:00:03,000 --> 00:00:04,000\n世界";

/// Three-block document, the second block spanning two lines
pub const THREE_BLOCKS: &str = "1\n00:00:01,000 --> 00:00:02,500\n我们走吧\n\n\
2\n00:00:03,000 --> 00:00:05,000\n他去了上海\n明天回来\n\n\
3\n00:00:06,000 --> 00:00:07,000\n李明在北京";

/// Initialise test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Join pieces the way a well-behaved model would
pub fn reply(pieces: &[&str]) -> String {
    pieces.join(&format!("\n{}\n", BATCH_DELIMITER))
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}
