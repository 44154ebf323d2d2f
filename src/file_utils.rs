use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

// @module: File and directory utilities

// @const: UTF-8 byte order mark
const UTF8_BOM: char = '\u{feff}';

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .map_err(|e| AppError::File(format!("Failed to create directory {}: {}", path.display(), e)))?;
        }
        Ok(())
    }

    /// Read a UTF-8 subtitle file, dropping a leading byte order mark
    pub fn read_subtitle<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| AppError::File(format!("Failed to read file {}: {}", path.display(), e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| AppError::File(format!("File is not valid UTF-8: {}", path.display())))?;

        Ok(content.strip_prefix(UTF8_BOM).map(str::to_string).unwrap_or(content))
    }

    /// Write a string to a file, refusing to replace an existing file unless `force` is set
    pub fn write_output<P: AsRef<Path>>(path: P, content: &str, force: bool) -> Result<(), AppError> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(AppError::File(format!(
                "Output file already exists: {} (use -f to overwrite)", path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, content)
            .map_err(|e| AppError::File(format!("Failed to write to file {}: {}", path.display(), e)))
    }

    // @returns: Directory for outputs, defaulting to the input's parent
    pub fn output_dir_for<P: AsRef<Path>>(input_file: P, configured: Option<&str>) -> PathBuf {
        match configured {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => input_file.as_ref()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
