use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Settings parse error: {0}")]
    Parse(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Chapter has no pages: {0}")]
    EmptyChapter(String),
}

/// Reads a settings file, rejecting files that contain only whitespace.
pub fn read_settings_file(path: &Path) -> Result<String, ReaderError> {
    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Err(ReaderError::Parse(format!(
            "settings file is empty: {}",
            path.display()
        )));
    }

    Ok(content)
}
