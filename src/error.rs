// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DspError>;

#[derive(Error, Debug)]
pub enum DspError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find {what} at {}", path.display())]
    NotFound { what: String, path: PathBuf },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Text extraction failed for {file}: {message}")]
    Extraction { file: String, message: String },

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Invalid LLM response: {0}")]
    Response(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn extraction(file: &std::path::Path, message: impl ToString) -> Self {
        Self::Extraction {
            file: file.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DspError::not_found("project summary", "projects/Nebula/Summary.md");
        assert_eq!(
            err.to_string(),
            "Could not find project summary at projects/Nebula/Summary.md"
        );
    }

    #[test]
    fn test_serde_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DspError = parse_err.into();
        assert!(matches!(err, DspError::Serialization(_)));
    }
}
