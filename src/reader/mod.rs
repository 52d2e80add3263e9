// file: src/reader/mod.rs
// description: extension-dispatched plain text extraction for input documents
// reference: internal module structure

pub mod docx;
pub mod pdf;

pub use docx::read_docx_text;
pub use pdf::read_pdf_text;

use crate::error::{DspError, Result};
use std::fs;
use std::path::Path;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    WordProcessor,
    Pdf,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "docx" => Some(Self::WordProcessor),
            "pdf" => Some(Self::Pdf),
            "md" | "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Returns the text of `path`, or an empty string when the file cannot be read
/// or has an unsupported extension. Failures are logged, never returned.
pub fn read_file_content(path: &Path) -> String {
    let Some(kind) = DocumentKind::from_path(path) else {
        warn!("Unsupported file type: {}", path.display());
        return String::new();
    };

    match try_read(path, kind) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading {}: {}", path.display(), e);
            String::new()
        }
    }
}

fn try_read(path: &Path, kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::WordProcessor => read_docx_text(path),
        DocumentKind::Pdf => read_pdf_text(path),
        DocumentKind::PlainText => {
            fs::read_to_string(path).map_err(|source| DspError::file_operation(path, source))
        }
    }
}
