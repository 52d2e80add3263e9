// file: src/reader/pdf.rs
// description: text extraction from portable-document files
// reference: https://docs.rs/pdf-extract

use crate::error::{DspError, Result};
use std::path::Path;
use tracing::debug;

pub fn read_pdf_text(path: &Path) -> Result<String> {
    debug!("Reading PDF file: {}", path.display());

    pdf_extract::extract_text(path).map_err(|e| DspError::extraction(path, e))
}
