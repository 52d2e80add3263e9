// file: src/reader/docx.rs
// description: paragraph text extraction from word-processor documents
// reference: https://docs.rs/quick-xml

use crate::error::{DspError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn read_docx_text(path: &Path) -> Result<String> {
    debug!("Reading DOCX file: {}", path.display());

    let file = File::open(path).map_err(|source| DspError::file_operation(path, source))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DspError::extraction(path, e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DspError::extraction(path, e))?
        .read_to_string(&mut xml)
        .map_err(|source| DspError::file_operation(path, source))?;

    paragraphs_from_xml(&xml).map_err(|e| DspError::extraction(path, e))
}

/// Collects the text runs of every `w:p` paragraph, table cells included, in
/// document order. Paragraphs are joined with newlines.
fn paragraphs_from_xml(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text_run => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}
