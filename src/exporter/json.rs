// file: src/exporter/json.rs
// description: json export of the ordered generation log

use crate::error::{DspError, Result};
use crate::models::GeneratedSection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .map_err(|source| DspError::file_operation(&output_dir, source))?;
        Ok(Self { output_dir, pretty })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `[{title, content}, ...]` in the order given.
    pub fn export_log(&self, file_name: &str, sections: &[GeneratedSection]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);

        let json = if self.pretty {
            serde_json::to_string_pretty(sections)?
        } else {
            serde_json::to_string(sections)?
        };

        fs::write(&path, json).map_err(|source| DspError::file_operation(&path, source))?;

        info!(
            "Generation log with {} sections saved to {}",
            sections.len(),
            path.display()
        );
        Ok(path)
    }

    pub fn read_log(path: &Path) -> Result<Vec<GeneratedSection>> {
        let json =
            fs::read_to_string(path).map_err(|source| DspError::file_operation(path, source))?;
        Ok(serde_json::from_str(&json)?)
    }
}
