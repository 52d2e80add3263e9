// file: src/render/template.rs
// description: placeholder substitution for the report page template
// reference: https://docs.rs/regex

use crate::error::{DspError, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const DEFAULT_REPORT: &str = include_str!("../../templates/report.html");

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{([a-z_]+)\}").expect("PLACEHOLDER regex is valid");
}

/// A text template with `{name}` placeholders. Substitution is a single pass,
/// so placeholder-looking text inside substituted values is left alone.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    template: String,
}

impl ReportTemplate {
    pub fn new() -> Self {
        Self {
            template: DEFAULT_REPORT.to_string(),
        }
    }

    pub fn with_custom_template(template: String) -> Self {
        Self { template }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let template =
            fs::read_to_string(path).map_err(|source| DspError::file_operation(path, source))?;
        debug!("Loaded report template from {}", path.display());
        Ok(Self { template })
    }

    /// Loads `path` when it exists, otherwise the built-in page.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!(
                "No report template at {}, using built-in template",
                path.display()
            );
            Ok(Self::new())
        }
    }

    pub fn render(&self, values: &HashMap<&str, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| {
                values
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn placeholders(&self) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self::new()
    }
}
