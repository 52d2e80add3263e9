// file: src/render/pdf.rs
// description: html-to-pdf conversion through an external converter command
// reference: https://docs.rs/tokio/latest/tokio/process

use crate::config::RenderConfig;
use crate::error::{DspError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, info};

/// Runs `<command> <args..> - <output>` with the HTML on stdin, the calling
/// convention shared by wkhtmltopdf and weasyprint.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    command: String,
    args: Vec<String>,
}

impl PdfConverter {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            command: config.pdf_command.clone(),
            args: config.pdf_args.clone(),
        }
    }

    pub async fn convert(&self, html: &str, output_path: &Path) -> Option<PathBuf> {
        match self.try_convert(html, output_path).await {
            Ok(()) => {
                info!("PDF saved to: {}", output_path.display());
                Some(output_path.to_path_buf())
            }
            Err(e) => {
                error!("Failed to generate PDF: {}", e);
                None
            }
        }
    }

    async fn try_convert(&self, html: &str, output_path: &Path) -> Result<()> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg("-")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DspError::Render(format!("Cannot run '{}': {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(DspError::Render(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if !output_path.is_file() {
            return Err(DspError::Render(format!(
                "'{}' did not write {}",
                self.command,
                output_path.display()
            )));
        }

        Ok(())
    }
}
