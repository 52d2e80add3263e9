// file: src/config.rs
// description: application configuration management with toml, env and dotenv support
// reference: https://docs.rs/config

use crate::error::{DspError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const ENV_PREFIX: &str = "DSP_DRAFTER";
pub const ENV_FILE_VAR: &str = "DSP_DRAFTER_ENV_FILE";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub paths: PathsConfig,
    pub pipeline: PipelineConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Send the response JSON schema to the server instead of relying on local cleanup.
    pub structured_output: bool,
    pub max_attempts: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub projects_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub examples_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub parallel_workers: usize,
    pub retrieval: RetrievalMode,
    pub excerpt_window_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    pub pdf_command: String,
    #[serde(default)]
    pub pdf_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Pass every example document to the model
    #[default]
    Full,
    /// Legacy title-match excerpts, for tight prompt limits
    Excerpt,
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PathsConfig {
    pub fn template_structure(&self) -> PathBuf {
        self.templates_dir.join("dsp_template_structure.json")
    }

    pub fn report_template(&self) -> PathBuf {
        self.templates_dir.join("report.html")
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_env_files();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| DspError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| DspError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| DspError::Config(e.to_string()))?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                model: "gemini-2.5-pro".to_string(),
                request_timeout_secs: 300,
                structured_output: true,
                max_attempts: 5,
                initial_backoff_secs: 4,
                max_backoff_secs: 60,
            },
            paths: PathsConfig {
                projects_dir: PathBuf::from("projects"),
                templates_dir: PathBuf::from("templates"),
                examples_dir: PathBuf::from("example_dsps"),
            },
            pipeline: PipelineConfig {
                parallel_workers: 5,
                retrieval: RetrievalMode::Full,
                excerpt_window_chars: 2000,
            },
            render: RenderConfig {
                pdf_command: "wkhtmltopdf".to_string(),
                pdf_args: vec!["--quiet".to_string()],
            },
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .ok_or_else(|| DspError::Config(format!("{} is not set", API_KEY_VAR)))
    }

    pub fn validate(&self) -> Result<()> {
        self.api_key()?;

        if self.pipeline.parallel_workers == 0 {
            return Err(DspError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_attempts == 0 {
            return Err(DspError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_backoff_secs < self.llm.initial_backoff_secs {
            return Err(DspError::Config(
                "max_backoff_secs must not be smaller than initial_backoff_secs".to_string(),
            ));
        }

        Ok(())
    }
}

/// Candidate `.env` files, most specific first. Values already present in the
/// environment are never overwritten, so the first file to set a key wins.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(explicit) = std::env::var(ENV_FILE_VAR) {
        candidates.push(PathBuf::from(explicit));
    }

    candidates.push(PathBuf::from(".env"));

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("dsp_drafter").join(".env"));
    }

    candidates
}

fn load_env_files() {
    for candidate in env_file_candidates() {
        if !candidate.is_file() {
            continue;
        }

        match dotenvy::from_path(&candidate) {
            Ok(()) => debug!("Loaded environment from {}", candidate.display()),
            Err(e) => warn!("Failed to read {}: {}", candidate.display(), e),
        }
    }
}
