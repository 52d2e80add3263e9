// file: src/pipeline/processor.rs
// description: end-to-end drafting run from summary and template to log, markdown, html and pdf
// reference: bounded concurrent fan-out with index-ordered reassembly

use crate::config::Config;
use crate::error::{DspError, Result};
use crate::exporter::JsonExporter;
use crate::generator::DspGenerator;
use crate::knowledge::{ContextStrategy, KnowledgeBase, build_strategy};
use crate::models::{GeneratedSection, ProjectMetadata, TemplateSection};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::reader::read_file_content;
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

pub const STDIN_IDENTIFIER: &str = "-";
pub const SUMMARY_FILE: &str = "Summary.md";

/// What to draft and where to put it.
#[derive(Debug, Clone, Default)]
pub struct ProjectRequest {
    /// `-` for stdin, a path to a summary file, or a folder name under the projects directory
    pub identifier: Option<String>,
    pub metadata: Option<ProjectMetadata>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DspArtifacts {
    pub project_name: String,
    pub output_dir: PathBuf,
    pub log_path: PathBuf,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
    pub stats: PipelineStats,
}

impl DspArtifacts {
    /// The PDF when conversion succeeded, otherwise the HTML page.
    pub fn final_artifact(&self) -> &Path {
        self.pdf_path.as_deref().unwrap_or(&self.html_path)
    }
}

pub struct DspProcessor {
    config: Config,
    knowledge: Arc<KnowledgeBase>,
    strategy: Arc<dyn ContextStrategy>,
    generator: DspGenerator,
    renderer: crate::render::ReportRenderer,
    show_progress: bool,
    progress_color: bool,
}

impl DspProcessor {
    pub fn new(config: Config, generator: DspGenerator) -> Result<Self> {
        let knowledge = Arc::new(KnowledgeBase::load(&config.paths.examples_dir));
        let strategy = build_strategy(
            config.pipeline.retrieval,
            Arc::clone(&knowledge),
            config.pipeline.excerpt_window_chars,
        );
        let renderer = crate::render::ReportRenderer::from_config(&config)?;

        info!(
            "Knowledge base ready: {} examples, {} retrieval",
            knowledge.len(),
            strategy.name()
        );

        Ok(Self {
            config,
            knowledge,
            strategy,
            generator,
            renderer,
            show_progress: true,
            progress_color: true,
        })
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let generator = DspGenerator::from_config(&config.llm)?;
        Self::new(config, generator)
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.progress_color = colored;
        self
    }

    pub fn generator(&self) -> &DspGenerator {
        &self.generator
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Resolves a summary from stdin (`-`), a direct file path, or
    /// `<projects_dir>/<identifier>/Summary.md`.
    pub async fn get_project_summary(&self, identifier: &str) -> Result<String> {
        if identifier == STDIN_IDENTIFIER {
            let mut summary = String::new();
            tokio::io::stdin().read_to_string(&mut summary).await?;
            return Ok(summary);
        }

        let direct = PathBuf::from(identifier);
        let path = if direct.is_file() {
            direct
        } else {
            let conventional = self.summary_path(identifier);
            if !conventional.is_file() {
                return Err(DspError::not_found(
                    format!("summary for '{}'", identifier),
                    conventional,
                ));
            }
            conventional
        };

        // docx and pdf extraction block
        let shown = path.clone();
        tokio::task::spawn_blocking(move || read_file_content(&path))
            .await
            .map_err(|e| DspError::extraction(&shown, e))
    }

    pub fn load_template_structure(&self) -> Result<Vec<TemplateSection>> {
        let path = self.config.paths.template_structure();
        if !path.is_file() {
            return Err(DspError::not_found("template structure", path));
        }

        let json =
            fs::read_to_string(&path).map_err(|source| DspError::file_operation(&path, source))?;
        let sections: Vec<TemplateSection> = serde_json::from_str(&json)?;

        info!("Loaded {} template sections from {}", sections.len(), path.display());
        Ok(sections)
    }

    fn summary_path(&self, identifier: &str) -> PathBuf {
        self.config
            .paths
            .projects_dir
            .join(identifier)
            .join(SUMMARY_FILE)
    }

    pub fn project_name(request: &ProjectRequest) -> String {
        let from_identifier = request
            .identifier
            .as_deref()
            .filter(|id| *id != STDIN_IDENTIFIER)
            .map(|id| {
                let path = Path::new(id);
                if path.is_file() {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().to_string())
                        .unwrap_or_else(|| id.to_string())
                } else {
                    id.to_string()
                }
            });

        let name = from_identifier
            .or_else(|| request.metadata.as_ref().map(|m| m.project_name.clone()))
            .unwrap_or_else(|| "project".to_string());

        file_safe(&name)
    }

    pub async fn process_project(&self, request: &ProjectRequest) -> Result<DspArtifacts> {
        // inputs first, so a bad identifier never costs a model call
        let summary = match request.identifier.as_deref() {
            Some(identifier) => self.get_project_summary(identifier).await?,
            None => String::new(),
        };
        let template = self.load_template_structure()?;

        let summary = compose_summary(request.metadata.as_ref(), &summary);
        if summary.trim().is_empty() {
            return Err(DspError::Config(
                "No project summary or metadata to draft from".to_string(),
            ));
        }

        let project_name = Self::project_name(request);
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.paths.projects_dir.join(&project_name));
        let exporter = JsonExporter::new(&output_dir, true)?;

        info!(
            "Drafting {} sections for {} into {}",
            template.len(),
            project_name,
            output_dir.display()
        );

        let started = Instant::now();
        let sections = self.generate_sections(&template, &summary).await;
        let stats = PipelineStats::from_sections(&sections, started.elapsed());

        if stats.sections_failed > 0 {
            warn!(
                "{} of {} sections need manual review",
                stats.sections_failed,
                sections.len()
            );
        }

        let log_path = exporter.export_log(&format!("{}_dsp_log.json", project_name), &sections)?;

        let markdown_path = output_dir.join(format!("{}_dsp.md", project_name));
        let markdown = self.renderer.render_markdown(&project_name, &sections);
        fs::write(&markdown_path, markdown)
            .map_err(|source| DspError::file_operation(&markdown_path, source))?;

        let html_path = output_dir.join(format!("{}_dsp.html", project_name));
        let html = self.renderer.render_html(&project_name, &sections);
        fs::write(&html_path, &html)
            .map_err(|source| DspError::file_operation(&html_path, source))?;
        info!("HTML saved to: {}", html_path.display());

        let pdf_path = self
            .renderer
            .generate_pdf(&html, &output_dir.join(format!("{}_dsp.pdf", project_name)))
            .await;

        Ok(DspArtifacts {
            project_name,
            output_dir,
            log_path,
            markdown_path,
            html_path,
            pdf_path,
            stats,
        })
    }

    /// Drafts every section on a bounded pool of tasks. Results come back in
    /// completion order tagged with their template index and are sorted back
    /// into template order before returning. A task that dies yields an error
    /// placeholder for its own section only.
    pub async fn generate_sections(
        &self,
        template: &[TemplateSection],
        project_summary: &str,
    ) -> Vec<GeneratedSection> {
        let workers = self.config.pipeline.parallel_workers.max(1);
        let summary: Arc<str> = Arc::from(project_summary);
        let tracker = Arc::new(if self.show_progress {
            ProgressTracker::new(template.len(), self.progress_color)
        } else {
            ProgressTracker::hidden(template.len())
        });

        let mut results = stream::iter(template.iter().cloned().enumerate().map(
            |(index, section)| {
                let generator = self.generator.clone();
                let strategy = Arc::clone(&self.strategy);
                let summary = Arc::clone(&summary);
                let tracker = Arc::clone(&tracker);

                async move {
                    let title = section.title.clone();

                    let task = tokio::spawn(async move {
                        let context = strategy.context_for(&section.title);
                        let (_, content) = generator
                            .generate_section(&section.title, &section.body, &summary, &context)
                            .await;
                        GeneratedSection::new(section.title.clone(), content)
                    });

                    let generated = match task.await {
                        Ok(generated) => generated,
                        Err(e) => {
                            error!("Section task for '{}' failed: {}", title, e);
                            GeneratedSection::new(
                                title,
                                format!("[[ERROR: Section task failed: {}]]", e),
                            )
                        }
                    };

                    tracker.record(&generated);
                    (index, generated)
                }
            },
        ))
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await;

        tracker.finish();
        info!("Drafted {} of {} sections", tracker.completed(), template.len());

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, section)| section).collect()
    }
}

fn compose_summary(metadata: Option<&ProjectMetadata>, summary: &str) -> String {
    match metadata {
        Some(metadata) if summary.trim().is_empty() => metadata.to_summary_text(),
        Some(metadata) => format!(
            "{}\n**Project Narrative:**\n{}",
            metadata.to_summary_text(),
            summary.trim()
        ),
        None => summary.to_string(),
    }
}

fn file_safe(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "project".to_string()
    } else {
        cleaned
    }
}
