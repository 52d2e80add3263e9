// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod generator;
pub mod knowledge;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod render;
pub mod utils;

pub use config::{Config, LlmConfig, PathsConfig, PipelineConfig, RenderConfig, RetrievalMode};
pub use error::{DspError, Result};
pub use exporter::JsonExporter;
pub use generator::DspGenerator;
pub use knowledge::{ContextStrategy, KnowledgeBase};
pub use llm::{ChatCompletionsClient, CompletionRequest, LlmTransport, RetryPolicy};
pub use models::{
    DataClassification, ExampleDocument, GeneratedSection, InfrastructureType, PartialMetadata,
    ProjectMetadata, TemplateSection,
};
pub use pipeline::{DspArtifacts, DspProcessor, PipelineStats, ProgressTracker, ProjectRequest};
pub use reader::read_file_content;
pub use render::{ReportRenderer, ReportTemplate};
