// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod processor;
mod progress;

pub use processor::{DspArtifacts, DspProcessor, ProjectRequest, STDIN_IDENTIFIER, SUMMARY_FILE};
pub use progress::{PipelineStats, ProgressTracker};
