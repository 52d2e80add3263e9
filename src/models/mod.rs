// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod example;
pub mod metadata;
pub mod section;

pub use example::ExampleDocument;
pub use metadata::{DataClassification, InfrastructureType, PartialMetadata, ProjectMetadata};
pub use section::{GeneratedSection, TemplateSection};
