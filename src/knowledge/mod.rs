// file: src/knowledge/mod.rs
// description: example corpus loading and retrieval module exports
// reference: internal module structure

pub mod base;
pub mod retrieval;

pub use base::KnowledgeBase;
pub use retrieval::{ContextStrategy, FullCorpus, SectionExcerpts, build_strategy};
