// file: src/generator/mod.rs
// description: section drafting module exports
// reference: internal module structure

pub mod drafter;
pub mod prompt;
pub mod sanitize;

pub use drafter::{DspGenerator, SectionDraft, error_sentinel};
pub use sanitize::{parse_json_reply, sanitize_content};
