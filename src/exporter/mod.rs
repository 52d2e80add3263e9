// file: src/exporter/mod.rs
// description: artifact export module exports
// reference: internal module structure

pub mod json;

pub use json::JsonExporter;
