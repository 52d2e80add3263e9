// file: src/render/mod.rs
// description: report rendering module exports
// reference: internal module structure

pub mod html;
pub mod pdf;
pub mod template;

pub use html::{ReportRenderer, escape_html, markdown_to_html};
pub use pdf::PdfConverter;
pub use template::ReportTemplate;
