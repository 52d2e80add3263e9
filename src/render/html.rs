// file: src/render/html.rs
// description: markdown-to-html conversion of drafted sections into the full report page
// reference: https://docs.rs/pulldown-cmark

use crate::config::Config;
use crate::error::Result;
use crate::models::GeneratedSection;
use crate::render::pdf::PdfConverter;
use crate::render::template::ReportTemplate;
use chrono::Local;
use pulldown_cmark::{Options, Parser, html};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const REPORT_PLACEHOLDERS: [&str; 3] = ["project_name", "date", "sections"];

pub struct ReportRenderer {
    template: ReportTemplate,
    converter: PdfConverter,
}

impl ReportRenderer {
    pub fn new(template: ReportTemplate, converter: PdfConverter) -> Self {
        Self {
            template,
            converter,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let template = ReportTemplate::load_or_default(&config.paths.report_template())?;

        let found = template.placeholders();
        for key in REPORT_PLACEHOLDERS {
            if !found.iter().any(|p| p == key) {
                warn!("Report template has no {{{}}} placeholder", key);
            }
        }

        Ok(Self::new(template, PdfConverter::from_config(&config.render)))
    }

    pub fn render_html(&self, project_name: &str, sections: &[GeneratedSection]) -> String {
        let body = sections
            .iter()
            .map(render_section)
            .collect::<Vec<_>>()
            .join("\n");

        let mut values = HashMap::new();
        values.insert("project_name", escape_html(project_name));
        values.insert("date", Local::now().format("%Y-%m-%d").to_string());
        values.insert("sections", body);

        self.template.render(&values)
    }

    pub fn render_markdown(&self, project_name: &str, sections: &[GeneratedSection]) -> String {
        let mut out = format!("# Data Security Plan: {}\n\n", project_name);
        for section in sections {
            out.push_str(&format!("## {}\n\n{}\n\n", section.title, section.content.trim()));
        }
        out
    }

    /// Converts `html` to a PDF at `output_path`. Failures are logged and
    /// reported as `None`.
    pub async fn generate_pdf(&self, html: &str, output_path: &Path) -> Option<PathBuf> {
        self.converter.convert(html, output_path).await
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_section(section: &GeneratedSection) -> String {
    let class = if section.is_error() {
        "dsp-section dsp-error"
    } else {
        "dsp-section"
    };

    format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n<div class=\"dsp-content\">\n{}</div>\n</section>",
        class,
        escape_html(&section.title),
        markdown_to_html(&section.content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;

    fn renderer() -> ReportRenderer {
        ReportRenderer::new(
            ReportTemplate::new(),
            PdfConverter::from_config(&RenderConfig {
                pdf_command: "true".to_string(),
                pdf_args: vec![],
            }),
        )
    }

    fn sections() -> Vec<GeneratedSection> {
        vec![
            GeneratedSection::new("Overview", "The project studies **genomes**."),
            GeneratedSection::new("Storage & Backup", "- NAS\n- Tape"),
            GeneratedSection::new("Transfer", "[[ERROR: Generation failed: timeout]]"),
        ]
    }

    #[test]
    fn test_render_html_keeps_section_order() {
        let html = renderer().render_html("Nebula <Pilot>", &sections());

        assert!(html.contains("<title>Data Security Plan: Nebula &lt;Pilot&gt;</title>"));
        assert!(html.contains("<strong>genomes</strong>"));
        assert!(html.contains("<h2>Storage &amp; Backup</h2>"));
        assert!(html.contains("<li>NAS</li>"));

        let overview = html.find("<h2>Overview</h2>").unwrap();
        let storage = html.find("<h2>Storage &amp; Backup</h2>").unwrap();
        let transfer = html.find("<h2>Transfer</h2>").unwrap();
        assert!(overview < storage && storage < transfer);
    }

    #[test]
    fn test_error_sections_are_flagged() {
        let html = renderer().render_html("P", &sections());
        assert_eq!(html.matches("dsp-section dsp-error").count(), 1);
    }

    #[test]
    fn test_render_markdown() {
        let md = renderer().render_markdown("Nebula", &sections()[..2]);
        assert_eq!(
            md,
            "# Data Security Plan: Nebula\n\n\
             ## Overview\n\nThe project studies **genomes**.\n\n\
             ## Storage & Backup\n\n- NAS\n- Tape\n\n"
        );
    }

    #[test]
    fn test_markdown_tables() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
