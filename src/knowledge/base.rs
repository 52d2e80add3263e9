// file: src/knowledge/base.rs
// description: in-memory corpus of approved example documents
// reference: https://docs.rs/walkdir

use crate::models::ExampleDocument;
use crate::reader::read_file_content;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File-name marker for blank templates that must never be used as examples.
pub const TEMPLATE_MARKER: &str = "Template";
pub const EXCERPT_SEPARATOR: &str = "\n--- EXAMPLE ---\n";
pub const DEFAULT_EXCERPT_WINDOW: usize = 2000;

lazy_static! {
    // blank line followed by a capitalized word
    static ref NEXT_HEADING: Regex =
        Regex::new(r"\n\n[A-Z][a-z]+").expect("NEXT_HEADING regex is valid");
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    examples_dir: PathBuf,
    examples: Vec<ExampleDocument>,
}

impl KnowledgeBase {
    /// Loads every eligible example in `examples_dir` (non-recursive). A missing
    /// directory yields an empty knowledge base.
    pub fn load(examples_dir: impl Into<PathBuf>) -> Self {
        let examples_dir = examples_dir.into();
        let mut kb = Self {
            examples_dir,
            examples: Vec::new(),
        };
        kb.load_examples();
        kb
    }

    pub fn from_examples(examples: Vec<ExampleDocument>) -> Self {
        Self {
            examples_dir: PathBuf::new(),
            examples,
        }
    }

    fn load_examples(&mut self) {
        if !self.examples_dir.is_dir() {
            warn!(
                "Examples directory not found: {}",
                self.examples_dir.display()
            );
            return;
        }

        for entry in WalkDir::new(&self.examples_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if Self::should_skip(&filename) {
                debug!("Skipping example: {}", filename);
                continue;
            }

            let content = read_file_content(entry.path());
            if content.is_empty() {
                debug!("No text extracted from {}", filename);
                continue;
            }

            self.examples.push(ExampleDocument::new(filename, content));
        }

        info!(
            "Loaded {} example DSPs from {}",
            self.examples.len(),
            self.examples_dir.display()
        );
    }

    fn should_skip(filename: &str) -> bool {
        filename.starts_with('.') || filename.contains(TEMPLATE_MARKER)
    }

    pub fn examples(&self) -> &[ExampleDocument] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Every example, each wrapped in start/end labels naming its source.
    pub fn get_full_context(&self) -> String {
        self.examples
            .iter()
            .map(ExampleDocument::labeled)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get_relevant_examples(&self, section_title: &str) -> String {
        self.get_relevant_examples_with_window(section_title, DEFAULT_EXCERPT_WINDOW)
    }

    /// Legacy title-match retrieval. For each example containing the literal
    /// title, takes the text from the match to the next blank-line-then-capital
    /// boundary, or `window` characters when no boundary follows.
    pub fn get_relevant_examples_with_window(&self, section_title: &str, window: usize) -> String {
        if section_title.is_empty() {
            return String::new();
        }

        let excerpts: Vec<&str> = self
            .examples
            .iter()
            .filter_map(|example| extract_excerpt(&example.text, section_title, window))
            .collect();

        debug!(
            "Found {} relevant examples for section '{}'",
            excerpts.len(),
            section_title
        );

        excerpts.join(EXCERPT_SEPARATOR)
    }
}

fn extract_excerpt<'a>(text: &'a str, title: &str, window: usize) -> Option<&'a str> {
    let start = text.find(title)?;
    let after_title = start + title.len();

    let end = match NEXT_HEADING.find(&text[after_title..]) {
        Some(boundary) => after_title + boundary.start(),
        None => text[start..]
            .char_indices()
            .nth(window)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len()),
    };

    Some(&text[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn examples_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_loads_eligible_files_only() {
        let dir = examples_dir(&[
            ("a_example.txt", "This is a test example.\nTitle: Test Section\nBody content."),
            ("b_example.md", "Second example."),
            ("DSP Template.txt", "[PLACEHOLDER]"),
            (".hidden.md", "secret"),
            ("notes.csv", "unsupported"),
        ]);
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.md"), "ignored").unwrap();

        let kb = KnowledgeBase::load(dir.path());

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.examples()[0].source, "a_example.txt");
        assert!(kb.examples()[0].text.contains("Test Section"));
        assert_eq!(kb.examples()[1].source, "b_example.md");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let kb = KnowledgeBase::load("/nonexistent/example_dsps");
        assert!(kb.is_empty());
        assert_eq!(kb.get_full_context(), "");
    }

    #[test]
    fn test_full_context_labels_every_source() {
        let dir = examples_dir(&[("one.txt", "First."), ("two.txt", "Second.")]);
        let kb = KnowledgeBase::load(dir.path());

        let context = kb.get_full_context();
        assert_eq!(
            context,
            "--- START EXAMPLE DSP: one.txt ---\nFirst.\n--- END EXAMPLE DSP ---\n\n\
             --- START EXAMPLE DSP: two.txt ---\nSecond.\n--- END EXAMPLE DSP ---\n"
        );
    }

    #[test]
    fn test_relevant_examples_stop_at_next_heading() {
        let content = "Start\nSection 1\nRelevant content here.\n\nSection 2\nOther content.";
        let kb = KnowledgeBase::from_examples(vec![ExampleDocument::new("ex1.txt", content)]);

        let relevant = kb.get_relevant_examples("Section 1");

        assert_eq!(relevant, "Section 1\nRelevant content here.");
        assert!(!relevant.contains("Other content"));
    }

    #[test]
    fn test_relevant_examples_window_without_boundary() {
        let body = "x".repeat(50);
        let content = format!("Data Storage\n{}", body);
        let kb = KnowledgeBase::from_examples(vec![ExampleDocument::new("ex.txt", content)]);

        let relevant = kb.get_relevant_examples_with_window("Data Storage", 20);
        assert_eq!(relevant.chars().count(), 20);
        assert!(relevant.starts_with("Data Storage"));

        let whole = kb.get_relevant_examples("Data Storage");
        assert_eq!(whole.len(), 13 + 50);
    }

    #[test]
    fn test_relevant_examples_join_matches() {
        let kb = KnowledgeBase::from_examples(vec![
            ExampleDocument::new("a.txt", "Access Control\nMFA everywhere.\n\nBackups\nNightly."),
            ExampleDocument::new("b.txt", "Unrelated text."),
            ExampleDocument::new("c.txt", "Access Control\nBadge readers."),
        ]);

        let relevant = kb.get_relevant_examples("Access Control");
        assert_eq!(
            relevant,
            "Access Control\nMFA everywhere.\n--- EXAMPLE ---\nAccess Control\nBadge readers."
        );
    }

    #[test]
    fn test_relevant_examples_window_respects_char_boundaries() {
        let content = format!("Réseau {}", "é".repeat(10));
        let kb = KnowledgeBase::from_examples(vec![ExampleDocument::new("fr.txt", content)]);

        let relevant = kb.get_relevant_examples_with_window("Réseau", 8);
        assert_eq!(relevant, "Réseau é");
    }

    #[test]
    fn test_no_match_is_empty() {
        let kb = KnowledgeBase::from_examples(vec![ExampleDocument::new("a.txt", "Nothing")]);
        assert_eq!(kb.get_relevant_examples("Incident Response"), "");
    }
}
