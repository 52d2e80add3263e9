// file: src/models/section.rs
// description: template sections and the drafted sections produced from them
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// One entry of the section template: what to write and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub title: String,
    pub content: String,
}

impl TemplateSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl GeneratedSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// True when the content is a placeholder left in place of a failed draft.
    pub fn is_error(&self) -> bool {
        self.content.trim_start().starts_with("[[ERROR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_structure_parses() {
        let json = r#"[
            {"title": "Project Overview", "body": "Describe the project."},
            {"title": "Data Storage", "body": "Where is data stored?"}
        ]"#;

        let sections: Vec<TemplateSection> = serde_json::from_str(json).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title, "Data Storage");
    }

    #[test]
    fn test_error_detection() {
        assert!(GeneratedSection::new("A", "[[ERROR: Generation failed: timeout]]").is_error());
        assert!(!GeneratedSection::new("A", "The team will encrypt all drives.").is_error());
    }
}
