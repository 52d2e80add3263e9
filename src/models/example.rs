// file: src/models/example.rs
// description: previously approved example document held in the knowledge base
// reference: internal data structures

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDocument {
    /// File name the text was read from
    pub source: String,
    pub text: String,
}

impl ExampleDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    pub fn labeled(&self) -> String {
        format!(
            "--- START EXAMPLE DSP: {} ---\n{}\n--- END EXAMPLE DSP ---\n",
            self.source, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_wraps_source() {
        let doc = ExampleDocument::new("genomics.docx", "All data is encrypted.");
        let labeled = doc.labeled();

        assert!(labeled.starts_with("--- START EXAMPLE DSP: genomics.docx ---\n"));
        assert!(labeled.contains("All data is encrypted."));
        assert!(labeled.ends_with("--- END EXAMPLE DSP ---\n"));
    }
}
