// file: src/knowledge/retrieval.rs
// description: strategies for choosing the reference text handed to each section prompt
// reference: knowledge base retrieval modes

use crate::config::RetrievalMode;
use crate::knowledge::base::KnowledgeBase;
use std::borrow::Cow;
use std::sync::Arc;

/// Supplies the reference material for one section prompt.
pub trait ContextStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn context_for(&self, section_title: &str) -> Cow<'_, str>;
}

/// The whole corpus, labeled per source. Resolved once at construction.
pub struct FullCorpus {
    context: String,
}

impl FullCorpus {
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self {
            context: kb.get_full_context(),
        }
    }
}

impl ContextStrategy for FullCorpus {
    fn name(&self) -> &'static str {
        "full"
    }

    fn context_for(&self, _section_title: &str) -> Cow<'_, str> {
        Cow::Borrowed(&self.context)
    }
}

/// Legacy title-match excerpts. Fragile: misses sections whose wording differs
/// from the title and picks up incidental matches such as a table of contents.
pub struct SectionExcerpts {
    kb: Arc<KnowledgeBase>,
    window: usize,
}

impl SectionExcerpts {
    pub fn new(kb: Arc<KnowledgeBase>, window: usize) -> Self {
        Self { kb, window }
    }
}

impl ContextStrategy for SectionExcerpts {
    fn name(&self) -> &'static str {
        "excerpt"
    }

    fn context_for(&self, section_title: &str) -> Cow<'_, str> {
        Cow::Owned(
            self.kb
                .get_relevant_examples_with_window(section_title, self.window),
        )
    }
}

pub fn build_strategy(
    mode: RetrievalMode,
    kb: Arc<KnowledgeBase>,
    window: usize,
) -> Arc<dyn ContextStrategy> {
    match mode {
        RetrievalMode::Full => Arc::new(FullCorpus::new(&kb)),
        RetrievalMode::Excerpt => Arc::new(SectionExcerpts::new(kb, window)),
    }
}
