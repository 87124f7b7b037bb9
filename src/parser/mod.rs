//! Line parsing
//!
//! Each honeypot flavor owns one [`Grammar`]. Grammars are looked up by the
//! honeypot tag (which doubles as the folder name in the log repository)
//! through a [`GrammarRegistry`], so a new honeypot is supported by
//! registering a grammar rather than editing the existing ones.

mod fortipot;
mod placeholder;

pub use fortipot::FortipotGrammar;
pub use placeholder::PlaceholderGrammar;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use crate::event::Event;

pub const FORTIPOT: &str = "fortipot";
pub const COWRIE: &str = "cowrie";
pub const DIONAEA: &str = "dionaea";

/// Turns one trimmed, non-empty log line into an [`Event`]
///
/// Returning `None` means the line is not part of this grammar. That is
/// expected noise in scraped logs, not an error.
pub trait Grammar: Send + Sync {
    fn parse(&self, line: &str) -> Option<Event>;
    fn name(&self) -> &str;
}

/// Tag to grammar mapping used by the pipeline
#[derive(Clone)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Arc<dyn Grammar>>,
}

static DEFAULT_REGISTRY: Lazy<GrammarRegistry> = Lazy::new(GrammarRegistry::with_defaults);

impl GrammarRegistry {
    /// Registry without any grammar
    pub fn empty() -> Self {
        Self {
            grammars: HashMap::new(),
        }
    }

    /// Fortipot plus the declared-but-unimplemented honeypots
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(FORTIPOT, Arc::new(FortipotGrammar::new()));
        registry.register(COWRIE, Arc::new(PlaceholderGrammar::new(COWRIE)));
        registry.register(DIONAEA, Arc::new(PlaceholderGrammar::new(DIONAEA)));
        registry
    }

    /// Register a grammar, returning the one it replaced
    pub fn register<S: Into<String>>(
        &mut self,
        tag: S,
        grammar: Arc<dyn Grammar>,
    ) -> Option<Arc<dyn Grammar>> {
        self.grammars.insert(tag.into(), grammar)
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn Grammar>> {
        self.grammars.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.grammars.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Parse one line with the grammar registered for `tag`
    pub fn parse(&self, line: &str, tag: &str) -> Option<Event> {
        if line.is_empty() {
            return None;
        }
        match self.grammars.get(tag) {
            Some(grammar) => grammar.parse(line),
            None => {
                trace!("No grammar registered for '{}'", tag);
                None
            }
        }
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Parse a raw line with the built-in grammars
pub fn parse(raw_line: &str, honeypot: &str) -> Option<Event> {
    DEFAULT_REGISTRY.parse(raw_line, honeypot)
}
