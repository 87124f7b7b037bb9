use crate::event::Event;
use crate::parser::Grammar;

/// Grammar for a declared honeypot whose log format is not handled yet.
/// Every line yields no event.
#[derive(Debug, Clone)]
pub struct PlaceholderGrammar {
    name: String,
}

impl PlaceholderGrammar {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Grammar for PlaceholderGrammar {
    fn parse(&self, _line: &str) -> Option<Event> {
        None
    }

    fn name(&self) -> &str {
        &self.name
    }
}
