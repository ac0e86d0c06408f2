//! Deterministic in-memory document context for unit tests.
//!
//! Strategies are matched by their description, so tests script exactly which
//! strategy yields which handles without a browser in the loop.

use crate::error::{AutomationError, Result};
use crate::resolve::context::DocumentContext;
use crate::selectors::SelectorStrategy;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Scriptable [`DocumentContext`] whose handles are plain integers
#[derive(Default)]
pub struct FakeDocument {
    matches: HashMap<String, Vec<u32>>,
    scoped: HashMap<(u32, String), Vec<u32>>,
    failures: HashMap<String, String>,
    texts: HashMap<u32, String>,
    attributes: HashMap<(u32, String), String>,
    evaluated: RefCell<Vec<String>>,
    hidden_polls: Cell<u32>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the document-rooted matches for a strategy
    pub fn with_matches(mut self, strategy: &SelectorStrategy, handles: &[u32]) -> Self {
        self.matches.insert(strategy.describe(), handles.to_vec());
        self
    }

    /// Script the matches for a strategy under a scope handle
    pub fn with_scoped_matches(
        mut self,
        scope: u32,
        strategy: &SelectorStrategy,
        handles: &[u32],
    ) -> Self {
        self.scoped
            .insert((scope, strategy.describe()), handles.to_vec());
        self
    }

    /// Script a context failure for a strategy
    pub fn with_failure(mut self, strategy: &SelectorStrategy, message: &str) -> Self {
        self.failures.insert(strategy.describe(), message.to_string());
        self
    }

    /// Script an element's text
    pub fn with_text(mut self, handle: u32, text: &str) -> Self {
        self.texts.insert(handle, text.to_string());
        self
    }

    /// Script an element's attribute
    pub fn with_attribute(mut self, handle: u32, name: &str, value: &str) -> Self {
        self.attributes
            .insert((handle, name.to_string()), value.to_string());
        self
    }

    /// Make every lookup return empty for the first `polls` calls, to
    /// exercise the resolver's bounded wait
    pub fn visible_after(self, polls: u32) -> Self {
        self.hidden_polls.set(polls);
        self
    }

    /// Descriptions of every strategy evaluated document-rooted, in order
    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.borrow().clone()
    }

    fn still_hidden(&self) -> bool {
        let remaining = self.hidden_polls.get();
        if remaining > 0 {
            self.hidden_polls.set(remaining - 1);
            return true;
        }
        false
    }
}

impl DocumentContext for FakeDocument {
    type Handle = u32;

    fn find_matches(&self, strategy: &SelectorStrategy) -> Result<Vec<u32>> {
        let key = strategy.describe();
        self.evaluated.borrow_mut().push(key.clone());

        if let Some(message) = self.failures.get(&key) {
            return Err(AutomationError::Unknown(message.clone()));
        }
        if self.still_hidden() {
            return Ok(Vec::new());
        }
        Ok(self.matches.get(&key).cloned().unwrap_or_default())
    }

    fn find_matches_within(&self, scope: &u32, strategy: &SelectorStrategy) -> Result<Vec<u32>> {
        let key = strategy.describe();
        if let Some(message) = self.failures.get(&key) {
            return Err(AutomationError::Unknown(message.clone()));
        }
        if self.still_hidden() {
            return Ok(Vec::new());
        }
        Ok(self
            .scoped
            .get(&(*scope, key))
            .cloned()
            .unwrap_or_default())
    }

    fn text_of(&self, handle: &u32) -> Result<String> {
        self.texts
            .get(handle)
            .cloned()
            .ok_or_else(|| AutomationError::Unknown(format!("no text for handle {}", handle)))
    }

    fn attribute_of(&self, handle: &u32, name: &str) -> Result<Option<String>> {
        Ok(self.attributes.get(&(*handle, name.to_string())).cloned())
    }
}
