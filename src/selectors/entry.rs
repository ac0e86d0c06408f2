use crate::error::{AutomationError, Result};
use crate::selectors::strategy::SelectorStrategy;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named element lookup: one primary strategy plus a ranked fallback chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectorEntry {
    /// Logical name of the element this entry locates, e.g. `cart_item_list`
    pub name: String,

    /// The preferred strategy, tried first on every resolution
    pub primary: SelectorStrategy,

    /// Fallbacks tried in order after the primary; must be sorted by
    /// non-increasing stability score
    #[serde(default)]
    pub fallbacks: Vec<SelectorStrategy>,

    /// Whether this entry has been validated against a live page. Unverified
    /// entries are still usable; callers may apply stricter checks.
    #[serde(default)]
    pub verified: bool,
}

impl SelectorEntry {
    /// Create an entry with no fallbacks
    pub fn new(name: impl Into<String>, primary: SelectorStrategy) -> Self {
        Self {
            name: name.into(),
            primary,
            fallbacks: Vec::new(),
            verified: false,
        }
    }

    /// Builder method: append a fallback strategy
    pub fn with_fallback(mut self, fallback: SelectorStrategy) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// Builder method: mark the entry as verified against a live page
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// All strategies in resolution order: primary first, then fallbacks
    pub fn chain(&self) -> impl Iterator<Item = &SelectorStrategy> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    /// Check the fallback-ordering invariant
    pub fn validate(&self) -> Result<()> {
        let sorted = self
            .fallbacks
            .windows(2)
            .all(|pair| pair[0].stability_score >= pair[1].stability_score);
        if !sorted {
            return Err(AutomationError::Validation(format!(
                "entry '{}': fallbacks must be ordered by non-increasing stability score",
                self.name
            )));
        }
        Ok(())
    }
}

/// An immutable, versioned publication of one page's selector entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSelectorSet {
    /// Logical page id, e.g. `orders` or `cart`
    pub page_id: String,

    /// Publication number, starting at 1. Corrections publish a new version,
    /// never edit an existing one.
    pub version: u32,

    /// Pattern the canonical page URL must match
    pub url_pattern: String,

    /// Entries by logical name, in publication order
    pub entries: IndexMap<String, SelectorEntry>,
}

impl PageSelectorSet {
    /// Create an empty set for a page
    pub fn new(page_id: impl Into<String>, version: u32, url_pattern: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            version,
            url_pattern: url_pattern.into(),
            entries: IndexMap::new(),
        }
    }

    /// Builder method: add an entry keyed by its own name
    pub fn with_entry(mut self, entry: SelectorEntry) -> Self {
        self.entries.insert(entry.name.clone(), entry);
        self
    }

    /// Look up an entry by logical name
    pub fn entry(&self, name: &str) -> Option<&SelectorEntry> {
        self.entries.get(name)
    }

    /// Check set-level invariants: version >= 1, every entry valid, map keys
    /// consistent with entry names
    pub fn validate(&self) -> Result<()> {
        if self.version < 1 {
            return Err(AutomationError::Validation(format!(
                "page '{}': version must be >= 1",
                self.page_id
            )));
        }
        for (key, entry) in &self.entries {
            if key != &entry.name {
                return Err(AutomationError::Validation(format!(
                    "page '{}': entry keyed '{}' names itself '{}'",
                    self.page_id, key, entry.name
                )));
            }
            entry.validate()?;
        }
        Ok(())
    }
}
