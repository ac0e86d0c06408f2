//! On-disk selector definition format.
//!
//! Selector packs are authored out-of-band by the discovery process: one JSON
//! document per page version, plus a master index mapping each page id to its
//! available versions and the currently active one. This module only parses
//! and validates those documents; reading bytes off disk stays with the
//! caller.

use crate::error::{AutomationError, Result};
use crate::selectors::entry::{PageSelectorSet, SelectorEntry};
use crate::selectors::strategy::SelectorStrategy;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Format revision this module understands
pub const SCHEMA_VERSION: u32 = 1;

/// One page-version selector document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSelectorFile {
    /// Format revision; must equal [`SCHEMA_VERSION`]
    pub schema_version: u32,

    /// Logical page id, e.g. `orders`
    pub page: String,

    /// Publication number of this document
    pub version: u32,

    /// Pattern the canonical page URL must match
    pub url_pattern: String,

    /// Date the selectors were last checked against the live site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_validated: Option<String>,

    /// Free-form discovery notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Selector definitions by logical name
    pub selectors: IndexMap<String, SelectorDef>,
}

/// One named selector definition inside a page document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectorDef {
    /// Logical name; must match the key this definition is stored under
    pub name: String,

    /// Preferred strategy
    pub primary: SelectorStrategy,

    /// Ranked fallbacks, best first
    #[serde(default)]
    pub fallbacks: Vec<SelectorStrategy>,

    /// Overall durability estimate the discovery process assigned to the
    /// whole chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,

    /// Why this chain was chosen, for the next person updating the pack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Whether the chain was validated against a live page
    #[serde(default)]
    pub verified: bool,
}

/// Master index mapping page ids to their published versions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectorIndex {
    /// Format revision; must equal [`SCHEMA_VERSION`]
    pub schema_version: u32,

    /// Per-page version inventory
    pub pages: IndexMap<String, PageVersions>,
}

/// Version inventory for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageVersions {
    /// All published versions, ascending
    pub versions: Vec<u32>,

    /// The version consumers should use
    pub active: u32,
}

impl PageSelectorFile {
    /// Parse a page document from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PageSelectorFile = serde_json::from_str(json)
            .map_err(|e| AutomationError::Validation(format!("malformed selector file: {}", e)))?;
        file.check()?;
        Ok(file)
    }

    fn check(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(AutomationError::Validation(format!(
                "selector file for page '{}': unsupported schema version {}",
                self.page, self.schema_version
            )));
        }
        for (key, def) in &self.selectors {
            if key != &def.name {
                return Err(AutomationError::Validation(format!(
                    "page '{}': selector keyed '{}' names itself '{}'",
                    self.page, key, def.name
                )));
            }
        }
        Ok(())
    }

    /// Convert into the registry's domain type, enforcing entry invariants
    pub fn into_set(self) -> Result<PageSelectorSet> {
        let mut set = PageSelectorSet::new(self.page, self.version, self.url_pattern);
        for (name, def) in self.selectors {
            let entry = SelectorEntry {
                name,
                primary: def.primary,
                fallbacks: def.fallbacks,
                verified: def.verified,
            };
            set.entries.insert(entry.name.clone(), entry);
        }
        set.validate()?;
        Ok(set)
    }
}

impl SelectorIndex {
    /// Parse the master index from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let index: SelectorIndex = serde_json::from_str(json)
            .map_err(|e| AutomationError::Validation(format!("malformed selector index: {}", e)))?;

        if index.schema_version != SCHEMA_VERSION {
            return Err(AutomationError::Validation(format!(
                "selector index: unsupported schema version {}",
                index.schema_version
            )));
        }
        for (page, inventory) in &index.pages {
            if !inventory.versions.contains(&inventory.active) {
                return Err(AutomationError::Validation(format!(
                    "selector index: page '{}' activates unpublished version {}",
                    page, inventory.active
                )));
            }
        }
        Ok(index)
    }

    /// Active version for a page, if the page is indexed
    pub fn active(&self, page_id: &str) -> Option<u32> {
        self.pages.get(page_id).map(|inventory| inventory.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::strategy::SelectorKind;

    const CART_FILE: &str = r#"{
        "schemaVersion": 1,
        "page": "cart",
        "version": 1,
        "urlPattern": "https://shop.example/carrinho",
        "lastValidated": "2026-07-14",
        "notes": "captured after the July layout change",
        "selectors": {
            "cart_item_list": {
                "name": "cart_item_list",
                "primary": {"kind": "id", "expression": "cart-items", "stabilityScore": 95},
                "fallbacks": [
                    {"kind": "attribute", "expression": "[data-testid='cart-list']", "stabilityScore": 85},
                    {"kind": "class", "expression": "cart-list", "stabilityScore": 40}
                ],
                "score": 90,
                "reason": "stable id since 2024",
                "verified": true
            }
        }
    }"#;

    #[test]
    fn test_parse_page_file() {
        let file = PageSelectorFile::from_json(CART_FILE).unwrap();
        assert_eq!(file.page, "cart");
        assert_eq!(file.version, 1);
        assert_eq!(file.selectors.len(), 1);

        let def = &file.selectors["cart_item_list"];
        assert_eq!(def.primary.kind, SelectorKind::Id);
        assert_eq!(def.fallbacks.len(), 2);
        assert!(def.verified);
    }

    #[test]
    fn test_into_set_preserves_chain() {
        let set = PageSelectorFile::from_json(CART_FILE).unwrap().into_set().unwrap();
        assert_eq!(set.page_id, "cart");

        let entry = set.entry("cart_item_list").unwrap();
        let scores: Vec<_> = entry.chain().map(|s| s.stability_score).collect();
        assert_eq!(scores, vec![95, 85, 40]);
    }

    #[test]
    fn test_rejects_wrong_schema_version() {
        let json = CART_FILE.replacen("\"schemaVersion\": 1", "\"schemaVersion\": 7", 1);
        assert!(PageSelectorFile::from_json(&json).is_err());
    }

    #[test]
    fn test_rejects_misnamed_selector() {
        let json = CART_FILE.replacen("\"name\": \"cart_item_list\"", "\"name\": \"other\"", 1);
        assert!(PageSelectorFile::from_json(&json).is_err());
    }

    #[test]
    fn test_into_set_rejects_unsorted_fallbacks() {
        let json = CART_FILE
            .replacen("\"stabilityScore\": 85", "\"stabilityScore\": 30", 1);
        let err = PageSelectorFile::from_json(&json).unwrap().into_set().unwrap_err();
        assert!(err.to_string().contains("stability score"));
    }

    #[test]
    fn test_parse_index() {
        let index = SelectorIndex::from_json(
            r#"{
                "schemaVersion": 1,
                "pages": {
                    "orders": {"versions": [1, 2], "active": 2},
                    "cart": {"versions": [1], "active": 1}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(index.active("orders"), Some(2));
        assert_eq!(index.active("cart"), Some(1));
        assert_eq!(index.active("checkout"), None);
    }

    #[test]
    fn test_index_rejects_unpublished_active() {
        let result = SelectorIndex::from_json(
            r#"{
                "schemaVersion": 1,
                "pages": {"orders": {"versions": [1], "active": 3}}
            }"#,
        );
        assert!(result.is_err());
    }
}
