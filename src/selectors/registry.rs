use crate::error::{AutomationError, Result};
use crate::selectors::entry::{PageSelectorSet, SelectorEntry};
use indexmap::IndexMap;
use std::collections::HashMap;

/// In-memory index of published selector sets.
///
/// Populated once at startup from definition files and read-only afterwards;
/// consumers receive it by shared reference. Lookups return the highest
/// published version of a page unless the page has been pinned to a specific
/// version.
#[derive(Debug, Default)]
pub struct SelectorRegistry {
    /// Versions per page, keyed by page id, each version list sorted ascending
    pages: IndexMap<String, Vec<PageSelectorSet>>,

    /// Explicit version pins, overriding the highest-version default
    pins: HashMap<String, u32>,
}

impl SelectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a selector set.
    ///
    /// Versioning is append-only and monotonic: a new version must be exactly
    /// `max + 1` (or 1 for a new page). Re-registering an already published
    /// version succeeds only when the content is identical; different content
    /// under an existing version is a configuration defect and fails with a
    /// conflict.
    pub fn register(&mut self, set: PageSelectorSet) -> Result<()> {
        set.validate()?;

        if let Some(versions) = self.pages.get(&set.page_id) {
            if let Some(existing) = versions.iter().find(|v| v.version == set.version) {
                if *existing == set {
                    log::debug!(
                        "page '{}' v{} re-registered with identical content",
                        set.page_id,
                        set.version
                    );
                    return Ok(());
                }
                return Err(AutomationError::Conflict {
                    page_id: set.page_id,
                    version: set.version,
                });
            }
        }

        let max = self
            .pages
            .get(&set.page_id)
            .and_then(|versions| versions.last())
            .map(|v| v.version)
            .unwrap_or(0);
        if set.version != max + 1 {
            return Err(AutomationError::Validation(format!(
                "page '{}': version {} is not append-only (current max is {})",
                set.page_id, set.version, max
            )));
        }

        log::info!(
            "registered page '{}' v{} with {} entries",
            set.page_id,
            set.version,
            set.entries.len()
        );
        self.pages.entry(set.page_id.clone()).or_default().push(set);
        Ok(())
    }

    /// Get the active selector set for a page: the pinned version if one is
    /// set, otherwise the highest published version
    pub fn load_page(&self, page_id: &str) -> Result<&PageSelectorSet> {
        let versions = self
            .pages
            .get(page_id)
            .ok_or_else(|| AutomationError::NotFound(format!("page '{}'", page_id)))?;

        if let Some(&pinned) = self.pins.get(page_id) {
            return versions
                .iter()
                .find(|v| v.version == pinned)
                .ok_or_else(|| {
                    AutomationError::NotFound(format!("page '{}' pinned version {}", page_id, pinned))
                });
        }

        // Non-empty by construction: register() is the only writer
        versions
            .last()
            .ok_or_else(|| AutomationError::NotFound(format!("page '{}'", page_id)))
    }

    /// Get a specific published version of a page
    pub fn load_page_version(&self, page_id: &str, version: u32) -> Result<&PageSelectorSet> {
        self.pages
            .get(page_id)
            .and_then(|versions| versions.iter().find(|v| v.version == version))
            .ok_or_else(|| {
                AutomationError::NotFound(format!("page '{}' version {}", page_id, version))
            })
    }

    /// Get one entry from a page's active set
    pub fn get_entry(&self, page_id: &str, name: &str) -> Result<&SelectorEntry> {
        let set = self.load_page(page_id)?;
        set.entry(name).ok_or_else(|| {
            AutomationError::NotFound(format!("entry '{}' on page '{}'", name, page_id))
        })
    }

    /// All registered page ids, in registration order
    pub fn list_pages(&self) -> Vec<&str> {
        self.pages.keys().map(String::as_str).collect()
    }

    /// Published versions for a page, ascending
    pub fn versions(&self, page_id: &str) -> Result<Vec<u32>> {
        self.pages
            .get(page_id)
            .map(|versions| versions.iter().map(|v| v.version).collect())
            .ok_or_else(|| AutomationError::NotFound(format!("page '{}'", page_id)))
    }

    /// Pin a page to a specific published version
    pub fn pin(&mut self, page_id: &str, version: u32) -> Result<()> {
        // Fail fast if the target does not exist
        self.load_page_version(page_id, version)?;
        self.pins.insert(page_id.to_string(), version);
        Ok(())
    }

    /// Remove a page's version pin, restoring highest-version reads
    pub fn unpin(&mut self, page_id: &str) {
        self.pins.remove(page_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::selectors::strategy::{SelectorKind, SelectorStrategy};

    fn set_with_marker(page: &str, version: u32, marker: &str) -> PageSelectorSet {
        PageSelectorSet::new(page, version, "https://shop.example/cart").with_entry(
            SelectorEntry::new(
                "cart_item_list",
                SelectorStrategy::new(SelectorKind::Id, marker, 95),
            ),
        )
    }

    #[test]
    fn test_register_and_load_highest() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-v1")).unwrap();
        registry.register(set_with_marker("cart", 2, "cart-v2")).unwrap();

        let active = registry.load_page("cart").unwrap();
        assert_eq!(active.version, 2);
        assert_eq!(registry.versions("cart").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_identical_reregistration_is_noop() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();

        assert_eq!(registry.versions("cart").unwrap(), vec![1]);
    }

    #[test]
    fn test_conflicting_reregistration_fails() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();

        let err = registry
            .register(set_with_marker("cart", 1, "different-root"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConflictError);
    }

    #[test]
    fn test_version_gap_rejected() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();

        let err = registry.register(set_with_marker("cart", 3, "cart-v3")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_first_version_must_be_one() {
        let mut registry = SelectorRegistry::new();
        let err = registry.register(set_with_marker("cart", 2, "cart-root")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_missing_page_and_entry() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();

        assert_eq!(
            registry.load_page("orders").unwrap_err().code(),
            ErrorCode::NotFoundError
        );
        assert_eq!(
            registry.get_entry("cart", "order_list").unwrap_err().code(),
            ErrorCode::NotFoundError
        );
        assert!(registry.get_entry("cart", "cart_item_list").is_ok());
    }

    #[test]
    fn test_pinning() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("cart", 1, "cart-v1")).unwrap();
        registry.register(set_with_marker("cart", 2, "cart-v2")).unwrap();

        registry.pin("cart", 1).unwrap();
        assert_eq!(registry.load_page("cart").unwrap().version, 1);

        registry.unpin("cart");
        assert_eq!(registry.load_page("cart").unwrap().version, 2);

        // Pinning a never-published version fails fast
        assert!(registry.pin("cart", 9).is_err());
    }

    #[test]
    fn test_list_pages_in_registration_order() {
        let mut registry = SelectorRegistry::new();
        registry.register(set_with_marker("orders", 1, "orders-root")).unwrap();
        registry.register(set_with_marker("cart", 1, "cart-root")).unwrap();

        assert_eq!(registry.list_pages(), vec!["orders", "cart"]);
    }
}
