//! # recart
//!
//! A Rust library for extracting and reconciling shopping-cart state from a
//! frequently-changing e-commerce site, via Chrome DevTools Protocol (CDP).
//!
//! The hard problem this crate solves is not browser automation itself but
//! surviving an unstable, unversioned external interface (the target
//! site's markup) while still producing a deterministic, typed view of
//! what changed between two states of a cart.
//!
//! ## Features
//!
//! - **Selector Registry**: named, versioned element-location strategies per
//!   page, with ranked fallback chains loaded from JSON packs
//! - **Resolver**: walks a fallback chain against a live document, returns
//!   the first strategy with a unique match, and reports which one won so
//!   selector degradation is visible before the whole chain rots
//! - **Snapshot Extraction**: typed order/cart records with locale-aware
//!   parsing, tolerating per-item noise while failing loudly on structural
//!   absence
//! - **Cart Diff Engine**: pure comparison of two snapshots into a
//!   categorized diff with summary statistics
//!
//! ## Diffing two snapshots
//!
//! The diff engine needs nothing but the snapshots:
//!
//! ```rust
//! use recart::diff::{diff_carts, has_changes};
//! use recart::extract::{Availability, CartItem, OrderItem};
//!
//! let baseline = vec![OrderItem {
//!     product_id: "A".to_string(),
//!     name: "Café Torrado 500g".to_string(),
//!     quantity: 2,
//!     unit_price: 1.0,
//!     line_total: 2.0,
//!     category: None,
//!     image_url: None,
//! }];
//! let current = vec![CartItem {
//!     product_id: "A".to_string(),
//!     name: "Café Torrado 500g".to_string(),
//!     quantity: 3,
//!     price: 1.0,
//!     availability: Availability::Available,
//!     from_original_order: true,
//!     original_quantity: Some(2),
//! }];
//!
//! let diff = diff_carts(&baseline, &current);
//! assert!(has_changes(&diff));
//! assert_eq!(diff.quantity_changed.len(), 1);
//! ```
//!
//! ## Extracting from a live page
//!
//! ```rust,no_run
//! use recart::extract::SnapshotExtractor;
//! use recart::resolve::{CdpDocument, Resolver, ResolverConfig};
//! use recart::selectors::{PageSelectorFile, SelectorRegistry};
//!
//! # fn main() -> recart::Result<()> {
//! # let pack_json = "";
//! # let tab: &headless_chrome::Tab = unimplemented!();
//! let mut registry = SelectorRegistry::new();
//! registry.register(PageSelectorFile::from_json(pack_json)?.into_set()?)?;
//!
//! // The tab is already navigated and logged in by the layers above
//! let ctx = CdpDocument::new(tab);
//! let extractor = SnapshotExtractor::new(&registry, Resolver::new(ResolverConfig::default()));
//! let cart = extractor.extract_cart(&ctx)?;
//! println!("{} items, {} warnings", cart.items.len(), cart.warnings.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`selectors`]: strategy/entry types, versioned registry, JSON pack format
//! - [`resolve`]: the [`DocumentContext`](resolve::DocumentContext) capability
//!   trait, the fallback resolver, and the CDP-backed context
//! - [`extract`]: typed snapshots and the order/cart extractors
//! - [`diff`]: the pure reconciliation engine and its analysis helpers
//! - [`error`]: error taxonomy with stable codes and recoverability flags

pub mod diff;
pub mod error;
pub mod extract;
pub mod resolve;
pub mod selectors;

pub use diff::{CartDiff, DiffSummary, diff_carts};
pub use error::{AutomationError, ErrorCode, Result};
pub use extract::{Availability, CartItem, Extraction, OrderItem, SnapshotExtractor};
pub use resolve::{CdpDocument, DocumentContext, Resolution, Resolver, ResolverConfig};
pub use selectors::{
    PageSelectorFile, PageSelectorSet, SelectorEntry, SelectorIndex, SelectorKind,
    SelectorRegistry, SelectorStrategy,
};
