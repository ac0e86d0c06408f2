//! Selector model and versioned registry.
//!
//! A [`SelectorStrategy`] is one way to locate an element, tagged with the
//! kind of expression it carries and a 0-100 stability score. Strategies are
//! grouped into named [`SelectorEntry`]s (primary plus ranked fallbacks),
//! entries into per-page [`PageSelectorSet`]s, and sets into a
//! [`SelectorRegistry`] of immutable, append-only versions. The `defs`
//! module parses the on-disk JSON documents the discovery process publishes.

pub mod defs;
pub mod entry;
pub mod registry;
pub mod strategy;

pub use defs::{PageSelectorFile, SelectorIndex};
pub use entry::{PageSelectorSet, SelectorEntry};
pub use registry::SelectorRegistry;
pub use strategy::{Query, SelectorKind, SelectorStrategy};
