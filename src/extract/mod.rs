//! Typed snapshot extraction from live pages.
//!
//! The [`SnapshotExtractor`] drives the resolver against the orders and cart
//! pages and turns raw element text into [`OrderItem`]/[`CartItem`] records,
//! with locale-aware parsing for the storefront's Brazilian-Portuguese
//! formats. Item-level noise is skipped and recorded as warnings; a missing
//! container fails the call, because that means the page is not in the
//! expected state at all.

pub mod bindings;
pub mod extractor;
pub mod parse;
pub mod types;

pub use extractor::SnapshotExtractor;
pub use types::{Availability, CartItem, Extraction, OrderItem};
