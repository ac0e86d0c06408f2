//! Pure cart reconciliation.
//!
//! [`diff_carts`] compares a baseline order snapshot against the current
//! cart and categorizes every product id into added, removed, quantity
//! changed, price changed, or now unavailable, with summary counts and the
//! total price delta. It needs nothing but the two snapshots, no I/O and
//! no document access, and is safe to call from any thread.

pub mod analysis;
pub mod engine;

pub use analysis::{
    availability_percentage, has_changes, items_needing_substitution, requires_user_attention,
    summarize,
};
pub use engine::{CartDiff, DiffSummary, PRICE_EPSILON, PriceChange, QuantityChange, diff_carts, round2};
