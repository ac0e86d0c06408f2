//! Pure helpers over a computed [`CartDiff`].
//!
//! Orchestration layers should use these, not "the click did not throw",
//! as the success predicate after any cart-mutating action.

use crate::diff::engine::CartDiff;
use crate::extract::types::CartItem;

/// True when any category of the diff is non-empty
pub fn has_changes(diff: &CartDiff) -> bool {
    !diff.added.is_empty()
        || !diff.removed.is_empty()
        || !diff.quantity_changed.is_empty()
        || !diff.price_changed.is_empty()
        || !diff.now_unavailable.is_empty()
}

/// True when the diff needs a human decision before checkout: anything
/// unavailable, anything removed, or a total price delta beyond the
/// caller's threshold
pub fn requires_user_attention(diff: &CartDiff, price_threshold: f64) -> bool {
    !diff.now_unavailable.is_empty()
        || !diff.removed.is_empty()
        || diff.summary.price_difference.abs() > price_threshold
}

/// Unavailable items that trace back to the baseline order, the ones a
/// substitution flow should offer replacements for
pub fn items_needing_substitution(diff: &CartDiff) -> Vec<&CartItem> {
    diff.now_unavailable
        .iter()
        .filter(|item| item.from_original_order)
        .collect()
}

/// Share of the baseline order that is still obtainable: items neither
/// removed nor now unavailable, as a percentage of `baseline_count`.
/// An empty baseline is fully obtainable.
pub fn availability_percentage(diff: &CartDiff, baseline_count: usize) -> f64 {
    if baseline_count == 0 {
        return 100.0;
    }
    let lost = diff.removed.len() + diff.now_unavailable.len();
    let obtainable = baseline_count.saturating_sub(lost);
    (obtainable as f64 / baseline_count as f64) * 100.0
}

/// One-paragraph human-readable description of the diff
pub fn summarize(diff: &CartDiff) -> String {
    if !has_changes(diff) {
        return "Cart matches the original order.".to_string();
    }

    let mut parts = Vec::new();
    let count = |n: usize, singular: &str, plural: &str| {
        format!("{} {}", n, if n == 1 { singular } else { plural })
    };

    if !diff.added.is_empty() {
        parts.push(format!("{} added", count(diff.added.len(), "item", "items")));
    }
    if !diff.removed.is_empty() {
        parts.push(format!("{} removed", count(diff.removed.len(), "item", "items")));
    }
    if !diff.quantity_changed.is_empty() {
        parts.push(count(
            diff.quantity_changed.len(),
            "quantity change",
            "quantity changes",
        ));
    }
    if !diff.price_changed.is_empty() {
        parts.push(count(diff.price_changed.len(), "price change", "price changes"));
    }
    if !diff.now_unavailable.is_empty() {
        parts.push(format!(
            "{} unavailable",
            count(diff.now_unavailable.len(), "item", "items")
        ));
    }

    let delta = diff.summary.price_difference;
    if delta != 0.0 {
        parts.push(format!("total {}{:.2}", if delta > 0.0 { "+" } else { "" }, delta));
    }

    format!("Cart changed: {}.", parts.join(", "))
}
