use crate::extract::types::{Availability, CartItem, OrderItem};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price deltas below this are floating-point noise, not price changes;
/// sub-cent, so never a real price distinction
pub const PRICE_EPSILON: f64 = 0.001;

/// Round a money value to two decimals at the reporting boundary
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A quantity change on an item present in both snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuantityChange {
    /// The item as it currently appears in the cart
    pub item: CartItem,
    /// Quantity in the baseline order
    pub original_quantity: u32,
    /// Quantity in the current cart
    pub new_quantity: u32,
}

/// A unit-price change on an item present in both snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    /// The item as it currently appears in the cart
    pub item: CartItem,
    /// Unit price in the baseline order
    pub original_price: f64,
    /// Unit price in the current cart
    pub new_price: f64,
}

/// Per-category counts plus the overall price delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub added_count: usize,
    pub removed_count: usize,
    pub quantity_changed_count: usize,
    pub price_changed_count: usize,
    pub unavailable_count: usize,
    /// `round2(Σ current price×quantity − Σ baseline line totals)`
    pub price_difference: f64,
}

/// Categorized comparison of a baseline order against the current cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartDiff {
    /// Items only in the current cart
    pub added: Vec<CartItem>,
    /// Baseline items missing from the current cart
    pub removed: Vec<CartItem>,
    /// Items in both snapshots whose quantity differs
    pub quantity_changed: Vec<QuantityChange>,
    /// Items in both snapshots whose unit price differs beyond the epsilon
    pub price_changed: Vec<PriceChange>,
    /// Items in both snapshots that are out of stock or zero-quantity
    pub now_unavailable: Vec<CartItem>,
    /// Counts per category; always equal to the list lengths
    pub summary: DiffSummary,
}

/// Compare a baseline order snapshot against the current cart, keyed by
/// product id.
///
/// Pure and total: no I/O, no document access, never fails on well-typed
/// input. Items present only in the current cart are added; baseline items
/// missing from the cart are removed (converted to cart-shaped records
/// tagged as coming from the original order). For items present on both
/// sides, unavailability (out of stock or zero quantity) takes precedence
/// but does not suppress the independent quantity and price checks.
///
/// Precondition: product ids are stable across the two extractions. An item
/// whose id changed between snapshots shows up as one add plus one remove.
pub fn diff_carts(baseline: &[OrderItem], current: &[CartItem]) -> CartDiff {
    let baseline_by_id: HashMap<&str, &OrderItem> = baseline
        .iter()
        .map(|item| (item.product_id.as_str(), item))
        .collect();
    let current_by_id: HashMap<&str, &CartItem> = current
        .iter()
        .map(|item| (item.product_id.as_str(), item))
        .collect();

    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut quantity_changed = Vec::new();
    let mut price_changed = Vec::new();
    let mut now_unavailable = Vec::new();

    // Current-cart order for added and in-both categories
    for item in current {
        let Some(original) = baseline_by_id.get(item.product_id.as_str()) else {
            added.push(item.clone());
            continue;
        };

        if item.availability == Availability::OutOfStock || item.quantity == 0 {
            let mut unavailable = item.clone();
            unavailable.from_original_order = true;
            unavailable.original_quantity = Some(original.quantity);
            now_unavailable.push(unavailable);
        }

        if original.quantity != item.quantity {
            quantity_changed.push(QuantityChange {
                item: item.clone(),
                original_quantity: original.quantity,
                new_quantity: item.quantity,
            });
        }

        if (original.unit_price - item.price).abs() > PRICE_EPSILON {
            price_changed.push(PriceChange {
                item: item.clone(),
                original_price: round2(original.unit_price),
                new_price: round2(item.price),
            });
        }
    }

    // Baseline order for removed
    for item in baseline {
        if !current_by_id.contains_key(item.product_id.as_str()) {
            removed.push(CartItem {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price: item.unit_price,
                availability: Availability::Unknown,
                from_original_order: true,
                original_quantity: Some(item.quantity),
            });
        }
    }

    let current_total: f64 = current
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum();
    let baseline_total: f64 = baseline.iter().map(|item| item.line_total).sum();

    let summary = DiffSummary {
        added_count: added.len(),
        removed_count: removed.len(),
        quantity_changed_count: quantity_changed.len(),
        price_changed_count: price_changed.len(),
        unavailable_count: now_unavailable.len(),
        price_difference: round2(current_total - baseline_total),
    };

    CartDiff {
        added,
        removed,
        quantity_changed,
        price_changed,
        now_unavailable,
        summary,
    }
}
