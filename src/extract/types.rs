use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stock state of a cart item at extraction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    OutOfStock,
    Unknown,
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Unknown
    }
}

/// One line of a previously placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Stable product identifier; the join key for reconciliation
    pub product_id: String,

    /// Display name
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Price per unit
    pub unit_price: f64,

    /// Total for the line as the site reported it
    pub line_total: f64,

    /// Site category, when the order page exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Product image URL, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One line of the current cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Stable product identifier; the join key for reconciliation
    pub product_id: String,

    /// Display name
    pub name: String,

    /// Units currently in the cart
    pub quantity: u32,

    /// Current price per unit
    pub price: f64,

    /// Stock state at extraction time
    #[serde(default)]
    pub availability: Availability,

    /// Whether this line traces back to the baseline order
    #[serde(default)]
    pub from_original_order: bool,

    /// Quantity in the baseline order, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_quantity: Option<u32>,
}

/// Result of one extraction pass over a live page.
///
/// `warnings` carries every item that was skipped and why; callers must
/// surface it alongside any diff computed from `items` so consumers know the
/// snapshot may be incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Extraction<T> {
    /// Successfully parsed items
    pub items: Vec<T>,

    /// Item count the page itself claims, e.g. from a "38 Produtos" banner;
    /// falls back to `items.len()` when the page shows no count
    pub total_available: u32,

    /// One entry per item that failed to parse and was skipped
    pub warnings: Vec<String>,
}

impl<T> Extraction<T> {
    /// True when some items were skipped: `items` is usable but incomplete
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}
