//! Shared vocabulary between selector packs and the extractors.
//!
//! Selector packs are authored out-of-band; these names are the contract
//! that lets a pack published for the live site drive the extractors without
//! code changes. A pack missing a required name fails the extraction with a
//! registry lookup error, which is the intended loud failure for a
//! misconfigured deployment.

/// Logical page ids
pub mod page {
    /// Past-orders page
    pub const ORDERS: &str = "orders";
    /// Current-cart page
    pub const CART: &str = "cart";
}

/// Logical entry names within a page's selector set
pub mod entry {
    /// Container holding every order line; missing container fails the call
    pub const ORDER_LIST: &str = "order_list";
    /// One order line inside the container
    pub const ORDER_ITEM: &str = "order_item";
    /// Container holding every cart line; missing container fails the call
    pub const CART_ITEM_LIST: &str = "cart_item_list";
    /// One cart line inside the container
    pub const CART_ITEM: &str = "cart_item";

    /// Item display name, within a line
    pub const ITEM_NAME: &str = "item_name";
    /// Unit price, within a line
    pub const ITEM_PRICE: &str = "item_price";
    /// Quantity marker, within a line; absent means a single unit
    pub const ITEM_QUANTITY: &str = "item_quantity";
    /// Line total, within an order line; absent falls back to price*quantity
    pub const ITEM_LINE_TOTAL: &str = "item_line_total";
    /// Availability marker, within a cart line; absent means in stock
    pub const ITEM_AVAILABILITY: &str = "item_availability";
    /// Category label, within an order line (optional)
    pub const ITEM_CATEGORY: &str = "item_category";
    /// Product image, within an order line (optional)
    pub const ITEM_IMAGE: &str = "item_image";

    /// Page-level "38 Produtos" style count banner (optional)
    pub const ITEM_COUNT: &str = "item_count";
}

/// Row attributes probed, in order, for a stable product id
pub const PRODUCT_ID_ATTRIBUTES: &[&str] = &["data-product-id", "data-sku", "data-asin", "id"];
