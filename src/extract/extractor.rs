use crate::error::Result;
use crate::extract::bindings::{PRODUCT_ID_ATTRIBUTES, entry, page};
use crate::extract::parse;
use crate::extract::types::{Availability, CartItem, Extraction, OrderItem};
use crate::resolve::{DocumentContext, Resolver};
use crate::selectors::{SelectorEntry, SelectorRegistry};

/// Pulls typed order/cart snapshots out of a live page.
///
/// The failure policy is deliberately asymmetric: a container that cannot be
/// resolved fails the whole call (the page is not in the expected state at
/// all), while an individual line that will not parse is skipped with a
/// warning, because partial data is still useful to the diff downstream.
pub struct SnapshotExtractor<'r> {
    registry: &'r SelectorRegistry,
    resolver: Resolver,
}

impl<'r> SnapshotExtractor<'r> {
    /// Create an extractor over a populated registry
    pub fn new(registry: &'r SelectorRegistry, resolver: Resolver) -> Self {
        Self { registry, resolver }
    }

    /// Extract the baseline order snapshot from the past-orders page
    pub fn extract_orders<C: DocumentContext>(&self, ctx: &C) -> Result<Extraction<OrderItem>> {
        let container = self
            .resolver
            .resolve(self.registry.get_entry(page::ORDERS, entry::ORDER_LIST)?, ctx)?;

        let row_entry = self.registry.get_entry(page::ORDERS, entry::ORDER_ITEM)?;
        let rows = self.collect_rows(ctx, &container.handle, row_entry);

        let mut items = Vec::with_capacity(rows.len());
        let mut warnings = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if let Some(item) = self.order_item_from_row(ctx, row, index, &mut warnings)? {
                items.push(item);
            }
        }

        let total_available = self.page_count(ctx, page::ORDERS, items.len(), &mut warnings)?;
        log::info!(
            "extracted {} of {} order items ({} skipped)",
            items.len(),
            total_available,
            warnings.len()
        );

        Ok(Extraction { items, total_available, warnings })
    }

    /// Extract the current cart snapshot from the cart page
    pub fn extract_cart<C: DocumentContext>(&self, ctx: &C) -> Result<Extraction<CartItem>> {
        let container = self.resolver.resolve(
            self.registry.get_entry(page::CART, entry::CART_ITEM_LIST)?,
            ctx,
        )?;

        let row_entry = self.registry.get_entry(page::CART, entry::CART_ITEM)?;
        let rows = self.collect_rows(ctx, &container.handle, row_entry);

        let mut items = Vec::with_capacity(rows.len());
        let mut warnings = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if let Some(item) = self.cart_item_from_row(ctx, row, index, &mut warnings)? {
                items.push(item);
            }
        }

        let total_available = self.page_count(ctx, page::CART, items.len(), &mut warnings)?;
        log::info!(
            "extracted {} of {} cart items ({} skipped)",
            items.len(),
            total_available,
            warnings.len()
        );

        Ok(Extraction { items, total_available, warnings })
    }

    /// Rows inside the container, found by the first strategy in the row
    /// entry's chain that matches anything. Row lookups accept multiple
    /// matches by design; an empty result is an empty list, not an error.
    fn collect_rows<C: DocumentContext>(
        &self,
        ctx: &C,
        container: &C::Handle,
        row_entry: &SelectorEntry,
    ) -> Vec<C::Handle> {
        for strategy in row_entry.chain() {
            match ctx.find_matches_within(container, strategy) {
                Ok(rows) if !rows.is_empty() => {
                    log::debug!("{} rows via {}", rows.len(), strategy.describe());
                    return rows;
                }
                Ok(_) => {}
                Err(e) => {
                    log::debug!("row strategy {} failed: {}", strategy.describe(), e);
                }
            }
        }
        Vec::new()
    }

    fn order_item_from_row<C: DocumentContext>(
        &self,
        ctx: &C,
        row: &C::Handle,
        index: usize,
        warnings: &mut Vec<String>,
    ) -> Result<Option<OrderItem>> {
        let mut skip = |reason: String| {
            log::warn!("order row {}: {}", index + 1, &reason);
            warnings.push(format!("order row {}: {}", index + 1, reason));
        };

        let Some(product_id) = self.product_id_of(ctx, row)? else {
            skip("no stable product id".to_string());
            return Ok(None);
        };

        let Some(name) = self.field_text(ctx, page::ORDERS, entry::ITEM_NAME, row)? else {
            skip(format!("'{}': name not found", product_id));
            return Ok(None);
        };

        let Some(price_text) = self.field_text(ctx, page::ORDERS, entry::ITEM_PRICE, row)? else {
            skip(format!("'{}': price not found", product_id));
            return Ok(None);
        };
        let unit_price = match parse::parse_money(&price_text) {
            Ok(value) => value,
            Err(e) => {
                skip(format!("'{}': {}", product_id, e));
                return Ok(None);
            }
        };

        let quantity = match self.field_text(ctx, page::ORDERS, entry::ITEM_QUANTITY, row)? {
            Some(text) => match parse::parse_quantity(&text) {
                Ok(value) => value,
                Err(e) => {
                    skip(format!("'{}': {}", product_id, e));
                    return Ok(None);
                }
            },
            // A line without a quantity marker is a single unit
            None => 1,
        };

        let line_total = match self.field_text(ctx, page::ORDERS, entry::ITEM_LINE_TOTAL, row)? {
            Some(text) => match parse::parse_money(&text) {
                Ok(value) => value,
                Err(e) => {
                    skip(format!("'{}': {}", product_id, e));
                    return Ok(None);
                }
            },
            None => unit_price * quantity as f64,
        };

        let category = self.field_text(ctx, page::ORDERS, entry::ITEM_CATEGORY, row)?;
        let image_url = self.field_attribute(ctx, page::ORDERS, entry::ITEM_IMAGE, row, "src")?;

        Ok(Some(OrderItem {
            product_id,
            name,
            quantity,
            unit_price,
            line_total,
            category,
            image_url,
        }))
    }

    fn cart_item_from_row<C: DocumentContext>(
        &self,
        ctx: &C,
        row: &C::Handle,
        index: usize,
        warnings: &mut Vec<String>,
    ) -> Result<Option<CartItem>> {
        let mut skip = |reason: String| {
            log::warn!("cart row {}: {}", index + 1, &reason);
            warnings.push(format!("cart row {}: {}", index + 1, reason));
        };

        let Some(product_id) = self.product_id_of(ctx, row)? else {
            skip("no stable product id".to_string());
            return Ok(None);
        };

        let Some(name) = self.field_text(ctx, page::CART, entry::ITEM_NAME, row)? else {
            skip(format!("'{}': name not found", product_id));
            return Ok(None);
        };

        let Some(price_text) = self.field_text(ctx, page::CART, entry::ITEM_PRICE, row)? else {
            skip(format!("'{}': price not found", product_id));
            return Ok(None);
        };
        let price = match parse::parse_money(&price_text) {
            Ok(value) => value,
            Err(e) => {
                skip(format!("'{}': {}", product_id, e));
                return Ok(None);
            }
        };

        let quantity = match self.field_text(ctx, page::CART, entry::ITEM_QUANTITY, row)? {
            Some(text) => match parse::parse_quantity(&text) {
                Ok(value) => value,
                Err(e) => {
                    skip(format!("'{}': {}", product_id, e));
                    return Ok(None);
                }
            },
            None => 1,
        };

        // The storefront only renders a marker when stock is in question
        let availability = match self.field_text(ctx, page::CART, entry::ITEM_AVAILABILITY, row)? {
            Some(text) => parse::parse_availability(&text),
            None => Availability::Available,
        };

        Ok(Some(CartItem {
            product_id,
            name,
            quantity,
            price,
            availability,
            from_original_order: false,
            original_quantity: None,
        }))
    }

    /// Probe the row element for a stable product identifier
    fn product_id_of<C: DocumentContext>(
        &self,
        ctx: &C,
        row: &C::Handle,
    ) -> Result<Option<String>> {
        for attribute in PRODUCT_ID_ATTRIBUTES {
            if let Some(value) = ctx.attribute_of(row, attribute)? {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Ok(Some(trimmed.to_string()));
                }
            }
        }
        Ok(None)
    }

    /// Text of a per-line field. A name absent from the selector pack or an
    /// element absent from this line both yield `None`; only context
    /// failures propagate.
    fn field_text<C: DocumentContext>(
        &self,
        ctx: &C,
        page_id: &str,
        name: &str,
        row: &C::Handle,
    ) -> Result<Option<String>> {
        let Ok(field_entry) = self.registry.get_entry(page_id, name) else {
            return Ok(None);
        };
        match self.resolver.try_resolve_within(field_entry, ctx, row)? {
            Some(resolution) => {
                let text = ctx.text_of(&resolution.handle)?;
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            None => Ok(None),
        }
    }

    /// Attribute of a per-line field element, with the same absence rules as
    /// [`Self::field_text`]
    fn field_attribute<C: DocumentContext>(
        &self,
        ctx: &C,
        page_id: &str,
        name: &str,
        row: &C::Handle,
        attribute: &str,
    ) -> Result<Option<String>> {
        let Ok(field_entry) = self.registry.get_entry(page_id, name) else {
            return Ok(None);
        };
        match self.resolver.try_resolve_within(field_entry, ctx, row)? {
            Some(resolution) => ctx.attribute_of(&resolution.handle, attribute),
            None => Ok(None),
        }
    }

    /// Item count the page claims in its banner, falling back to the number
    /// of parsed items when the banner is absent or unreadable
    fn page_count<C: DocumentContext>(
        &self,
        ctx: &C,
        page_id: &str,
        parsed: usize,
        warnings: &mut Vec<String>,
    ) -> Result<u32> {
        let Ok(count_entry) = self.registry.get_entry(page_id, entry::ITEM_COUNT) else {
            return Ok(parsed as u32);
        };
        match self.resolver.try_resolve(count_entry, ctx)? {
            Some(resolution) => {
                let text = ctx.text_of(&resolution.handle)?;
                match parse::parse_count(&text) {
                    Ok(count) => Ok(count),
                    Err(e) => {
                        warnings.push(format!("count banner: {}", e));
                        Ok(parsed as u32)
                    }
                }
            }
            None => Ok(parsed as u32),
        }
    }
}
