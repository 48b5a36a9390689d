//! In-memory shopping cart.
//!
//! The cart lives for the session only; nothing here touches the store.
//! Line items are keyed by size and kept in insertion order for rendering.

use rust_decimal::Decimal;
use tee_storefront_core::{CartLineItem, CartSnapshot, Size, SizeError};
use thiserror::Error;

/// Name given to every line item; the page sells a single product.
pub const LINE_ITEM_NAME: &str = "Classic Tee";

/// Unit price of every line item.
pub const UNIT_PRICE: Decimal = Decimal::from_parts(75, 0, 0, false, 0);

/// Largest quantity a single line item can hold.
pub const MAX_QUANTITY: u32 = 9_999;

/// Errors that can occur when changing the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Add to cart was requested with no size selected.
    #[error("Please select a size!")]
    NoSizeSelected,
}

/// Ordered, size-keyed cart.
///
/// Holds at most one line item per size. Quantities stay between 1 and
/// [`MAX_QUANTITY`]; setting a quantity of zero or less removes the line.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `size`.
    ///
    /// Increments the existing line for `size` (up to [`MAX_QUANTITY`]), or
    /// appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoSizeSelected` if `size` is empty. The cart is
    /// unchanged on error.
    pub fn add_item(&mut self, size: &str) -> Result<CartSnapshot, CartError> {
        let size = Size::parse(size).map_err(|SizeError::Empty| CartError::NoSizeSelected)?;

        if let Some(item) = self.items.iter_mut().find(|item| item.size == size) {
            item.quantity = item.quantity.saturating_add(1).min(MAX_QUANTITY);
        } else {
            self.items.push(CartLineItem {
                name: LINE_ITEM_NAME.to_string(),
                size,
                price: UNIT_PRICE,
                quantity: 1,
            });
        }

        Ok(self.snapshot())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line; larger quantities are
    /// capped at [`MAX_QUANTITY`]. Sizes not in the cart are ignored; this
    /// never creates a line.
    pub fn set_quantity(&mut self, size: &str, quantity: i64) -> CartSnapshot {
        let Ok(size) = Size::parse(size) else {
            return self.snapshot();
        };

        if quantity <= 0 {
            self.items.retain(|item| item.size != size);
        } else if let Some(item) = self.items.iter_mut().find(|item| item.size == size) {
            item.quantity = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));
        }

        self.snapshot()
    }

    /// Current line items with total and count.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_items(self.items.clone())
    }

    /// Number of line items (not units).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart has no line items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The size currently picked in the size selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedSize(Option<Size>);

impl SelectedSize {
    /// Select `label`, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns `SizeError` if `label` is not a valid size; the previous
    /// selection is kept.
    pub fn select(&mut self, label: &str) -> Result<&Size, SizeError> {
        Ok(self.0.insert(Size::parse(label)?))
    }

    /// The selected size, if any.
    #[must_use]
    pub const fn get(&self) -> Option<&Size> {
        self.0.as_ref()
    }

    /// The selected label, or `""` when nothing is selected.
    #[must_use]
    pub fn label(&self) -> &str {
        self.0.as_ref().map_or("", Size::as_str)
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.0 = None;
    }
}
