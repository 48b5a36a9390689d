//! Cart line items and derived cart snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::Price;
use super::size::Size;

/// One size-keyed entry in the cart.
///
/// A cart holds at most one line item per size. Quantity is always at least 1;
/// a line whose quantity would drop to zero is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub name: String,
    pub size: Size,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Display label, e.g. `Classic Tee (M)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.size)
    }
}

/// Read-only view of the cart for rendering.
///
/// Snapshots are derived from the cart's line items and are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<CartLineItem>,
    /// Sum of price times quantity over all items.
    pub total: Decimal,
    /// Sum of quantities over all items, saturating at `u32::MAX`.
    pub count: u32,
}

impl CartSnapshot {
    /// Build a snapshot from line items, computing total and count.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let total = items.iter().map(CartLineItem::line_total).sum();
        let count = items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity));
        Self {
            items,
            total,
            count,
        }
    }

    /// Returns `true` if the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The total in the store currency.
    #[must_use]
    pub fn display_total(&self) -> Price {
        Price::from_amount(self.total)
    }

    /// Find the line item for a size.
    #[must_use]
    pub fn item(&self, size: &Size) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.size == size)
    }
}
