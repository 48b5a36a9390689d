//! Product record as served by the remote product endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::Price;

/// A product as returned by the product endpoint.
///
/// The JSON shape is fixed by the endpoint:
///
/// ```json
/// {
///   "imageURL": "https://...",
///   "title": "Classic Tee",
///   "description": "...",
///   "price": 75.0,
///   "sizeOptions": [{ "label": "S" }, { "label": "M" }]
/// }
/// ```
///
/// `title` and `price` are required; the remaining fields default to empty.
/// Records are never edited in place - a refresh replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "sizeOptions", default)]
    pub size_options: Vec<SizeOption>,
}

impl ProductRecord {
    /// The product price in the store currency.
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Size labels in the order the endpoint listed them.
    pub fn size_labels(&self) -> impl Iterator<Item = &str> {
        self.size_options.iter().map(|option| option.label.as_str())
    }
}

/// One selectable size for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub label: String,
}
