//! Core types for the Tee storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod price;
pub mod product;
pub mod size;

pub use cart::{CartLineItem, CartSnapshot};
pub use price::{CurrencyCode, Price};
pub use product::{ProductRecord, SizeOption};
pub use size::{Size, SizeError};
