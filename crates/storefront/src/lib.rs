//! Tee Storefront library.
//!
//! Client-side logic for a single-product page: product data behind a
//! timestamped cache and an hourly fetch limit, and an in-memory cart keyed
//! by size. Rendering is left to the host through [`view::ViewRenderer`].
//!
//! # Modules
//!
//! - [`store`] - Persistent key-value storage (memory and file backed)
//! - [`cache`] - Timestamped product cache
//! - [`rate_limit`] - Hourly remote-fetch limit
//! - [`product`] - Product lookup service and the remote source
//! - [`cart`] - Cart and size selection
//! - [`page`] - Page controller wiring user input to the cart and view
//! - [`view`] - Render and notice traits implemented by the host

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod cart;
pub mod clock;
pub mod config;
pub mod error;
pub mod page;
pub mod product;
pub mod rate_limit;
pub mod store;
pub mod view;

/// How long a cached product and a rate window stay valid: one hour.
pub const TTL_MS: i64 = 60 * 60 * 1000;

/// Remote product fetches allowed per rate window.
pub const CALL_LIMIT: u32 = 5;
