//! Tee Storefront Core - Shared types library.
//!
//! This crate provides the domain types used across the Tee storefront
//! components:
//! - `storefront` - Product page logic (cache, rate limiter, cart) and its host
//! - `cli` - Command-line tools for inspecting the persisted page store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, cart line items, sizes, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
