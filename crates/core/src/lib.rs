//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used across all storefront components:
//! - `storefront` - Cart, wishlist, notification and catalog state
//! - `cli` - Command-line view layer over the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no persistence,
//! no timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, ratings, emails and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
