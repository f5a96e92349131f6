//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::Product;
pub use rating::{Rating, RatingError};
