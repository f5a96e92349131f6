//! Shopfront Storefront library.
//!
//! Client-side state for the E-Store storefront: the cart and wishlist
//! stores, the notification queue they report to, and the persistence
//! adapter that mirrors both lists into an opaque key-value blob store.
//!
//! # Architecture
//!
//! - [`notifications`] - toast queue with timed auto-dismiss (leaf)
//! - [`blob`] / [`persistence`] - blob store backends and the generic list adapter (leaf)
//! - [`cart`] / [`wishlist`] - the two stores, each depending on both leaves
//! - [`catalog`], [`auth`], [`theme`], [`reviews`] - collaborators the views consume
//! - [`state`] - the [`Storefront`](state::Storefront) built once at startup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod blob;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notifications;
pub mod persistence;
pub mod reviews;
pub mod state;
pub mod theme;
pub mod wishlist;

pub use error::{AppError, Result};
pub use state::Storefront;
