//! Cartwheel Core - Shared domain types.
//!
//! This crate provides the types that flow between the remote catalog/account
//! API, the per-session application store, and the views:
//! - [`User`] - the signed-in shopper, as returned by the remote service
//! - [`Product`] - a catalog entry
//! - [`CartItem`] - a cart line with a price snapshot taken at add-time
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no state.
//! Everything here is a plain value that can be cloned into a snapshot.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, and the catalog/cart/user records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
