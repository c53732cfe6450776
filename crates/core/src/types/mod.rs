//! Core types for Cartwheel.
//!
//! Type-safe wrappers for identifiers and money, plus the records held in the
//! application store.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::Product;
pub use user::{Registration, User};
