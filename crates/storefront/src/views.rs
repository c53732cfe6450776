//! View models shared by the page templates.
//!
//! Templates never see core types directly; everything is pre-formatted here
//! from a store [`Snapshot`].

use cartwheel_core::{CartItem, Product};
use serde::Serialize;

use crate::api::RemoteError;
use crate::store::Snapshot;

/// Header data rendered on every page and pushed over `/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub cart_total: String,
}

impl From<&Snapshot> for HeaderView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            user_name: snapshot.user.as_ref().map(|user| user.name.clone()),
            cart_count: snapshot.cart_count(),
            cart_total: snapshot.cart_total().to_string(),
        }
    }
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&CartItem> for CartLineView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            price: line.price.to_string(),
            quantity: line.quantity,
            line_price: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl From<&Snapshot> for CartView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            lines: snapshot.cart.iter().map(CartLineView::from).collect(),
            total: snapshot.cart_total().to_string(),
        }
    }
}

/// What the shopper was trying to do when a remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Login,
    Register,
    LoadProducts,
}

/// A recoverable, user-facing message for a failed remote call.
///
/// Rejections of the shopper's input get a specific message; everything else
/// is presented as a transient failure worth retrying.
#[must_use]
pub fn failure_message(attempt: Attempt, err: &RemoteError) -> String {
    let rejected = matches!(err.status(), Some(400..=499));
    match (attempt, rejected) {
        (Attempt::Login, true) => "Invalid email or password.".to_string(),
        (Attempt::Login, false) => "Login failed, try again.".to_string(),
        (Attempt::Register, true) => {
            "Registration failed: check your details or sign in if you already have an account."
                .to_string()
        }
        (Attempt::Register, false) => "Registration failed, try again.".to_string(),
        (Attempt::LoadProducts, _) => "Products could not be loaded, try again.".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartwheel_core::{Email, Price, ProductId, User, UserId};

    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            user: Some(User {
                id: UserId::new(1),
                name: "Ana".to_string(),
                email: Email::parse("a@x.com").unwrap(),
            }),
            products: Vec::new(),
            cart: vec![
                CartItem {
                    id: ProductId::new(1),
                    name: "Mug".to_string(),
                    price: Price::from_units(10),
                    quantity: 1,
                },
                CartItem {
                    id: ProductId::new(2),
                    name: "Tea".to_string(),
                    price: Price::from_units(25),
                    quantity: 1,
                },
            ],
        }
    }

    #[test]
    fn test_header_view() {
        let header = HeaderView::from(&snapshot());
        assert_eq!(header.user_name.as_deref(), Some("Ana"));
        assert_eq!(header.cart_count, 2);
        assert_eq!(header.cart_total, "$35");
    }

    #[test]
    fn test_cart_view() {
        let cart = CartView::from(&snapshot());
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total, "$35");
    }

    #[test]
    fn test_failure_message_distinguishes_rejection() {
        let rejected = RemoteError::Api {
            status: 401,
            body: String::new(),
        };
        let outage = RemoteError::Api {
            status: 503,
            body: String::new(),
        };
        assert_eq!(
            failure_message(Attempt::Login, &rejected),
            "Invalid email or password."
        );
        assert_eq!(
            failure_message(Attempt::Register, &outage),
            "Registration failed, try again."
        );
    }
}
