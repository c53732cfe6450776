//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Product list
//! GET  /health           - Health check
//!
//! # Auth
//! GET  /login            - Login page
//! POST /login            - Login action
//! GET  /register         - Register page
//! POST /register         - Register action
//! POST /logout           - Logout action
//!
//! # Cart
//! GET  /cart             - Cart page
//! POST /cart/add         - Add a product (redirects to /)
//! POST /cart/remove      - Remove a product (redirects to /cart)
//!
//! # Checkout
//! GET  /checkout         - Total and hosted checkout widget
//! POST /checkout/token   - Payment token from the widget
//!
//! # Live updates
//! GET  /events           - Server-sent header updates for this session
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod events;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Top-level pages reachable from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Cart,
    Checkout,
}

impl Page {
    /// Route path of the page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Cart => "/cart",
            Self::Checkout => "/checkout",
        }
    }

    /// Document title of the page.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Products",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Cart => "Cart",
            Self::Checkout => "Checkout",
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(Page::Home.path(), get(home::home))
        .route(Page::Login.path(), get(auth::login_page).post(auth::login))
        .route(
            Page::Register.path(),
            get(auth::register_page).post(auth::register),
        )
        .route("/logout", post(auth::logout))
        .nest(Page::Cart.path(), cart_routes())
        .route(Page::Checkout.path(), get(checkout::show))
        .route("/checkout/token", post(checkout::token))
        .route("/events", get(events::events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths_are_distinct() {
        let pages = [
            Page::Home,
            Page::Login,
            Page::Register,
            Page::Cart,
            Page::Checkout,
        ];
        for (i, a) in pages.iter().enumerate() {
            for b in pages.iter().skip(i + 1) {
                assert_ne!(a.path(), b.path());
            }
        }
    }

    #[test]
    fn test_page_titles() {
        assert_eq!(Page::Home.title(), "Products");
        assert_eq!(Page::Cart.path(), "/cart");
    }
}
