//! Cart route handlers.
//!
//! Adds resolve the product id against the products the store already holds,
//! so a cart line always carries the name and price the shopper saw.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use cartwheel_core::{CartItem, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::middleware::CurrentStore;
use crate::routes::Page;
use crate::routes::home::HomeTemplate;
use crate::views::{CartView, HeaderView};

/// Cart action form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub title: &'static str,
    pub header: HeaderView,
    pub cart: CartView,
}

/// Display the cart page.
pub async fn show(CurrentStore(store): CurrentStore) -> impl IntoResponse {
    let snapshot = store.snapshot();
    CartTemplate {
        title: Page::Cart.title(),
        header: HeaderView::from(&*snapshot),
        cart: CartView::from(&*snapshot),
    }
}

/// Add a listed product to the cart.
///
/// Adding a product already in the cart increases its quantity. An id that
/// is not in the product list re-renders the list with an error.
#[instrument(skip(store), fields(product_id = %form.product_id))]
pub async fn add(CurrentStore(store): CurrentStore, Form(form): Form<CartForm>) -> Response {
    let snapshot = store.snapshot();

    let Some(product) = snapshot.product(form.product_id) else {
        tracing::warn!("Add to cart for unknown product");
        let page = HomeTemplate::new(
            &snapshot,
            Some("That product is no longer available.".to_string()),
        );
        return (StatusCode::NOT_FOUND, page).into_response();
    };

    store.add_to_cart(CartItem::from(product));

    let product_id = form.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Redirect::to(Page::Home.path()).into_response()
}

/// Remove a product from the cart.
#[instrument(skip(store), fields(product_id = %form.product_id))]
pub async fn remove(CurrentStore(store): CurrentStore, Form(form): Form<CartForm>) -> Redirect {
    store.remove_from_cart(form.product_id);

    let product_id = form.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Redirect::to(Page::Cart.path())
}
