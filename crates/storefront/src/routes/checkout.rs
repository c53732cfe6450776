//! Checkout route handlers.
//!
//! Payment is collected by a hosted checkout widget embedded in the page. The
//! storefront only supplies the amount and publishable key and receives the
//! opaque token the widget produces; nothing is charged server-side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentStore;
use crate::routes::Page;
use crate::state::AppState;
use crate::store::Snapshot;
use crate::views::HeaderView;

/// Characters of a payment token that may appear in logs.
const LOGGED_TOKEN_CHARS: usize = 8;

/// Payment token posted by the checkout widget.
#[derive(Deserialize)]
pub struct TokenForm {
    #[serde(alias = "stripeToken")]
    pub token: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub title: &'static str,
    pub header: HeaderView,
    pub total: String,
    /// Total in minor units, as the widget expects.
    pub amount_cents: i64,
    pub publishable_key: String,
    pub merchant_name: String,
    pub submitted: bool,
}

impl CheckoutTemplate {
    fn new(state: &AppState, snapshot: &Snapshot, submitted: bool) -> Result<Self> {
        let total = snapshot.cart_total();
        let amount_cents = total
            .to_cents()
            .ok_or_else(|| AppError::Internal(format!("cart total {total} out of range")))?;
        let checkout = &state.config().checkout;

        Ok(Self {
            title: Page::Checkout.title(),
            header: HeaderView::from(snapshot),
            total: total.to_string(),
            amount_cents,
            publishable_key: checkout.publishable_key.clone(),
            merchant_name: checkout.merchant_name.clone(),
            submitted,
        })
    }
}

/// Display the checkout page.
pub async fn show(
    State(state): State<AppState>,
    CurrentStore(store): CurrentStore,
) -> Result<impl IntoResponse> {
    CheckoutTemplate::new(&state, &store.snapshot(), false)
}

/// Receive the payment token from the checkout widget.
///
/// The token is acknowledged and logged by prefix only.
pub async fn token(
    State(state): State<AppState>,
    CurrentStore(store): CurrentStore,
    Form(form): Form<TokenForm>,
) -> Result<impl IntoResponse> {
    let token = form.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("missing payment token".to_string()));
    }

    let snapshot = store.snapshot();
    let prefix: String = token.chars().take(LOGGED_TOKEN_CHARS).collect();
    tracing::info!(
        token_prefix = %prefix,
        amount = %snapshot.cart_total(),
        "Payment token received"
    );
    add_breadcrumb("checkout", "Payment token received", None);

    CheckoutTemplate::new(&state, &snapshot, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_form_accepts_widget_field_name() {
        let form: TokenForm =
            serde_json::from_value(serde_json::json!({ "stripeToken": "tok_123" })).unwrap();
        assert_eq!(form.token, "tok_123");

        let form: TokenForm =
            serde_json::from_value(serde_json::json!({ "token": "tok_456" })).unwrap();
        assert_eq!(form.token, "tok_456");
    }
}
