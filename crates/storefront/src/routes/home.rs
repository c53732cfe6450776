//! Product list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::middleware::CurrentStore;
use crate::routes::Page;
use crate::state::AppState;
use crate::store::{Action, Slot, Snapshot};
use crate::views::{Attempt, HeaderView, ProductView, failure_message};

/// Product list page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: &'static str,
    pub header: HeaderView,
    pub products: Vec<ProductView>,
    pub error: Option<String>,
}

impl HomeTemplate {
    /// Render the products the store currently holds, with an optional
    /// error banner above them.
    #[must_use]
    pub fn new(snapshot: &Snapshot, error: Option<String>) -> Self {
        Self {
            title: Page::Home.title(),
            header: HeaderView::from(snapshot),
            products: snapshot.products.iter().map(ProductView::from).collect(),
            error,
        }
    }
}

/// Display the product list, refreshing the catalog from the remote API.
///
/// A failed fetch keeps whatever products the store already holds and shows
/// an error above them.
pub async fn home(State(state): State<AppState>, CurrentStore(store): CurrentStore) -> Response {
    let ticket = store.begin(Slot::Products);

    let error = match state.api().fetch_products().await {
        Ok(products) => {
            store.dispatch_current(&ticket, Action::SetProducts(products));
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            Some(failure_message(Attempt::LoadProducts, &e))
        }
    };

    HomeTemplate::new(&store.snapshot(), error).into_response()
}
