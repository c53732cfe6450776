//! Integration test harness for Cartwheel.
//!
//! Everything runs in-process: [`FakeApi`] stands in for the remote catalog
//! and account service, and [`spawn_storefront`] serves the real storefront
//! router against it. Both bind ephemeral ports on 127.0.0.1.
//!
//! # Fake API
//!
//! ```text
//! POST /auth/register  -> 201 {id: 17, name, email}, or 409 for taken@x.com
//! POST /auth/login     -> 200 Ana when password is "secret", otherwise 401
//! GET  /products       -> the configured catalog, or 503 when failing
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cartwheel_storefront::config::{CheckoutConfig, StorefrontConfig};
use cartwheel_storefront::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Id the fake service assigns to every account.
pub const ASSIGNED_USER_ID: i64 = 17;

/// Password the fake service accepts on login.
pub const VALID_PASSWORD: &str = "secret";

/// Email the fake service treats as already registered.
pub const TAKEN_EMAIL: &str = "taken@x.com";

/// Publishable key the test storefront embeds in its checkout page.
pub const CHECKOUT_KEY: &str = "pk_test_51Hx";

// =============================================================================
// Fake remote API
// =============================================================================

/// In-process stand-in for the remote API.
pub struct FakeApi {
    url: Url,
    catalog: Arc<Mutex<Option<Value>>>,
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

impl FakeApi {
    /// Start a fake API whose catalog is a single Mug priced at 5.
    pub async fn spawn() -> Self {
        let catalog = Arc::new(Mutex::new(Some(json!([
            {"id": 1, "name": "Mug", "description": "Holds tea", "price": 5}
        ]))));

        let app = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/products", get(products))
            .with_state(Arc::clone(&catalog));

        let addr = serve(app).await;
        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            catalog,
        }
    }

    /// Base URL of the fake API.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Replace the catalog returned by `GET /products`.
    pub fn set_products(&self, products: Value) {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Some(products);
    }

    /// Make `GET /products` answer 503 from now on.
    pub fn fail_products(&self) {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

async fn register(Json(body): Json<RegisterBody>) -> Response {
    if body.email == TAKEN_EMAIL || body.password.is_empty() {
        return (StatusCode::CONFLICT, Json(json!({"error": "email taken"}))).into_response();
    }

    let user = json!({"id": ASSIGNED_USER_ID, "name": body.name, "email": body.email});
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.password != VALID_PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad credentials"})))
            .into_response();
    }

    Json(json!({"id": ASSIGNED_USER_ID, "name": "Ana", "email": body.email})).into_response()
}

async fn products(State(catalog): State<Arc<Mutex<Option<Value>>>>) -> Response {
    let catalog = catalog
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    catalog.map_or_else(
        || StatusCode::SERVICE_UNAVAILABLE.into_response(),
        |products| Json(products).into_response(),
    )
}

// =============================================================================
// Storefront
// =============================================================================

/// Configuration for a storefront talking to `api_url`.
#[must_use]
pub fn storefront_config(api_url: &Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        api_url: api_url.clone(),
        session_idle: Duration::from_secs(300),
        checkout: CheckoutConfig {
            publishable_key: CHECKOUT_KEY.to_string(),
            merchant_name: "Cartwheel Test".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Serve the storefront against `api_url` and return its base URL.
pub async fn spawn_storefront(api_url: &Url) -> Url {
    let app = cartwheel_storefront::app(AppState::new(storefront_config(api_url)));
    let addr = serve(app).await;
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A browser-like client: keeps cookies and follows redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
