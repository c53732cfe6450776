//! Client for the remote catalog and account API.
//!
//! # Endpoints
//!
//! ```text
//! POST /auth/login     {email, password}        -> User
//! POST /auth/register  {email, password, name}  -> User
//! GET  /products                                -> [Product]
//! ```
//!
//! Every call performs exactly one round trip. There is no retry, no caching
//! and no timeout override; the caller decides what a failure means for its
//! view.

use std::sync::Arc;

use cartwheel_core::{Email, Product, Registration, User};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Maximum number of body characters kept in logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No response was received (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error: HTTP {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The server answered with success but the body did not decode.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The base URL cannot be joined with an endpoint path.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl RemoteError {
    /// HTTP status for [`RemoteError::Api`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the remote storefront API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// A trailing slash is added if missing so endpoint paths join beneath
    /// any path prefix (`https://api.example.com/v1` + `products`).
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Api`] when the credentials are rejected, and
    /// [`RemoteError::Network`] or [`RemoteError::Decode`] on transport or
    /// payload failures.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<User, RemoteError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.send(Method::POST, "auth/login", Some(&body)).await
    }

    /// Create an account. The remote service assigns the user id.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::login`].
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, RemoteError> {
        let body = RegisterRequest {
            email: registration.email.as_str(),
            password: registration.password.expose_secret(),
            name: &registration.name,
        };
        self.send(Method::POST, "auth/register", Some(&body)).await
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::login`].
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        self.send::<(), _>(Method::GET, "products", None).await
    }

    /// Perform one request and decode the JSON response.
    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.inner.base_url.join(path)?;

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Remote API returned non-success status"
            );
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to decode remote API response"
            );
            RemoteError::Decode(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ApiClient::new(Url::parse("https://api.example.com/v1").unwrap());
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
        assert_eq!(
            client.base_url().join("products").unwrap().as_str(),
            "https://api.example.com/v1/products"
        );
    }

    #[test]
    fn test_root_base_url() {
        let client = ApiClient::new(Url::parse("https://api.example.com").unwrap());
        assert_eq!(
            client.base_url().join("auth/login").unwrap().as_str(),
            "https://api.example.com/auth/login"
        );
    }

    #[test]
    fn test_api_error_status() {
        let err = RemoteError::Api {
            status: 409,
            body: "taken".to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "API error: HTTP 409");
    }

    #[test]
    fn test_register_body_shape() {
        let body = RegisterRequest {
            email: "a@x.com",
            password: "p",
            name: "Ana",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@x.com", "password": "p", "name": "Ana"})
        );
    }
}
