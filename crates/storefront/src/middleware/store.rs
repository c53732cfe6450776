//! Extractor for the current session's application store.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use super::session::keys;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Store;

/// Extractor that yields the shopper's application store.
///
/// Creates the session key (and an empty store) on the first request of a
/// session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentStore(store): CurrentStore) -> impl IntoResponse {
///     format!("{} items", store.snapshot().cart_count())
/// }
/// ```
pub struct CurrentStore(pub Store);

impl FromRequestParts<AppState> for CurrentStore {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let key = store_key(&session).await?;
        Ok(Self(state.sessions().store_for(key).await))
    }
}

/// Read the store key from the session, minting one if absent.
async fn store_key(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(key) = session.get::<Uuid>(keys::STORE_KEY).await? {
        return Ok(key);
    }

    let key = Uuid::new_v4();
    session.insert(keys::STORE_KEY, key).await?;
    Ok(key)
}
