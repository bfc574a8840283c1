//! Web server adapter.
//!
//! Axum server with an HTMX-enhanced frontend: login against the remote trade
//! service, then a dashboard with summary numbers and tabbed trade lists.

mod auth;
mod error;
mod handlers;
mod templates;

pub use auth::SessionCredentials;
pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::domain::config::{SessionConfig, ViewerConfig};
use crate::domain::error::ViewerError;
use crate::ports::trade_port::TradePort;

/// Minimum length of the decoded cookie signing key.
const MIN_KEY_BYTES: usize = 64;

pub struct AppState {
    pub trade_port: Arc<dyn TradePort>,
    pub config: Arc<ViewerConfig>,
}

pub fn build_router(state: AppState) -> Result<Router, ViewerError> {
    let key = session_key(&state.config.session)?;
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            state.config.session.lifetime_secs,
        )))
        .with_signed(key);

    Ok(Router::new()
        .route("/", get(handlers::dashboard))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .layer(sessions)
        .with_state(Arc::new(state)))
}

fn session_key(config: &SessionConfig) -> Result<Key, ViewerError> {
    match &config.secret {
        Some(secret) => signing_key(secret),
        None => {
            tracing::warn!("no [session] secret configured, using a random signing key");
            Ok(Key::generate())
        }
    }
}

/// Decode a hex `[session] secret` into a cookie signing key.
pub fn signing_key(secret: &str) -> Result<Key, ViewerError> {
    let bytes = hex::decode(secret.trim())
        .map_err(|e| ViewerError::invalid("session", "secret", format!("not hex: {e}")))?;
    if bytes.len() < MIN_KEY_BYTES {
        return Err(ViewerError::invalid(
            "session",
            "secret",
            format!(
                "must decode to at least {MIN_KEY_BYTES} bytes, got {}",
                bytes.len()
            ),
        ));
    }
    Ok(Key::from(bytes.as_slice()))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

/// HTMX re-fetching a pushed URL after a history cache miss; wants the full page.
fn is_history_restore(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-History-Restore-Request").is_some()
}
