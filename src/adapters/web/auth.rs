//! Session-backed credential storage.
//!
//! The API key issued by the remote service lives in the server-side session;
//! the browser only holds the signed session cookie.

use async_trait::async_trait;
use tower_sessions::Session;

use crate::domain::error::ViewerError;
use crate::domain::session::ApiKey;
use crate::ports::credential_port::CredentialStore;

const API_KEY: &str = "api_key";

fn session_error(err: tower_sessions::session::Error) -> ViewerError {
    ViewerError::Session {
        reason: err.to_string(),
    }
}

/// [`CredentialStore`] over the request's session.
#[derive(Clone)]
pub struct SessionCredentials(Session);

impl SessionCredentials {
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

#[async_trait]
impl CredentialStore for SessionCredentials {
    async fn load(&self) -> Result<Option<ApiKey>, ViewerError> {
        let key: Option<String> = self.0.get(API_KEY).await.map_err(session_error)?;
        Ok(key.filter(|k| !k.is_empty()).map(ApiKey::new))
    }

    /// Rotates the session id before storing, so a pre-login id is never reused.
    async fn store(&self, key: &ApiKey) -> Result<(), ViewerError> {
        self.0.cycle_id().await.map_err(session_error)?;
        self.0
            .insert(API_KEY, key.expose())
            .await
            .map_err(session_error)
    }

    async fn clear(&self) -> Result<(), ViewerError> {
        self.0.flush().await.map_err(session_error)
    }
}
