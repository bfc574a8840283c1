//! Storage for the API key of the current session.

use async_trait::async_trait;

use crate::domain::error::ViewerError;
use crate::domain::session::ApiKey;

/// Holds at most one key: stored on login, cleared on logout.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<ApiKey>, ViewerError>;
    async fn store(&self, key: &ApiKey) -> Result<(), ViewerError>;
    async fn clear(&self) -> Result<(), ViewerError>;
}
