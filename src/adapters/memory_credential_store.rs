//! Process-local credential store, for the CLI and tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::error::ViewerError;
use crate::domain::session::ApiKey;
use crate::ports::credential_port::CredentialStore;

#[derive(Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<ApiKey>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: ApiKey) -> Self {
        Self {
            key: Mutex::new(Some(key)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<ApiKey>>, ViewerError> {
        self.key.lock().map_err(|_| ViewerError::Session {
            reason: "credential store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<ApiKey>, ViewerError> {
        Ok(self.lock()?.clone())
    }

    async fn store(&self, key: &ApiKey) -> Result<(), ViewerError> {
        *self.lock()? = Some(key.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ViewerError> {
        *self.lock()? = None;
        Ok(())
    }
}
