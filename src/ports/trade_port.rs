//! Remote trade service port.

use async_trait::async_trait;

use crate::domain::error::ViewerError;
use crate::domain::session::{ApiKey, Credentials, LoginOutcome};
use crate::domain::trade::TradeRecord;

/// The remote service that issues API keys and serves trade records.
#[async_trait]
pub trait TradePort: Send + Sync {
    /// Exchange credentials for an API key. A refused login is
    /// `Ok(LoginOutcome::Rejected)`; `Err` means the service could not be asked.
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ViewerError>;

    /// Fetch the trades visible to `key`, already decoded.
    async fn fetch_trades(&self, key: &ApiKey) -> Result<Vec<TradeRecord>, ViewerError>;
}
