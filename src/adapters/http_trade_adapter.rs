//! HTTP client for the remote trade service.
//!
//! `POST {base}/login` with `{"email", "password"}` answers `{"api_key"}` or
//! `{"error"}`; `GET {base}/trades?key=...` answers a JSON list of trades.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::domain::config::ViewerConfig;
use crate::domain::error::ViewerError;
use crate::domain::session::{ApiKey, Credentials, LoginOutcome};
use crate::domain::trade::{TradeRecord, parse_trades_str};
use crate::ports::trade_port::TradePort;

pub const LOGIN_FAILED: &str = "Login failed";

fn map_err(err: reqwest::Error) -> ViewerError {
    match err.status() {
        Some(status) => ViewerError::RemoteResponse {
            status: status.as_u16(),
            reason: err.to_string(),
        },
        None => ViewerError::Remote {
            reason: err.to_string(),
        },
    }
}

pub struct HttpTradeAdapter {
    client: Client,
    base_url: String,
}

impl HttpTradeAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ViewerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_err)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self, ViewerError> {
        Self::new(
            config.backend_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TradePort for HttpTradeAdapter {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ViewerError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(LOGIN_FAILED)
                .to_string();
            return Ok(LoginOutcome::Rejected { reason });
        }

        match body
            .get("api_key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
        {
            Some(key) => Ok(LoginOutcome::Accepted(ApiKey::new(key))),
            None => Err(ViewerError::RemoteResponse {
                status: status.as_u16(),
                reason: "login response has no api_key".to_string(),
            }),
        }
    }

    async fn fetch_trades(&self, key: &ApiKey) -> Result<Vec<TradeRecord>, ViewerError> {
        let response = self
            .client
            .get(self.url("/trades"))
            .query(&[("key", key.expose())])
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::RemoteResponse {
                status: status.as_u16(),
                reason: "failed to fetch trades".to_string(),
            });
        }

        let body = response.text().await.map_err(map_err)?;
        let trades = parse_trades_str(&body);
        tracing::debug!(count = trades.len(), "fetched trades");
        Ok(trades)
    }
}
