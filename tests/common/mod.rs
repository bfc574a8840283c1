#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Mutex;
use tradeview::domain::config::ViewerConfig;
use tradeview::domain::error::ViewerError;
use tradeview::domain::session::{ApiKey, Credentials, LoginOutcome};
use tradeview::domain::trade::{TradeRecord, parse_trades};
use tradeview::ports::config_port::ConfigPort;
use tradeview::ports::trade_port::TradePort;

pub const VALID_KEY: &str = "key-123";
pub const VALID_EMAIL: &str = "trader@example.com";
pub const VALID_PASSWORD: &str = "hunter2";

/// Remote service double: accepts one email/password pair and serves a
/// fixed trade list to [`VALID_KEY`].
pub struct MockTradePort {
    pub trades: Vec<TradeRecord>,
    pub login_error: bool,
    pub fetch_error: bool,
    pub logins: Mutex<Vec<String>>,
    pub fetched_with: Mutex<Vec<String>>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            login_error: false,
            fetch_error: false,
            logins: Mutex::new(Vec::new()),
            fetched_with: Mutex::new(Vec::new()),
        }
    }

    pub fn with_trades(mut self, payload: Value) -> Self {
        self.trades = parse_trades(&payload);
        self
    }

    pub fn failing_login(mut self) -> Self {
        self.login_error = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fetch_error = true;
        self
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }
}

#[async_trait]
impl TradePort for MockTradePort {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ViewerError> {
        self.logins.lock().unwrap().push(credentials.email.clone());
        if self.login_error {
            return Err(ViewerError::Remote {
                reason: "connection refused".into(),
            });
        }
        if credentials.email == VALID_EMAIL && credentials.password == VALID_PASSWORD {
            Ok(LoginOutcome::Accepted(ApiKey::new(VALID_KEY)))
        } else {
            Ok(LoginOutcome::Rejected {
                reason: "Invalid credentials".into(),
            })
        }
    }

    async fn fetch_trades(&self, key: &ApiKey) -> Result<Vec<TradeRecord>, ViewerError> {
        self.fetched_with
            .lock()
            .unwrap()
            .push(key.expose().to_string());
        if self.fetch_error {
            return Err(ViewerError::RemoteResponse {
                status: 500,
                reason: "boom".into(),
            });
        }
        if key.expose() != VALID_KEY {
            return Err(ViewerError::RemoteResponse {
                status: 401,
                reason: "bad key".into(),
            });
        }
        Ok(self.trades.clone())
    }
}

/// The three-trade scenario: two wins, one loss, pnl 120, -40, 75.
pub fn scenario_payload() -> Value {
    json!([
        {"symbol": "BTCUSD", "action": "buy", "direction": "long", "price": 42000,
         "exit_price": 43200, "result": "win", "pnl": 120, "timestamp": 1700000000000u64},
        {"symbol": "ETHUSD", "action": "sell", "direction": "short", "entry_price": "2250.5",
         "result": "loss", "pnl": -40, "timestamp": "2024-03-01T12:30:00Z"},
        {"symbol": "SOLUSD", "action": "buy", "direction": "long", "price": 98.1,
         "result": "win", "pnl": 75}
    ])
}

/// Config port over a fixed list of `(section, key, value)` entries.
pub struct MockConfigPort(pub Vec<(&'static str, &'static str, String)>);

impl MockConfigPort {
    pub fn new(backend_url: &str) -> Self {
        Self(vec![("remote", "backend_url", backend_url.to_string())])
    }

    pub fn with(mut self, section: &'static str, key: &'static str, value: &str) -> Self {
        self.0.push((section, key, value.to_string()));
        self
    }
}

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.0
            .iter()
            .rev()
            .find(|(s, k, _)| *s == section && *k == key)
            .map(|(_, _, v)| v.clone())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .map(|v| v == "true")
            .unwrap_or(default)
    }
}

pub fn test_config() -> ViewerConfig {
    ViewerConfig::from_port(
        &MockConfigPort::new("http://trades.test").with("session", "secret", &"07".repeat(64)),
    )
    .unwrap()
}

pub fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
