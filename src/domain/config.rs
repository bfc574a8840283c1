//! Viewer configuration, built and validated from a [`ConfigPort`].

use crate::domain::error::ViewerError;
use crate::domain::stats::{
    AggregationPolicy, DEFAULT_LOSS_REWARD, DEFAULT_WIN_REWARD, NetPnlPolicy, OutcomeRule,
    TotalTradesRule,
};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_TAB: &str = "all";
pub const DEFAULT_TIMEOUT_SECS: i64 = 10;
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Base URL of the remote trade service, without a trailing slash.
    pub backend_url: String,
    pub timeout_secs: u64,
    pub listen: String,
    pub default_tab: String,
    pub session: SessionConfig,
    pub aggregation: AggregationPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Hex-encoded cookie signing key; a random key is generated when absent.
    pub secret: Option<String>,
    pub lifetime_secs: i64,
    pub secure_cookie: bool,
}

impl ViewerConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, ViewerError> {
        let backend_url = backend_url(config)?;

        let timeout = config.get_int("remote", "timeout_secs", DEFAULT_TIMEOUT_SECS);
        if timeout <= 0 {
            return Err(ViewerError::invalid(
                "remote",
                "timeout_secs",
                "timeout_secs must be positive",
            ));
        }

        let default_tab = default_tab(config)?;

        let lifetime_secs = config.get_int(
            "session",
            "lifetime_secs",
            DEFAULT_SESSION_LIFETIME_SECS,
        );
        if lifetime_secs <= 0 {
            return Err(ViewerError::invalid(
                "session",
                "lifetime_secs",
                "lifetime_secs must be positive",
            ));
        }

        Ok(Self {
            backend_url,
            timeout_secs: timeout as u64,
            listen: config
                .get_string("web", "listen")
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            default_tab,
            session: SessionConfig {
                secret: config
                    .get_string("session", "secret")
                    .filter(|s| !s.trim().is_empty()),
                lifetime_secs,
                secure_cookie: config.get_bool("session", "secure_cookie", false),
            },
            aggregation: aggregation_policy(config)?,
        })
    }
}

fn backend_url(config: &dyn ConfigPort) -> Result<String, ViewerError> {
    let raw = config
        .get_string("remote", "backend_url")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ViewerError::missing("remote", "backend_url"))?;

    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ViewerError::invalid(
            "remote",
            "backend_url",
            "backend_url must be an http or https URL",
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Reads `[web] default_tab`, trimmed. Absent means [`DEFAULT_TAB`].
pub fn default_tab(config: &dyn ConfigPort) -> Result<String, ViewerError> {
    let tab = config
        .get_string("web", "default_tab")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TAB.to_string());
    if tab.is_empty() {
        return Err(ViewerError::invalid(
            "web",
            "default_tab",
            "default_tab must not be empty",
        ));
    }
    Ok(tab)
}

/// Reads the `[aggregation]` section. Every key is optional.
pub fn aggregation_policy(config: &dyn ConfigPort) -> Result<AggregationPolicy, ViewerError> {
    let net_pnl = match choice(config, "net_pnl", "sum").as_str() {
        "sum" => NetPnlPolicy::SumOfPnl,
        "fixed" => {
            let win = config.get_double("aggregation", "win_reward", DEFAULT_WIN_REWARD);
            let loss = config.get_double("aggregation", "loss_reward", DEFAULT_LOSS_REWARD);
            if !win.is_finite() || !loss.is_finite() {
                return Err(ViewerError::invalid(
                    "aggregation",
                    "win_reward",
                    "rewards must be finite numbers",
                ));
            }
            NetPnlPolicy::FixedReward { win, loss }
        }
        other => return Err(unknown_choice("net_pnl", other, "sum, fixed")),
    };

    let total_trades = match choice(config, "total_trades", "all").as_str() {
        "all" => TotalTradesRule::AllRecords,
        "numeric_pnl" => TotalTradesRule::NumericPnlOnly,
        other => return Err(unknown_choice("total_trades", other, "all, numeric_pnl")),
    };

    let outcome = match choice(config, "outcome", "result").as_str() {
        "result" => OutcomeRule::ResultLabel,
        "pnl_sign" => OutcomeRule::PnlSign,
        other => return Err(unknown_choice("outcome", other, "result, pnl_sign")),
    };

    Ok(AggregationPolicy {
        net_pnl,
        total_trades,
        outcome,
    })
}

fn choice(config: &dyn ConfigPort, key: &str, default: &str) -> String {
    config
        .get_string("aggregation", key)
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| default.to_string())
}

fn unknown_choice(key: &str, value: &str, allowed: &str) -> ViewerError {
    ViewerError::invalid(
        "aggregation",
        key,
        format!("unknown value '{value}', expected one of: {allowed}"),
    )
}
