//! Trade records as delivered by the remote trade service.
//!
//! Decoding is lenient: any JSON value becomes a (possibly empty) list of
//! records, and any field may be absent or of the wrong type.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A field that is usually numeric but arrives as whatever the remote sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Numeric::Number),
            Value::String(s) => Some(Numeric::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Number(n) => write!(f, "{n}"),
            Numeric::Text(s) => f.write_str(s),
        }
    }
}

/// How a record counts toward winners and losers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Undecided,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeRecord {
    pub symbol: Option<String>,
    pub action: Option<String>,
    pub direction: Option<String>,
    pub price: Option<Numeric>,
    pub entry_price: Option<Numeric>,
    pub exit_price: Option<Numeric>,
    pub result: Option<String>,
    /// Only a JSON number counts; anything else leaves this unset.
    pub pnl: Option<f64>,
    pub timestamp: Option<Numeric>,
}

impl TradeRecord {
    /// Decode one record. Non-object values yield a record with no fields.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(text_field);
        let numeric = |key: &str| map.get(key).and_then(Numeric::from_value);

        Self {
            symbol: text("symbol"),
            action: text("action"),
            direction: text("direction"),
            price: numeric("price"),
            entry_price: numeric("entry_price"),
            exit_price: numeric("exit_price"),
            result: text("result"),
            pnl: map
                .get("pnl")
                .and_then(Value::as_f64)
                .filter(|n| n.is_finite()),
            timestamp: numeric("timestamp"),
        }
    }

    /// Classification by the `result` label: exactly `"win"` or `"loss"`.
    pub fn outcome_by_label(&self) -> Outcome {
        match self.result.as_deref() {
            Some("win") => Outcome::Win,
            Some("loss") => Outcome::Loss,
            _ => Outcome::Undecided,
        }
    }

    /// Classification by the sign of a numeric `pnl`.
    pub fn outcome_by_pnl(&self) -> Outcome {
        match self.pnl {
            Some(p) if p > 0.0 => Outcome::Win,
            Some(p) if p < 0.0 => Outcome::Loss,
            _ => Outcome::Undecided,
        }
    }

    /// Entry price for display, falling back to the single `price` field.
    pub fn entry_or_price(&self) -> Option<&Numeric> {
        self.entry_price.as_ref().or(self.price.as_ref())
    }

    pub fn display_timestamp(&self) -> String {
        match &self.timestamp {
            None => "-".to_string(),
            Some(ts) => format_timestamp(ts),
        }
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a remote payload. Anything other than an array is an empty list.
pub fn parse_trades(payload: &Value) -> Vec<TradeRecord> {
    match payload {
        Value::Array(items) => items.iter().map(TradeRecord::from_value).collect(),
        other => {
            tracing::debug!(kind = value_kind(other), "trade payload is not an array");
            Vec::new()
        }
    }
}

/// Decode a raw JSON document. Invalid JSON is treated like a non-array payload.
pub fn parse_trades_str(raw: &str) -> Vec<TradeRecord> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => parse_trades(&value),
        Err(e) => {
            tracing::warn!("trade payload is not valid JSON: {e}");
            Vec::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numbers are epoch milliseconds; strings are RFC 3339, naive date-times, or
/// bare dates (read as midnight).
pub fn format_timestamp(ts: &Numeric) -> String {
    let parsed = match ts {
        Numeric::Number(ms) => DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.naive_utc()),
        Numeric::Text(s) => parse_text_timestamp(s.trim()),
    };
    match parsed {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn parse_text_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
