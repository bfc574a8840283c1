//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod http_trade_adapter;
pub mod memory_credential_store;
#[cfg(feature = "web")]
pub mod web;
