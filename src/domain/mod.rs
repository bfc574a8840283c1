//! Core domain types and logic.

pub mod config;
pub mod error;
pub mod session;
pub mod stats;
pub mod trade;
pub mod trade_views;
pub mod view_selector;
