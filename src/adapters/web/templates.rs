//! HTML templates using Askama.

use askama::Template;

use crate::domain::stats::TradeStats;
use crate::domain::trade::{Numeric, TradeRecord};
use crate::domain::view_selector::Tab;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub email: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub summary: SummaryView,
    /// Pre-rendered [`TradePanelTemplate`].
    pub panel: &'a str,
}

/// The four headline numbers plus the total, formatted for display.
pub struct SummaryView {
    pub net_pnl: String,
    pub net_pnl_positive: bool,
    pub win_rate: String,
    pub wins: usize,
    pub losses: usize,
    pub total_trades: usize,
}

impl SummaryView {
    pub fn from_stats(stats: &TradeStats<'_>) -> Self {
        Self {
            net_pnl: format!("{:.2}", stats.net_pnl),
            net_pnl_positive: stats.net_pnl >= 0.0,
            win_rate: format!("{:.2}", stats.win_rate),
            wins: stats.winners.len(),
            losses: stats.losers.len(),
            total_trades: stats.total_trades,
        }
    }
}

/// Tab strip plus the active view's content. This is also the HTMX fragment.
#[derive(Template)]
#[template(path = "trade_panel.html")]
pub struct TradePanelTemplate<'a> {
    pub tabs: Vec<Tab<'a>>,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "trade_list.html")]
pub struct TradeListTemplate {
    pub cards: Vec<TradeCard>,
}

impl TradeListTemplate {
    pub fn new(trades: &[&TradeRecord]) -> Self {
        Self {
            cards: trades.iter().map(|t| TradeCard::from_record(t)).collect(),
        }
    }
}

/// Display strings for one trade card. Absent fields render empty.
pub struct TradeCard {
    pub symbol: String,
    pub action: String,
    pub entry_price: String,
    pub exit_price: String,
    pub direction: String,
    pub result: String,
    pub pnl: String,
    pub date: String,
}

impl TradeCard {
    pub fn from_record(trade: &TradeRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<&Numeric>| v.map(Numeric::to_string).unwrap_or_default();

        Self {
            symbol: text(&trade.symbol),
            action: text(&trade.action),
            entry_price: number(trade.entry_or_price()),
            exit_price: number(trade.exit_price.as_ref()),
            direction: text(&trade.direction),
            result: text(&trade.result),
            pnl: trade.pnl.map(|p| p.to_string()).unwrap_or_default(),
            date: trade.display_timestamp(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
