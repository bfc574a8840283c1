//! Trade statistics for the dashboard summary.
//!
//! Aggregation never fails: empty or malformed input just produces zeros.

use super::trade::{Outcome, TradeRecord};
use serde::Serialize;

pub const DEFAULT_WIN_REWARD: f64 = 100.0;
pub const DEFAULT_LOSS_REWARD: f64 = -50.0;

/// How net profit/loss is derived from the records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetPnlPolicy {
    /// Sum every numeric `pnl`; records without one contribute nothing.
    SumOfPnl,
    /// Flat amount per winner and per loser, ignoring `pnl` entirely.
    FixedReward { win: f64, loss: f64 },
}

impl NetPnlPolicy {
    pub fn fixed_default() -> Self {
        NetPnlPolicy::FixedReward {
            win: DEFAULT_WIN_REWARD,
            loss: DEFAULT_LOSS_REWARD,
        }
    }
}

/// Which records count toward `total_trades`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalTradesRule {
    AllRecords,
    NumericPnlOnly,
}

/// How a record is classified as a winner or loser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeRule {
    /// `result == "win"` / `result == "loss"`.
    ResultLabel,
    /// `pnl > 0` / `pnl < 0`.
    PnlSign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationPolicy {
    pub net_pnl: NetPnlPolicy,
    pub total_trades: TotalTradesRule,
    pub outcome: OutcomeRule,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            net_pnl: NetPnlPolicy::SumOfPnl,
            total_trades: TotalTradesRule::AllRecords,
            outcome: OutcomeRule::ResultLabel,
        }
    }
}

impl AggregationPolicy {
    pub fn classify(&self, trade: &TradeRecord) -> Outcome {
        match self.outcome {
            OutcomeRule::ResultLabel => trade.outcome_by_label(),
            OutcomeRule::PnlSign => trade.outcome_by_pnl(),
        }
    }
}

/// Derived statistics borrowing the winner/loser records from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats<'a> {
    pub total_trades: usize,
    pub winners: Vec<&'a TradeRecord>,
    pub losers: Vec<&'a TradeRecord>,
    /// Percentage of decided trades that won, two decimal places.
    pub win_rate: f64,
    pub net_pnl: f64,
}

impl<'a> TradeStats<'a> {
    pub fn compute(trades: &'a [TradeRecord], policy: &AggregationPolicy) -> Self {
        let mut winners = Vec::new();
        let mut losers = Vec::new();

        for trade in trades {
            match policy.classify(trade) {
                Outcome::Win => winners.push(trade),
                Outcome::Loss => losers.push(trade),
                Outcome::Undecided => {}
            }
        }

        let total_trades = match policy.total_trades {
            TotalTradesRule::AllRecords => trades.len(),
            TotalTradesRule::NumericPnlOnly => trades.iter().filter(|t| t.pnl.is_some()).count(),
        };

        let decided = winners.len() + losers.len();
        let win_rate = if decided > 0 {
            round2(winners.len() as f64 / decided as f64 * 100.0)
        } else {
            0.0
        };

        let net_pnl = match policy.net_pnl {
            NetPnlPolicy::SumOfPnl => sum_pnl(trades),
            NetPnlPolicy::FixedReward { win, loss } => {
                winners.len() as f64 * win + losers.len() as f64 * loss
            }
        };

        TradeStats {
            total_trades,
            winners,
            losers,
            win_rate,
            net_pnl,
        }
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_trades: self.total_trades,
            winners: self.winners.len(),
            losers: self.losers.len(),
            win_rate: self.win_rate,
            net_pnl: self.net_pnl,
        }
    }
}

/// Count-only view of [`TradeStats`], for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    pub win_rate: f64,
    pub net_pnl: f64,
}

/// Summed in sorted order so any permutation of the input gives the same bits.
fn sum_pnl(trades: &[TradeRecord]) -> f64 {
    let mut values: Vec<f64> = trades.iter().filter_map(|t| t.pnl).collect();
    values.sort_by(f64::total_cmp);
    values.iter().fold(0.0, |acc, v| acc + v)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
