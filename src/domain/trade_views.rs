//! The dashboard's three trade views: all, winners, losers.

use super::stats::AggregationPolicy;
use super::trade::{Outcome, TradeRecord};
use super::view_selector::{View, ViewSelector};

pub const ALL: &str = "all";
pub const WINNERS: &str = "winners";
pub const LOSERS: &str = "losers";

/// Build a selector over a trade list. `render` turns the filtered records of
/// the active view into output; winners and losers are classified by `policy`.
pub fn trade_views<T, F>(
    default: &str,
    policy: AggregationPolicy,
    render: F,
) -> ViewSelector<[TradeRecord], T>
where
    T: 'static,
    F: Fn(&[&TradeRecord]) -> T + Clone + Send + Sync + 'static,
{
    let render_all = render.clone();
    let render_winners = render.clone();
    let render_losers = render;

    ViewSelector::new(
        default,
        vec![
            View::new(ALL, "All", move |trades: &[TradeRecord]| {
                let all: Vec<&TradeRecord> = trades.iter().collect();
                render_all(&all)
            }),
            View::new(WINNERS, "Winners", move |trades: &[TradeRecord]| {
                render_winners(&filter_outcome(trades, &policy, Outcome::Win))
            }),
            View::new(LOSERS, "Losers", move |trades: &[TradeRecord]| {
                render_losers(&filter_outcome(trades, &policy, Outcome::Loss))
            }),
        ],
    )
}

fn filter_outcome<'a>(
    trades: &'a [TradeRecord],
    policy: &AggregationPolicy,
    outcome: Outcome,
) -> Vec<&'a TradeRecord> {
    trades
        .iter()
        .filter(|t| policy.classify(t) == outcome)
        .collect()
}
