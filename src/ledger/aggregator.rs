//! Aggregator — profit/loss, summary statistics and chart totals.
//!
//! Pure functions over a full set of records. Every entry point returns
//! `None` for an empty set so callers can tell "nothing to report" apart
//! from a summary that happens to be all zeros.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Outcome, StoredWager, WagerRecord};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Headline statistics over a set of wagers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    /// Sum of profit over winning wagers.
    pub total_win_profit: Decimal,
    /// Sum of stakes over losing wagers.
    pub total_loss_amount: Decimal,
    pub net_profit: Decimal,
    pub total_staked: Decimal,
    /// Wins as a percentage of all wagers (0–100).
    pub win_percentage: f64,
}

/// Profit (positive) or loss (negative) of a single wager.
pub fn profit(record: &WagerRecord) -> Decimal {
    record.profit()
}

/// Summarise a set of wagers. `None` when the set is empty.
pub fn summarize<'a, I>(records: I) -> Option<Summary>
where
    I: IntoIterator<Item = &'a WagerRecord>,
{
    let mut count = 0usize;
    let mut wins = 0usize;
    let mut total_win_profit = Decimal::ZERO;
    let mut total_loss_amount = Decimal::ZERO;
    let mut total_staked = Decimal::ZERO;

    for record in records {
        count += 1;
        total_staked += record.stake;
        match record.outcome {
            Outcome::Win => {
                wins += 1;
                total_win_profit += profit(record);
            }
            Outcome::Loss => total_loss_amount += record.stake,
        }
    }

    if count == 0 {
        return None;
    }

    Some(Summary {
        count,
        wins,
        losses: count - wins,
        total_win_profit,
        total_loss_amount,
        net_profit: total_win_profit - total_loss_amount,
        total_staked,
        win_percentage: wins as f64 / count as f64 * 100.0,
    })
}

// ---------------------------------------------------------------------------
// Category totals
// ---------------------------------------------------------------------------

/// Total stake per bet type, ordered by bet-type label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<String, Decimal>);

impl CategoryTotals {
    pub fn get(&self, bet_type: &str) -> Option<Decimal> {
        self.0.get(bet_type).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(label, total)| (label.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest single total (the chart's scale).
    pub fn max(&self) -> Decimal {
        self.0.values().copied().max().unwrap_or(Decimal::ZERO)
    }
}

/// Sum stakes by bet type. `None` when the set is empty.
pub fn category_totals<'a, I>(records: I) -> Option<CategoryTotals>
where
    I: IntoIterator<Item = &'a WagerRecord>,
{
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in records {
        *totals
            .entry(record.bet_type.to_string())
            .or_insert(Decimal::ZERO) += record.stake;
    }

    if totals.is_empty() {
        None
    } else {
        Some(CategoryTotals(totals))
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One line of the wager history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    #[serde(flatten)]
    pub wager: StoredWager,
    pub profit: Decimal,
}

/// Wager history in insertion order, with the closing total row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    pub rows: Vec<HistoryRow>,
    pub total_staked: Decimal,
    pub net_profit: Decimal,
}

/// Build the history view. `None` when there are no wagers.
pub fn history(wagers: &[StoredWager]) -> Option<History> {
    if wagers.is_empty() {
        return None;
    }

    let rows: Vec<HistoryRow> = wagers
        .iter()
        .map(|w| HistoryRow {
            wager: w.clone(),
            profit: profit(&w.record),
        })
        .collect();

    Some(History {
        total_staked: rows.iter().map(|r| r.wager.record.stake).sum(),
        net_profit: rows.iter().map(|r| r.profit).sum(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
