//! Plain-text rendering of summaries, history tables and bar charts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::ledger::aggregator::{CategoryTotals, History, Summary};

pub const NO_STATS: &str = "No bets to show.";
pub const NO_HISTORY: &str = "No wagers to display.";
pub const NO_CHART: &str = "No data to display.";

const CHART_TITLE: &str = "Total Bet Amount by Bet Type";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Amount with currency symbol and two decimals. Negative values keep the
/// sign after the symbol (`$-50.00`), as the stats dialog always showed.
pub fn money(value: Decimal, currency: &str) -> String {
    format!("{currency}{value:.2}")
}

/// The four-line stats block.
pub fn format_summary(summary: &Summary, currency: &str) -> String {
    format!(
        "Total Wins: {}\nTotal Losses: {}\nNet Profit/Loss: {}\nWin Percentage: {:.2}%",
        money(summary.total_win_profit, currency),
        money(summary.total_loss_amount, currency),
        money(summary.net_profit, currency),
        summary.win_percentage,
    )
}

/// History table with a closing total row. With `color`, non-negative
/// profit is green and negative profit red.
pub fn format_history(history: &History, currency: &str, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<12} {:>10} {:>6}  {:<7} {:<10} {:>11}",
        "#", "Sport", "Amount", "Odds", "Outcome", "Bet Type", "Profit"
    );
    let _ = writeln!(out, "{}", "-".repeat(68));

    for row in &history.rows {
        let record = &row.wager.record;
        let profit = format!("{:>11}", money(row.profit, currency));
        let _ = writeln!(
            out,
            "{:>4}  {:<12} {:>10} {:>6}  {:<7} {:<10} {}",
            row.wager.id,
            record.sport.as_str(),
            money(record.stake, currency),
            record.odds.normalize(),
            record.outcome.as_str(),
            record.bet_type.as_str(),
            paint(&profit, row.profit, color),
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(68));
    let net = format!("{:>11}", money(history.net_profit, currency));
    let _ = write!(
        out,
        "{:>4}  {:<12} {:>10} {:>6}  {:<7} {:<10} {}",
        "",
        "Total",
        money(history.total_staked, currency),
        "",
        "",
        "",
        paint(&net, history.net_profit, color),
    );
    out
}

fn paint(text: &str, value: Decimal, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    let code = if value >= Decimal::ZERO { GREEN } else { RED };
    format!("{code}{text}{RESET}")
}

/// Horizontal bar chart, bars scaled so the largest total spans `width`.
pub fn format_bar_chart(totals: &CategoryTotals, currency: &str, width: usize) -> String {
    let label_width = totals.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max = totals.max();

    let mut out = String::new();
    let _ = writeln!(out, "{CHART_TITLE}");
    let _ = write!(out, "{}", "=".repeat(CHART_TITLE.len()));

    for (label, total) in totals.iter() {
        let len = bar_length(total, max, width);
        let _ = write!(
            out,
            "\n{label:<label_width$} | {} {}",
            "█".repeat(len),
            money(total, currency),
        );
    }
    out
}

fn bar_length(total: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO || total <= Decimal::ZERO {
        return 0;
    }
    let scaled = (total / max * Decimal::from(width)).round();
    scaled.to_usize().unwrap_or(0).max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
