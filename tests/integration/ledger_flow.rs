//! Ledger contract tests against the in-memory store.

use rust_decimal_macros::dec;

use wagerlog::ledger::Ledger;
use wagerlog::types::{LedgerError, Outcome, ValidationError, WagerForm};

use crate::memory_store::MemoryStore;

fn form(sport: &str, stake: &str, odds: &str, outcome: &str, bet_type: &str) -> WagerForm {
    WagerForm {
        sport: sport.into(),
        stake: stake.into(),
        odds: odds.into(),
        outcome: outcome.into(),
        bet_type: bet_type.into(),
    }
}

fn ledger() -> (Ledger, MemoryStore) {
    let store = MemoryStore::new();
    (Ledger::new(Box::new(store.clone())), store)
}

#[tokio::test]
async fn test_listing_matches_insertion_order() {
    let (ledger, _) = ledger();
    let forms = [
        form("Football", "100", "2.5", "Win", "Moneyline"),
        form("Basketball", "50", "1.9", "Loss", "Spread"),
        form("Hockey", "30", "3.0", "Win", "Total"),
        form("Baseball", "12.75", "1.45", "Loss", "Moneyline"),
    ];

    let mut added = Vec::new();
    for f in &forms {
        added.push(ledger.add(f).await.unwrap());
    }

    assert_eq!(ledger.wagers().await.unwrap(), added);
}

#[tokio::test]
async fn test_failed_inserts_leave_store_unchanged() {
    let (ledger, store) = ledger();
    ledger.add(&form("Football", "10", "2", "Win", "Total")).await.unwrap();

    let bad = [
        form("Football", "0", "2", "Win", "Total"),
        form("Football", "-3", "2", "Win", "Total"),
        form("Football", "10", "1", "Win", "Total"),
        form("Football", "10", "0.5", "Loss", "Total"),
        form("", "10", "2", "Win", "Total"),
        form("Football", "10", "2", "", "Total"),
        form("Football", "10", "2", "Win", ""),
        form("Football", "ten", "2", "Win", "Total"),
    ];
    for f in &bad {
        let err = ledger.add(f).await.unwrap_err();
        assert!(err.is_validation(), "{f:?} should be a validation error");
    }

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_summary_figures() {
    let (ledger, _) = ledger();
    ledger.add(&form("Football", "100", "2.5", "Win", "Moneyline")).await.unwrap();
    ledger.add(&form("Football", "50", "4.0", "Loss", "Spread")).await.unwrap();
    ledger.add(&form("Football", "30", "3.0", "Win", "Total")).await.unwrap();

    let s = ledger.summary().await.unwrap().expect("summary");
    assert_eq!(s.total_win_profit, dec!(210));
    assert_eq!(s.total_loss_amount, dec!(50));
    assert_eq!(s.net_profit, dec!(160));
    assert_eq!(format!("{:.2}", s.win_percentage), "66.67");
}

#[tokio::test]
async fn test_no_data_is_not_zero_summary() {
    let (ledger, _) = ledger();
    assert!(ledger.summary().await.unwrap().is_none());

    ledger.add(&form("Football", "10", "2", "Loss", "Total")).await.unwrap();
    let s = ledger.summary().await.unwrap().expect("summary");
    assert_eq!(s.win_percentage, 0.0);
    assert_eq!(s.total_win_profit, dec!(0));
}

#[tokio::test]
async fn test_category_totals() {
    let (ledger, _) = ledger();
    ledger.add(&form("Football", "100", "2", "Win", "Moneyline")).await.unwrap();
    ledger.add(&form("Hockey", "20", "2", "Loss", "Moneyline")).await.unwrap();
    ledger.add(&form("Baseball", "30", "2", "Win", "Spread")).await.unwrap();

    let totals = ledger.totals_by_bet_type().await.unwrap().expect("totals");
    let collected: Vec<(String, _)> = totals.iter().map(|(k, v)| (k.to_string(), v)).collect();
    assert_eq!(
        collected,
        vec![("Moneyline".to_string(), dec!(120)), ("Spread".to_string(), dec!(30))]
    );
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let (ledger, store) = ledger();
    ledger.add(&form("Football", "10", "2", "Win", "Total")).await.unwrap();
    ledger.add(&form("Football", "10", "2", "Loss", "Total")).await.unwrap();

    assert_eq!(ledger.clear().await.unwrap(), 2);
    assert_eq!(ledger.clear().await.unwrap(), 0);
    assert!(ledger.wagers().await.unwrap().is_empty());
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_outcome_labels_case_insensitive() {
    let (ledger, _) = ledger();
    let w = ledger.add(&form("football", "10", "2", "WIN", "spread")).await.unwrap();
    assert_eq!(w.record.outcome, Outcome::Win);
    assert_eq!(w.record.sport.to_string(), "Football");
    assert_eq!(w.record.bet_type.to_string(), "Spread");
}

#[tokio::test]
async fn test_storage_failure_surfaces() {
    let (ledger, store) = ledger();
    store.set_failing(true);

    let err = ledger.add(&form("Football", "10", "2", "Win", "Total")).await.unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert!(ledger.summary().await.is_err());

    store.set_failing(false);
    assert!(ledger.summary().await.unwrap().is_none());
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let (ledger, store) = ledger();
    store.set_failing(true);

    // A bad form is rejected on its own merits; the store is never asked.
    let err = ledger.add(&form("Football", "10", "1.0", "Win", "Total")).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::OddsTooLow(_))
    ));
}

#[tokio::test]
async fn test_close_releases_store() {
    let (ledger, store) = ledger();
    ledger.close().await;
    assert!(store.is_closed());
}
