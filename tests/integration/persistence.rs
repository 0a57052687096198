//! SQLite file persistence across open/close cycles.

use rust_decimal_macros::dec;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::Path;

use wagerlog::ledger::Ledger;
use wagerlog::storage::{LedgerStore, SqliteLedger};
use wagerlog::types::{
    BetType, LedgerError, Outcome, Sport, WagerForm, WagerRecord, MAX_ODDS, MAX_STAKE,
};

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.db");

    let ledger = Ledger::new(Box::new(SqliteLedger::open(&path).await.unwrap()));
    let first = ledger
        .add(&WagerForm {
            sport: "Football".into(),
            stake: "100".into(),
            odds: "2.5".into(),
            outcome: "Win".into(),
            bet_type: "Moneyline".into(),
        })
        .await
        .unwrap();
    ledger.close().await;

    let ledger = Ledger::new(Box::new(SqliteLedger::open(&path).await.unwrap()));
    let wagers = ledger.wagers().await.unwrap();
    assert_eq!(wagers, vec![first]);

    let summary = ledger.summary().await.unwrap().unwrap();
    assert_eq!(summary.net_profit, dec!(150));
    ledger.close().await;
}

#[tokio::test]
async fn test_clear_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.db");

    let store = SqliteLedger::open(&path).await.unwrap();
    let record =
        WagerRecord::new(Sport::Hockey, dec!(40), dec!(1.75), Outcome::Loss, BetType::Total)
            .unwrap();
    store.insert(&record).await.unwrap();
    store.insert(&record).await.unwrap();
    assert_eq!(store.clear_all().await.unwrap(), 2);
    store.close().await;

    let store = SqliteLedger::open(&path).await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
    assert_eq!(store.clear_all().await.unwrap(), 0);
    store.close().await;
}

/// Run raw statements against a database file outside the ledger.
async fn execute_raw(path: &Path, statements: &[&str]) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    for statement in statements {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
}

// The original tracker created its table without NOT NULL constraints.
const LEGACY_TABLE: &str = "CREATE TABLE bets (id INTEGER PRIMARY KEY AUTOINCREMENT, sport TEXT, \
                            amount REAL, odds REAL, outcome TEXT, bet_type TEXT)";

#[tokio::test]
async fn test_opens_database_written_by_original_tracker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.db");
    execute_raw(
        &path,
        &[
            LEGACY_TABLE,
            "INSERT INTO bets (sport, amount, odds, outcome, bet_type) \
             VALUES ('Basketball', 25.0, 1.8, 'Win', 'Spread')",
        ],
    )
    .await;

    let store = SqliteLedger::open(&path).await.unwrap();
    let wagers = store.list_all().await.unwrap();
    assert_eq!(wagers.len(), 1);
    assert_eq!(wagers[0].record.sport, Sport::Basketball);
    assert_eq!(wagers[0].record.profit(), dec!(20));
    store.close().await;
}

#[tokio::test]
async fn test_out_of_range_legacy_row_recovered_by_removing_only_that_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.db");
    execute_raw(
        &path,
        &[
            LEGACY_TABLE,
            "INSERT INTO bets (sport, amount, odds, outcome, bet_type) \
             VALUES ('Football', 40.0, 2.2, 'Loss', 'Total')",
            "INSERT INTO bets (sport, amount, odds, outcome, bet_type) \
             VALUES ('Football', 10.0, 1.0, 'Win', 'Moneyline')",
        ],
    )
    .await;

    let store = SqliteLedger::open(&path).await.unwrap();
    let err = store.list_all().await.unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRow { id: 2, .. }));
    assert!(err.to_string().contains("delete row 2 of the bets table"));
    store.close().await;

    execute_raw(&path, &["DELETE FROM bets WHERE id = 2"]).await;

    let store = SqliteLedger::open(&path).await.unwrap();
    let wagers = store.list_all().await.unwrap();
    assert_eq!(wagers.len(), 1);
    assert_eq!(wagers[0].record.stake, dec!(40));
    store.close().await;
}

#[tokio::test]
async fn test_edge_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.db");

    let inserted = vec![
        WagerRecord::new(Sport::Baseball, dec!(0.01), dec!(1.0001), Outcome::Win, BetType::Total)
            .unwrap(),
        WagerRecord::new(Sport::Hockey, MAX_STAKE, MAX_ODDS, Outcome::Win, BetType::Spread)
            .unwrap(),
        WagerRecord::new(Sport::Football, dec!(250.123456), dec!(1.909091), Outcome::Loss, BetType::Moneyline)
            .unwrap(),
    ];

    let store = SqliteLedger::open(&path).await.unwrap();
    for record in &inserted {
        store.insert(record).await.unwrap();
    }
    let too_precise = WagerRecord::new(
        Sport::Football,
        dec!(10),
        dec!(1.00000000000000000001),
        Outcome::Win,
        BetType::Total,
    )
    .unwrap();
    assert!(store.insert(&too_precise).await.unwrap_err().is_validation());
    store.close().await;

    let ledger = Ledger::new(Box::new(SqliteLedger::open(&path).await.unwrap()));
    let listed: Vec<WagerRecord> = ledger
        .wagers()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.record)
        .collect();
    assert_eq!(listed, inserted);

    let summary = ledger.summary().await.unwrap().unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_loss_amount, dec!(250.123456));
    ledger.close().await;
}
