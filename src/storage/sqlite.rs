//! SQLite-backed wager ledger.
//!
//! Uses the `bets` table layout of the original tracker so an existing
//! `bets.db` opens unchanged. Money is held as `Decimal` in memory and
//! converted to `REAL` at this boundary.

use async_trait::async_trait;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::LedgerStore;
use crate::types::{
    BetType, LedgerError, Outcome, Sport, StoredWager, ValidationError, WagerId, WagerRecord,
};

const CREATE_BETS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS bets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sport TEXT NOT NULL,
        amount REAL NOT NULL,
        odds REAL NOT NULL,
        outcome TEXT NOT NULL,
        bet_type TEXT NOT NULL
    )
"#;

const INSERT_BET: &str =
    "INSERT INTO bets (sport, amount, odds, outcome, bet_type) VALUES (?, ?, ?, ?, ?)";

const SELECT_BETS: &str =
    "SELECT id, sport, amount, odds, outcome, bet_type FROM bets ORDER BY id ASC";

/// Wager ledger stored in a single SQLite table.
pub struct SqliteLedger {
    pool: SqlitePool,
    location: String,
}

impl SqliteLedger {
    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let ledger = Self::connect(options, path.display().to_string()).await?;
        info!(path = %ledger.location, "Wager ledger opened");
        Ok(ledger)
    }

    /// Open a private in-memory ledger. Contents vanish on close.
    pub async fn open_in_memory() -> Result<Self, LedgerError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, ":memory:".to_string()).await
    }

    async fn connect(options: SqliteConnectOptions, location: String) -> Result<Self, LedgerError> {
        // One connection that is never recycled: a single writer, and an
        // in-memory database lives exactly as long as the pool.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_BETS_TABLE).execute(&pool).await?;
        debug!(location = %location, "Schema ready");

        Ok(Self { pool, location })
    }

    /// Where the ledger lives (file path or `:memory:`).
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn insert(&self, record: &WagerRecord) -> Result<WagerId, LedgerError> {
        record.validate()?;
        let stake = to_real("stake", record.stake)?;
        let odds = to_real("odds", record.odds)?;

        let result = sqlx::query(INSERT_BET)
            .bind(record.sport.as_str())
            .bind(stake)
            .bind(odds)
            .bind(record.outcome.as_str())
            .bind(record.bet_type.as_str())
            .execute(&self.pool)
            .await?;

        let id = WagerId(result.last_insert_rowid());
        debug!(id = %id, location = %self.location, "Wager row inserted");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredWager>, LedgerError> {
        let rows = sqlx::query(SELECT_BETS).fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Wager rows loaded");
        rows.iter().map(decode_row).collect()
    }

    async fn clear_all(&self) -> Result<u64, LedgerError> {
        let removed = sqlx::query("DELETE FROM bets")
            .execute(&self.pool)
            .await?
            .rows_affected();
        debug!(removed, "Wager rows deleted");
        Ok(removed)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!(path = %self.location, "Wager ledger closed");
    }
}

/// Convert to the `REAL` column type. Values that would not read back
/// as the same `Decimal` are rejected, so listing returns what was added.
fn to_real(field: &'static str, value: Decimal) -> Result<f64, LedgerError> {
    let not_storable = || ValidationError::NotStorable {
        field,
        value: value.to_string(),
    };
    let real = value.to_f64().ok_or_else(not_storable)?;
    match Decimal::from_f64(real) {
        Some(back) if back == value => Ok(real),
        _ => Err(not_storable().into()),
    }
}

/// Rebuild a record from a row, re-applying the record invariants.
fn decode_row(row: &SqliteRow) -> Result<StoredWager, LedgerError> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |reason: String| LedgerError::CorruptRow { id, reason };

    let sport: Option<String> = row.try_get("sport")?;
    let amount: Option<f64> = row.try_get("amount")?;
    let odds: Option<f64> = row.try_get("odds")?;
    let outcome: Option<String> = row.try_get("outcome")?;
    let bet_type: Option<String> = row.try_get("bet_type")?;

    let sport = sport
        .ok_or_else(|| corrupt("sport is NULL".into()))?
        .parse::<Sport>()
        .map_err(|e: ValidationError| corrupt(e.to_string()))?;
    let stake = amount
        .and_then(Decimal::from_f64)
        .ok_or_else(|| corrupt(format!("amount {amount:?} is not a number")))?;
    let odds = odds
        .and_then(Decimal::from_f64)
        .ok_or_else(|| corrupt(format!("odds {odds:?} is not a number")))?;
    let outcome = outcome
        .ok_or_else(|| corrupt("outcome is NULL".into()))?
        .parse::<Outcome>()
        .map_err(|e: ValidationError| corrupt(e.to_string()))?;
    let bet_type = bet_type
        .ok_or_else(|| corrupt("bet_type is NULL".into()))?
        .parse::<BetType>()
        .map_err(|e: ValidationError| corrupt(e.to_string()))?;

    let record = WagerRecord::new(sport, stake, odds, outcome, bet_type)
        .map_err(|e| corrupt(e.to_string()))?;

    Ok(StoredWager {
        id: WagerId(id),
        record,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
