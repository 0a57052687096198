//! Persistence layer.
//!
//! Defines the `LedgerStore` trait and provides the SQLite implementation.
//! The ledger is append-only: records are inserted, listed in insertion
//! order, or cleared all at once. There is no update or delete-by-id.

pub mod sqlite;

pub use sqlite::SqliteLedger;

use async_trait::async_trait;

use crate::types::{LedgerError, StoredWager, WagerId, WagerRecord};

/// Default database file, shared with the original desktop tracker.
pub const DEFAULT_DATABASE_FILE: &str = "bets.db";

/// Durable, append-only collection of wager records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a record and return its assigned id.
    /// Invalid records are rejected before anything is written.
    async fn insert(&self, record: &WagerRecord) -> Result<WagerId, LedgerError>;

    /// Every stored record, oldest first. Empty when nothing is stored.
    async fn list_all(&self) -> Result<Vec<StoredWager>, LedgerError>;

    /// Remove every record. Returns how many were removed; clearing an
    /// empty ledger is not an error.
    async fn clear_all(&self) -> Result<u64, LedgerError>;

    /// Release the underlying handle.
    async fn close(&self);
}
