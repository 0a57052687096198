//! Ledger — the entry point used by every front end.
//!
//! Owns the store handle, validates form input, and feeds stored records
//! through the aggregator. Each call reads or writes the store once.

pub mod aggregator;

use tracing::{debug, info, warn};

use crate::storage::LedgerStore;
use crate::types::{validate_form, LedgerError, StoredWager, WagerForm, WagerRecord};
use aggregator::{CategoryTotals, History, Summary};

/// Wager ledger over an explicitly owned store.
pub struct Ledger {
    store: Box<dyn LedgerStore>,
}

impl Ledger {
    pub fn new(store: Box<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Validate raw form values and store the resulting wager.
    pub async fn add(&self, form: &WagerForm) -> Result<StoredWager, LedgerError> {
        let record = validate_form(form).map_err(|e| {
            warn!(error = %e, "Wager form rejected");
            e
        })?;
        self.add_record(record).await
    }

    /// Store an already validated record.
    pub async fn add_record(&self, record: WagerRecord) -> Result<StoredWager, LedgerError> {
        let id = self.store.insert(&record).await?;
        info!(
            id = %id,
            sport = %record.sport,
            bet_type = %record.bet_type,
            stake = %record.stake,
            odds = %record.odds,
            outcome = %record.outcome,
            "Wager added"
        );
        Ok(StoredWager { id, record })
    }

    /// Every stored wager, oldest first.
    pub async fn wagers(&self) -> Result<Vec<StoredWager>, LedgerError> {
        self.store.list_all().await
    }

    /// Headline statistics, or `None` when the ledger is empty.
    pub async fn summary(&self) -> Result<Option<Summary>, LedgerError> {
        let wagers = self.store.list_all().await?;
        let summary = aggregator::summarize(wagers.iter().map(|w| &w.record));
        if let Some(s) = &summary {
            debug!(count = s.count, net_profit = %s.net_profit, "Summary computed");
        }
        Ok(summary)
    }

    /// History rows with per-wager profit, or `None` when empty.
    pub async fn history(&self) -> Result<Option<History>, LedgerError> {
        let wagers = self.store.list_all().await?;
        Ok(aggregator::history(&wagers))
    }

    /// Stake totals per bet type, or `None` when empty.
    pub async fn totals_by_bet_type(&self) -> Result<Option<CategoryTotals>, LedgerError> {
        let wagers = self.store.list_all().await?;
        Ok(aggregator::category_totals(wagers.iter().map(|w| &w.record)))
    }

    /// Remove every wager. Returns how many were removed.
    pub async fn clear(&self) -> Result<u64, LedgerError> {
        let removed = self.store.clear_all().await?;
        info!(removed, "Ledger cleared");
        Ok(removed)
    }

    /// Release the store. Call once on shutdown.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
