//! WAGERLOG — local sports wager ledger
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod storage;
pub mod ledger;
pub mod report;
pub mod dashboard;
