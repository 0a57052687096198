//! Integration tests for the wager ledger.
//!
//! Exercise the public API end to end: an in-memory store for the
//! `Ledger` contract, and real SQLite files for persistence.

mod ledger_flow;
mod persistence;
