// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ledger Store - JSON-backed toy banking core
//!
//! This crate owns account and transaction persistence for the demo bank.
//! State lives in two whole-file-rewrite JSON documents (`accounts.json`
//! and `transactions.json`); every operation loads the relevant document,
//! mutates in memory, and rewrites the file before returning.
//!
//! ## Modules
//!
//! - `store` - [`store::LedgerStore`], the operations surface
//! - `storage` - JSON document persistence (paths, atomic rewrite)
//! - `models` - accounts, transactions, and operation receipts
//! - `password` - salted iterated password hashing
//! - `session` - short-lived signed session tokens for the web layer
//!
//! ## Concurrency
//!
//! Single-process, synchronous. A [`store::LedgerStore`] serializes its own
//! operations behind an internal mutex; two *processes* pointed at the same
//! data directory can still race at file granularity (last writer wins).

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod session;
pub mod storage;
pub mod store;

pub use error::{LedgerError, LedgerResult};
pub use store::LedgerStore;
