// SPDX-License-Identifier: AGPL-3.0-or-later

//! # JSON Document Storage
//!
//! Persistence for the ledger lives in two plain JSON documents under the
//! data directory:
//!
//! ```text
//! data/
//!   accounts.json       # object: account_number -> Account
//!   transactions.json   # array: Transaction records in append order
//! ```
//!
//! Both documents are rewritten in full on every mutation (temp file +
//! atomic rename), so they remain valid JSON after every write. No other
//! component may write these files.

pub mod documents;
pub mod paths;

pub use documents::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
