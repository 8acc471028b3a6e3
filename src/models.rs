// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Ledger Data Models
//!
//! Persisted entities ([`Account`], [`Transaction`]) and the receipt types
//! returned by [`crate::LedgerStore`] operations. All types derive `Serialize`
//! so the web layer can render them directly; persisted entities also derive
//! `Deserialize` for loading the JSON documents.
//!
//! Amounts use [`rust_decimal::Decimal`] throughout so repeated deposits and
//! withdrawals round-trip exactly (no binary floating point).
//!
//! Summary types never carry the password hash.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Accounts
// =============================================================================

/// Account status.
///
/// Only `active` is ever produced today; the enum keeps the persisted field
/// forward-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
}

/// A persisted account record (one entry in `accounts.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Opaque unique identifier, assigned sequentially from a fixed base.
    pub account_number: String,
    /// Display name, arbitrary.
    pub name: String,
    /// Current balance. Invariant: never negative after a committed operation.
    pub balance: Decimal,
    /// One-way digest of the account password (see [`crate::password`]).
    /// The raw password is never persisted.
    pub password_hash: String,
    /// When the account was created.
    pub created_date: DateTime<Utc>,
    /// Current account status.
    pub status: AccountStatus,
}

// =============================================================================
// Transactions
// =============================================================================

/// Kind of balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
}

/// An immutable entry in the append-only transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequential positive id, unique within the log.
    pub id: u64,
    /// The account whose ledger this entry belongs to.
    pub account_number: String,
    pub transaction_type: TransactionType,
    /// Always positive; direction is carried by `transaction_type`.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Counterparty account number; equals `account_number` for deposits
    /// and withdrawals.
    pub related_account: String,
    /// Full creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Calendar date derived from `timestamp`.
    pub date: NaiveDate,
}

// =============================================================================
// Operation Receipts
// =============================================================================

/// Returned by [`crate::LedgerStore::create_account`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAccount {
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
}

/// Returned by [`crate::LedgerStore::get_balance`].
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSummary {
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
}

/// Returned by deposit and withdraw operations.
#[derive(Debug, Clone, Serialize)]
pub struct MutationReceipt {
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub old_balance: Decimal,
    pub new_balance: Decimal,
}

/// Returned by [`crate::LedgerStore::transfer`]; carries both sides.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    pub from_old_balance: Decimal,
    pub from_new_balance: Decimal,
    pub to_old_balance: Decimal,
    pub to_new_balance: Decimal,
}

/// Full account view returned by [`crate::LedgerStore::get_account_info`].
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
    pub created_date: DateTime<Utc>,
    pub status: AccountStatus,
}

/// Public account view returned by [`crate::LedgerStore::list_all_accounts`].
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub created_date: DateTime<Utc>,
}

/// A filtered, newest-first slice of the transaction log.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub account_number: String,
    pub transactions: Vec<Transaction>,
    /// Count after limit truncation (what the caller actually received).
    pub total_transactions: usize,
}

/// Where the store keeps its data (diagnostics view).
#[derive(Debug, Clone, Serialize)]
pub struct DataInfo {
    pub data_directory: PathBuf,
    pub accounts_file: PathBuf,
    pub transactions_file: PathBuf,
    pub accounts_exist: bool,
    pub transactions_exist: bool,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number.clone(),
            name: account.name.clone(),
            balance: account.balance,
            created_date: account.created_date,
            status: account.status,
        }
    }
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number.clone(),
            name: account.name.clone(),
            balance: account.balance,
            status: account.status,
            created_date: account.created_date,
        }
    }
}
