// SPDX-License-Identifier: AGPL-3.0-or-later

//! The Ledger Store: account lifecycle, authentication, balance mutation,
//! and history queries over the two JSON documents.
//!
//! ## Operation shape
//!
//! Every operation loads the relevant document(s) fully, mutates in memory,
//! and rewrites the file before returning. Expected business failures
//! (bad amount, bad credentials, insufficient funds) come back as
//! [`LedgerError`] values with user-safe messages; only real storage faults
//! surface as [`LedgerError::Unavailable`].
//!
//! ## Concurrency
//!
//! An internal mutex serializes all operations on one store instance, which
//! makes the read-modify-write cycle safe to share across request handlers
//! in a single process. Separate processes pointed at the same data
//! directory still race at file granularity (last writer wins); that is an
//! accepted limitation of the whole-file design.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::config::ACCOUNT_NUMBER_BASE;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountInfo, AccountStatus, AccountSummary, BalanceSummary, CreatedAccount, DataInfo,
    HistoryPage, MutationReceipt, Transaction, TransactionType, TransferReceipt,
};
use crate::password;
use crate::storage::{DocumentStore, StoragePaths};

/// The accounts document: account_number -> Account.
type Accounts = BTreeMap<String, Account>;

/// Account and transaction persistence over two JSON documents.
///
/// Construct one explicitly and pass it (by reference) into whatever layer
/// needs it; there is deliberately no global instance, so tests can point
/// each store at isolated storage.
pub struct LedgerStore {
    storage: DocumentStore,
    lock: Mutex<()>,
}

impl LedgerStore {
    /// Open a ledger store, creating the data directory and empty documents
    /// if they do not exist yet. Idempotent.
    pub fn open(paths: StoragePaths) -> LedgerResult<Self> {
        let storage = DocumentStore::open(paths)?;
        Ok(Self {
            storage,
            lock: Mutex::new(()),
        })
    }

    /// Create a new account.
    ///
    /// Fails with [`LedgerError::NegativeInitialDeposit`] when
    /// `initial_deposit` is negative. A positive initial deposit is recorded
    /// as a `deposit` transaction ("Initial deposit").
    pub fn create_account(
        &self,
        name: &str,
        initial_deposit: Decimal,
        password: &str,
    ) -> LedgerResult<CreatedAccount> {
        if initial_deposit < Decimal::ZERO {
            return Err(LedgerError::NegativeInitialDeposit);
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.load_accounts()?;
        let account_number = next_account_number(&accounts);

        let account = Account {
            account_number: account_number.clone(),
            name: name.to_string(),
            balance: initial_deposit,
            password_hash: password::hash_password(password),
            created_date: Utc::now(),
            status: AccountStatus::Active,
        };
        accounts.insert(account_number.clone(), account);
        self.save_accounts(&accounts)?;

        if initial_deposit > Decimal::ZERO {
            self.record_transaction(
                &account_number,
                TransactionType::Deposit,
                initial_deposit,
                "Initial deposit",
                &account_number,
            )?;
        }

        tracing::info!(%account_number, "account created");
        Ok(CreatedAccount {
            account_number,
            name: name.to_string(),
            balance: initial_deposit,
        })
    }

    /// Check an account number / password pair.
    ///
    /// Returns `false` for unknown accounts and wrong passwords alike; only
    /// a storage fault is an error. This is the single gate every
    /// credentialed operation goes through.
    pub fn authenticate(&self, account_number: &str, password: &str) -> LedgerResult<bool> {
        let accounts = self.load_accounts()?;
        Ok(verify_credentials(&accounts, account_number, password))
    }

    /// Get the balance and display name for an account.
    pub fn get_balance(&self, account_number: &str, password: &str) -> LedgerResult<BalanceSummary> {
        let accounts = self.load_accounts()?;
        let account = authenticated(&accounts, account_number, password)?;

        Ok(BalanceSummary {
            account_number: account.account_number.clone(),
            name: account.name.clone(),
            balance: account.balance,
        })
    }

    /// Deposit `amount` into an account.
    ///
    /// The amount is validated before authentication. An empty description
    /// defaults to "Deposit".
    pub fn deposit(
        &self,
        account_number: &str,
        amount: Decimal,
        password: &str,
        description: &str,
    ) -> LedgerResult<MutationReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                operation: "Deposit",
            });
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.load_accounts()?;
        authenticated(&accounts, account_number, password)?;

        let account = accounts
            .get_mut(account_number)
            .ok_or(LedgerError::AuthFailed)?;
        let old_balance = account.balance;
        account.balance += amount;
        let new_balance = account.balance;
        self.save_accounts(&accounts)?;

        let description = non_empty(description, "Deposit");
        self.record_transaction(
            account_number,
            TransactionType::Deposit,
            amount,
            description,
            account_number,
        )?;

        tracing::debug!(account_number, %amount, "deposit");
        Ok(MutationReceipt {
            account_number: account_number.to_string(),
            transaction_type: TransactionType::Deposit,
            amount,
            old_balance,
            new_balance,
        })
    }

    /// Withdraw `amount` from an account.
    ///
    /// Insufficient funds are only reported after authentication succeeds,
    /// so the error cannot be used to probe balances.
    pub fn withdraw(
        &self,
        account_number: &str,
        amount: Decimal,
        password: &str,
        description: &str,
    ) -> LedgerResult<MutationReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                operation: "Withdrawal",
            });
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.load_accounts()?;
        authenticated(&accounts, account_number, password)?;

        let account = accounts
            .get_mut(account_number)
            .ok_or(LedgerError::AuthFailed)?;
        if account.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        let old_balance = account.balance;
        account.balance -= amount;
        let new_balance = account.balance;
        self.save_accounts(&accounts)?;

        let description = non_empty(description, "Withdrawal");
        self.record_transaction(
            account_number,
            TransactionType::Withdrawal,
            amount,
            description,
            account_number,
        )?;

        tracing::debug!(account_number, %amount, "withdrawal");
        Ok(MutationReceipt {
            account_number: account_number.to_string(),
            transaction_type: TransactionType::Withdrawal,
            amount,
            old_balance,
            new_balance,
        })
    }

    /// Transfer `amount` between two accounts.
    ///
    /// Both balance changes land in a single write of the accounts document,
    /// so no partial transfer is ever observable on disk. Two mirrored
    /// transaction records are appended afterwards: `transfer_out` on the
    /// source (related account = destination), then `transfer_in` on the
    /// destination (related account = source).
    pub fn transfer(
        &self,
        from_account: &str,
        to_account: &str,
        amount: Decimal,
        password: &str,
        description: &str,
    ) -> LedgerResult<TransferReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                operation: "Transfer",
            });
        }
        if from_account == to_account {
            return Err(LedgerError::SameAccount);
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.load_accounts()?;
        authenticated(&accounts, from_account, password)?;

        if !accounts.contains_key(to_account) {
            return Err(LedgerError::UnknownDestination);
        }

        let from_old_balance = accounts[from_account].balance;
        let to_old_balance = accounts[to_account].balance;
        if from_old_balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        let from_new_balance = from_old_balance - amount;
        let to_new_balance = to_old_balance + amount;
        if let Some(from) = accounts.get_mut(from_account) {
            from.balance = from_new_balance;
        }
        if let Some(to) = accounts.get_mut(to_account) {
            to.balance = to_new_balance;
        }
        self.save_accounts(&accounts)?;

        let description = non_empty(description, "Transfer");
        self.record_transaction(
            from_account,
            TransactionType::TransferOut,
            amount,
            &format!("{description} to {to_account}"),
            to_account,
        )?;
        self.record_transaction(
            to_account,
            TransactionType::TransferIn,
            amount,
            &format!("{description} from {from_account}"),
            from_account,
        )?;

        tracing::debug!(from_account, to_account, %amount, "transfer");
        Ok(TransferReceipt {
            from_account: from_account.to_string(),
            to_account: to_account.to_string(),
            amount,
            from_old_balance,
            from_new_balance,
            to_old_balance,
            to_new_balance,
        })
    }

    /// Get an account's transaction history, newest first.
    ///
    /// Entries with equal timestamps keep their append order (stable sort).
    /// A `limit` of zero or less means no truncation.
    pub fn get_transaction_history(
        &self,
        account_number: &str,
        password: &str,
        limit: i64,
    ) -> LedgerResult<HistoryPage> {
        let accounts = self.load_accounts()?;
        authenticated(&accounts, account_number, password)?;

        let mut transactions: Vec<Transaction> = self
            .load_transactions()?
            .into_iter()
            .filter(|tx| tx.account_number == account_number)
            .collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if limit > 0 {
            transactions.truncate(limit as usize);
        }

        let total_transactions = transactions.len();
        Ok(HistoryPage {
            account_number: account_number.to_string(),
            transactions,
            total_transactions,
        })
    }

    /// Get the full account summary (everything but the password hash).
    pub fn get_account_info(
        &self,
        account_number: &str,
        password: &str,
    ) -> LedgerResult<AccountInfo> {
        let accounts = self.load_accounts()?;
        let account = authenticated(&accounts, account_number, password)?;
        Ok(AccountInfo::from(account))
    }

    /// List every account's public fields. Administrative/debug operation;
    /// takes no credentials and never exposes password hashes.
    pub fn list_all_accounts(&self) -> LedgerResult<Vec<AccountSummary>> {
        let accounts = self.load_accounts()?;
        Ok(accounts.values().map(AccountSummary::from).collect())
    }

    /// Where this store keeps its data (diagnostics view).
    pub fn data_info(&self) -> DataInfo {
        let paths = self.storage.paths();
        DataInfo {
            data_directory: paths.root().to_path_buf(),
            accounts_file: paths.accounts_file(),
            transactions_file: paths.transactions_file(),
            accounts_exist: paths.accounts_file().exists(),
            transactions_exist: paths.transactions_file().exists(),
        }
    }

    // ========== Document Access ==========

    fn load_accounts(&self) -> LedgerResult<Accounts> {
        Ok(self
            .storage
            .read_document(self.storage.paths().accounts_file())?)
    }

    fn save_accounts(&self, accounts: &Accounts) -> LedgerResult<()> {
        Ok(self
            .storage
            .write_document(self.storage.paths().accounts_file(), accounts)?)
    }

    fn load_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self
            .storage
            .read_document(self.storage.paths().transactions_file())?)
    }

    /// Append one entry to the transaction log. Ids are assigned from the
    /// log length, so they increase with log position but are not
    /// guaranteed gap-free when separate processes race.
    fn record_transaction(
        &self,
        account_number: &str,
        transaction_type: TransactionType,
        amount: Decimal,
        description: &str,
        related_account: &str,
    ) -> LedgerResult<()> {
        let mut transactions = self.load_transactions()?;
        let now = Utc::now();
        transactions.push(Transaction {
            id: transactions.len() as u64 + 1,
            account_number: account_number.to_string(),
            transaction_type,
            amount,
            description: description.to_string(),
            related_account: related_account.to_string(),
            timestamp: now,
            date: now.date_naive(),
        });
        self.storage
            .write_document(self.storage.paths().transactions_file(), &transactions)?;
        Ok(())
    }
}

/// First unused account number at or above the fixed base.
fn next_account_number(accounts: &Accounts) -> String {
    let mut candidate = ACCOUNT_NUMBER_BASE;
    while accounts.contains_key(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn verify_credentials(accounts: &Accounts, account_number: &str, password: &str) -> bool {
    match accounts.get(account_number) {
        Some(account) => password::verify_password(password, &account.password_hash),
        None => false,
    }
}

/// Uniform auth gate: unknown account and wrong password produce the same
/// [`LedgerError::AuthFailed`].
fn authenticated<'a>(
    accounts: &'a Accounts,
    account_number: &str,
    password: &str,
) -> Result<&'a Account, LedgerError> {
    if !verify_credentials(accounts, account_number, password) {
        return Err(LedgerError::AuthFailed);
    }
    accounts.get(account_number).ok_or(LedgerError::AuthFailed)
}

fn non_empty<'a>(description: &'a str, default: &'a str) -> &'a str {
    if description.trim().is_empty() {
        default
    } else {
        description
    }
}
