// SPDX-License-Identifier: AGPL-3.0-or-later

//! Failure values returned by ledger operations.
//!
//! Business, validation, and authentication failures are ordinary `Err`
//! values, never panics. Every `Display` message is safe to show to an end
//! user verbatim; storage faults keep their cause as an error source rather
//! than leaking it into the message.

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Account creation was asked to open with a negative balance.
    #[error("Initial deposit cannot be negative")]
    NegativeInitialDeposit,

    /// A deposit, withdrawal, or transfer amount was zero or negative.
    /// `operation` is the display name ("Deposit", "Withdrawal", "Transfer").
    #[error("{operation} amount must be positive")]
    NonPositiveAmount { operation: &'static str },

    /// Unknown account number or wrong password. Deliberately uniform:
    /// the message never reveals which half was wrong.
    #[error("Invalid account number or password")]
    AuthFailed,

    /// The source account balance does not cover the requested amount.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Transfer source and destination are the same account.
    #[error("Cannot transfer to the same account")]
    SameAccount,

    /// Transfer destination account does not exist.
    #[error("Destination account does not exist")]
    UnknownDestination,

    /// Backing storage could not be read or written.
    #[error("Store unavailable")]
    Unavailable(#[from] StorageError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_user_facing_contract() {
        assert_eq!(
            LedgerError::NonPositiveAmount {
                operation: "Deposit"
            }
            .to_string(),
            "Deposit amount must be positive"
        );
        assert_eq!(
            LedgerError::AuthFailed.to_string(),
            "Invalid account number or password"
        );
        assert_eq!(LedgerError::InsufficientFunds.to_string(), "Insufficient funds");
        assert_eq!(
            LedgerError::SameAccount.to_string(),
            "Cannot transfer to the same account"
        );
        assert_eq!(
            LedgerError::UnknownDestination.to_string(),
            "Destination account does not exist"
        );
    }

    #[test]
    fn storage_faults_do_not_leak_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied: /secret");
        let err = LedgerError::from(StorageError::from(io));
        assert_eq!(err.to_string(), "Store unavailable");
    }
}
