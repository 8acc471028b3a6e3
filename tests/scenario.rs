// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end walk through the documented banking scenario, including the
//! persisted JSON contract and process-restart persistence.

use chrono::Duration;
use ledger_store::models::TransactionType;
use ledger_store::session::SessionSigner;
use ledger_store::storage::StoragePaths;
use ledger_store::{LedgerError, LedgerStore};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

#[test]
fn full_banking_scenario() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(StoragePaths::new(dir.path())).unwrap();

    // Create with an initial deposit of 1000.0.
    let alice = store
        .create_account("Alice Example", dec!(1000.0), "alice-pw")
        .unwrap();
    assert_eq!(alice.balance, dec!(1000.0));

    let history = store
        .get_transaction_history(&alice.account_number, "alice-pw", 10)
        .unwrap();
    assert_eq!(history.transactions.len(), 1);
    assert_eq!(history.transactions[0].description, "Initial deposit");

    // Deposit 250.0.
    let receipt = store
        .deposit(&alice.account_number, dec!(250.0), "alice-pw", "")
        .unwrap();
    assert_eq!(receipt.new_balance, dec!(1250.0));

    // Withdrawing 2000.0 fails and changes nothing.
    let err = store
        .withdraw(&alice.account_number, dec!(2000.0), "alice-pw", "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds));
    assert_eq!(err.to_string(), "Insufficient funds");
    assert_eq!(
        store
            .get_balance(&alice.account_number, "alice-pw")
            .unwrap()
            .balance,
        dec!(1250.0)
    );

    // Transfer 150.0 to a second account holding 500.0.
    let bob = store
        .create_account("Bob Example", dec!(500.0), "bob-pw")
        .unwrap();
    let transfer = store
        .transfer(
            &alice.account_number,
            &bob.account_number,
            dec!(150.0),
            "alice-pw",
            "",
        )
        .unwrap();
    assert_eq!(transfer.from_new_balance, dec!(1100.0));
    assert_eq!(transfer.to_new_balance, dec!(650.0));

    let out = store
        .get_transaction_history(&alice.account_number, "alice-pw", 1)
        .unwrap();
    assert_eq!(
        out.transactions[0].transaction_type,
        TransactionType::TransferOut
    );
    assert_eq!(out.transactions[0].amount, dec!(150.0));

    let inn = store
        .get_transaction_history(&bob.account_number, "bob-pw", 1)
        .unwrap();
    assert_eq!(
        inn.transactions[0].transaction_type,
        TransactionType::TransferIn
    );
    assert_eq!(inn.transactions[0].amount, dec!(150.0));

    // Reopening the same location reflects committed balances.
    let reopened = LedgerStore::open(StoragePaths::new(dir.path())).unwrap();
    assert_eq!(
        reopened
            .get_balance(&alice.account_number, "alice-pw")
            .unwrap()
            .balance,
        dec!(1100.0)
    );
}

#[test]
fn persisted_documents_match_the_contract() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(StoragePaths::new(dir.path())).unwrap();

    let alice = store
        .create_account("Alice", dec!(10.0), "alice-pw")
        .unwrap();

    // accounts.json: object keyed by account number.
    let accounts: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("accounts.json")).unwrap())
            .unwrap();
    let record = &accounts[&alice.account_number];
    for field in [
        "account_number",
        "name",
        "balance",
        "password_hash",
        "created_date",
        "status",
    ] {
        assert!(record.get(field).is_some(), "missing account field {field}");
    }
    assert_eq!(record["status"], "active");

    // transactions.json: array in append order.
    let transactions: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("transactions.json")).unwrap(),
    )
    .unwrap();
    let log = transactions.as_array().unwrap();
    assert_eq!(log.len(), 1);
    for field in [
        "id",
        "account_number",
        "transaction_type",
        "amount",
        "description",
        "related_account",
        "timestamp",
        "date",
    ] {
        assert!(log[0].get(field).is_some(), "missing transaction field {field}");
    }
    assert_eq!(log[0]["id"], 1);
    assert_eq!(log[0]["transaction_type"], "deposit");
}

#[test]
fn login_flow_issues_a_session_token_not_a_stored_password() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(StoragePaths::new(dir.path())).unwrap();
    let signer = SessionSigner::with_ttl(b"web-layer-secret", Duration::minutes(15));

    let alice = store
        .create_account("Alice", dec!(100.0), "alice-pw")
        .unwrap();

    // What the web login handler does: authenticate once, then hold only
    // the signed token for later requests.
    assert!(store
        .authenticate(&alice.account_number, "alice-pw")
        .unwrap());
    let token = signer.issue(&alice.account_number).unwrap();

    let bound_account = signer.verify(&token).unwrap();
    assert_eq!(bound_account, alice.account_number);

    // The token authorizes nothing by itself at the store: mutations still
    // need the password (sensitive confirmations re-prompt for it).
    let err = store
        .withdraw(&bound_account, dec!(10.0), &token, "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::AuthFailed));
}
