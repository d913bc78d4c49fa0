//! Transfer service tests: conservation, cross-references, the error
//! ladder, and all-or-nothing commits.

use chrono::NaiveDate;
use hermes_core::{engine::Economy, error::EconomyError, types::TxKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn economy(seed: u64) -> Economy {
    Economy::build_test(seed, date(2025, 3, 1)).unwrap()
}

/// The worked example: 1000 sends 300 to an empty account. Balance
/// deltas sum to zero and both ledger rows cross-reference the
/// counterparty.
#[test]
fn transfer_conserves_balance_and_cross_references() {
    let mut economy = economy(42);
    economy.adjust_account("ana", 1_000.0, "Saldo inicial").unwrap();
    let bea = economy.account_for("bea").unwrap();

    let ana = economy.transfer("ana", &bea.number, 300.0).unwrap();

    assert_eq!(ana.balance, 700.0);
    let bea = economy.find_account(&bea.number).unwrap().unwrap();
    assert_eq!(bea.balance, 300.0);

    let outgoing: Vec<_> = economy
        .statement("ana", 10)
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TxKind::TransferOut)
        .collect();
    let incoming: Vec<_> = economy
        .statement("bea", 10)
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TxKind::TransferIn)
        .collect();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(incoming.len(), 1);
    assert_eq!(outgoing[0].amount, 300.0);
    assert_eq!(incoming[0].amount, 300.0);
    assert_eq!(
        outgoing[0].related_account.as_deref(),
        Some(bea.number.as_str())
    );
    assert_eq!(
        incoming[0].related_account.as_deref(),
        Some(ana.number.as_str())
    );
}

#[test]
fn transfer_to_unknown_number_fails() {
    let mut economy = economy(42);
    economy.adjust_account("ana", 1_000.0, "Saldo inicial").unwrap();

    let err = economy.transfer("ana", "0000000000", 100.0).unwrap_err();

    assert!(
        matches!(err, EconomyError::AccountNotFound { ref number } if number == "0000000000"),
        "Expected AccountNotFound, got {err:?}"
    );
}

#[test]
fn transfer_to_own_account_fails() {
    let mut economy = economy(42);
    let ana = economy.account_for("ana").unwrap();

    let err = economy.transfer("ana", &ana.number, 100.0).unwrap_err();

    assert!(matches!(err, EconomyError::SelfTransfer));
}

#[test]
fn transfer_with_insufficient_funds_fails() {
    let mut economy = economy(42);
    economy.adjust_account("ana", 50.0, "Saldo inicial").unwrap();
    let bea = economy.account_for("bea").unwrap();

    let err = economy.transfer("ana", &bea.number, 100.0).unwrap_err();

    assert!(
        matches!(
            err,
            EconomyError::InsufficientFunds {
                required,
                available
            } if required == 100.0 && available == 50.0
        ),
        "Expected InsufficientFunds, got {err:?}"
    );
}

#[test]
fn transfer_rejects_non_positive_amounts() {
    let mut economy = economy(42);
    let bea = economy.account_for("bea").unwrap();

    for amount in [0.0, -25.0] {
        let err = economy.transfer("ana", &bea.number, amount).unwrap_err();
        assert!(matches!(err, EconomyError::InvalidAmount { .. }));
    }
}

/// A failed transfer must leave no trace: balances, ledger and event
/// log exactly as before the call.
#[test]
fn failed_transfer_writes_nothing() {
    let mut economy = economy(42);
    economy.adjust_account("ana", 50.0, "Saldo inicial").unwrap();
    economy.adjust_account("bea", 10.0, "Saldo inicial").unwrap();
    let bea = economy.find_owner_account("bea").unwrap().unwrap();

    let ledger_before = economy.ledger_count().unwrap();
    let events_before = economy.event_count().unwrap();

    economy.transfer("ana", &bea.number, 100.0).unwrap_err();

    assert_eq!(economy.ledger_count().unwrap(), ledger_before);
    assert_eq!(economy.event_count().unwrap(), events_before);
    assert_eq!(
        economy.find_owner_account("ana").unwrap().unwrap().balance,
        50.0
    );
    assert_eq!(
        economy.find_owner_account("bea").unwrap().unwrap().balance,
        10.0
    );
}

/// Account creation rides in the transfer's transaction, so a failed
/// transfer from a brand-new owner rolls the account back too.
#[test]
fn failed_transfer_rolls_back_lazy_account_creation() {
    let mut economy = economy(42);
    let bea = economy.account_for("bea").unwrap();

    economy.transfer("ana", &bea.number, 100.0).unwrap_err();

    assert!(
        economy.find_owner_account("ana").unwrap().is_none(),
        "The sender account must not survive the rollback"
    );
}
