//! Savings engine tests: the 30-day lock and the one-shot withdrawal.

use chrono::NaiveDate;
use hermes_core::{
    engine::Economy,
    error::EconomyError,
    types::{SavingsStatus, TxKind},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn economy(seed: u64) -> Economy {
    Economy::build_test(seed, date(2025, 3, 1)).unwrap()
}

#[test]
fn deposit_locks_money_away() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 3_000.0, "Saldo inicial").unwrap();

    let savings = economy.open_savings("marcos", 2_000.0).unwrap();

    assert_eq!(savings.amount, 2_000.0);
    assert_eq!(savings.status, SavingsStatus::Active);
    assert_eq!(
        economy.find_owner_account("marcos").unwrap().unwrap().balance,
        1_000.0
    );
    let entries = economy.statement("marcos", 5).unwrap();
    assert_eq!(entries[0].kind, TxKind::SavingsDeposit);
}

#[test]
fn deposit_requires_funds_and_positive_amount() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 100.0, "Saldo inicial").unwrap();

    let err = economy.open_savings("marcos", 500.0).unwrap_err();
    assert!(matches!(err, EconomyError::InsufficientFunds { .. }));

    let err = economy.open_savings("marcos", -1.0).unwrap_err();
    assert!(matches!(err, EconomyError::InvalidAmount { .. }));
}

/// Day 29 is still locked; day 30 pays principal plus 4%.
#[test]
fn withdrawal_honors_the_thirty_day_lock() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 2_000.0, "Saldo inicial").unwrap();
    let savings = economy.open_savings("marcos", 1_000.0).unwrap();

    economy.clock.advance_days(29);
    let err = economy.withdraw_savings("marcos", savings.id).unwrap_err();
    assert!(
        matches!(err, EconomyError::StillLocked { unlock_date } if unlock_date == date(2025, 3, 31)),
        "Expected StillLocked until 2025-03-31, got {err:?}"
    );

    economy.clock.advance_days(1);
    let paid_out = economy.withdraw_savings("marcos", savings.id).unwrap();
    assert!(
        (paid_out - 1_040.0).abs() < 1e-9,
        "1000 at 4%, got {paid_out:.4}"
    );
    assert_eq!(
        economy.find_owner_account("marcos").unwrap().unwrap().balance,
        2_040.0
    );
    let entries = economy.statement("marcos", 5).unwrap();
    assert_eq!(entries[0].kind, TxKind::SavingsWithdrawal);
}

/// Withdrawn is terminal: a second withdrawal is rejected and pays
/// nothing.
#[test]
fn withdrawal_is_one_shot() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 1_000.0, "Saldo inicial").unwrap();
    let savings = economy.open_savings("marcos", 1_000.0).unwrap();
    economy.clock.advance_days(30);

    economy.withdraw_savings("marcos", savings.id).unwrap();
    let balance_after = economy.find_owner_account("marcos").unwrap().unwrap().balance;

    let err = economy.withdraw_savings("marcos", savings.id).unwrap_err();
    assert!(matches!(err, EconomyError::InvalidDeposit));
    assert_eq!(
        economy.find_owner_account("marcos").unwrap().unwrap().balance,
        balance_after
    );

    let listed = economy.savings_for("marcos").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, SavingsStatus::Withdrawn);
}

/// A deposit can only be withdrawn by the account that owns it.
#[test]
fn withdrawal_by_another_owner_fails() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 1_000.0, "Saldo inicial").unwrap();
    let savings = economy.open_savings("marcos", 1_000.0).unwrap();
    economy.clock.advance_days(30);

    let err = economy.withdraw_savings("lucia", savings.id).unwrap_err();
    assert!(matches!(err, EconomyError::InvalidDeposit));

    let err = economy.withdraw_savings("marcos", savings.id + 99).unwrap_err();
    assert!(matches!(err, EconomyError::InvalidDeposit));
}
