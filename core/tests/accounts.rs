//! Account store tests: lazy creation, number uniqueness, adjustments.

use chrono::NaiveDate;
use hermes_core::{
    directory::StaticDirectory,
    engine::Economy,
    rng::{RngBank, StreamSlot},
    types::TxKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn economy(seed: u64) -> Economy {
    Economy::build_test(seed, date(2025, 3, 1)).unwrap()
}

/// An owner gets exactly one account, reused on every later call.
#[test]
fn account_created_once_per_owner() {
    let mut economy = economy(42);

    let first = economy.account_for("marcos").unwrap();
    let second = economy.account_for("marcos").unwrap();

    assert_eq!(first.id, second.id, "Second call must reuse the account");
    assert_eq!(first.number, second.number);
    assert_eq!(economy.account_count().unwrap(), 1);
    assert_eq!(first.balance, 0.0, "New accounts start empty");
}

/// Generated numbers are 10 decimal digits and unique across owners.
#[test]
fn account_numbers_are_unique_fixed_length_digits() {
    let mut economy = economy(42);

    let mut numbers = Vec::new();
    for owner in ["a", "b", "c", "d", "e", "f", "g", "h"] {
        let account = economy.account_for(owner).unwrap();
        assert_eq!(account.number.len(), 10);
        assert!(account.number.bytes().all(|b| b.is_ascii_digit()));
        numbers.push(account.number);
    }
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 8, "All generated numbers must be distinct");
}

/// The first account number is fully determined by the seed: it is the
/// first draw of the dedicated account stream.
#[test]
fn account_numbers_follow_the_seeded_stream() {
    let mut economy = economy(7);
    let mut stream = RngBank::new(7).for_stream(StreamSlot::Account);

    let account = economy.account_for("marcos").unwrap();

    assert_eq!(account.number, stream.digits(10));
}

/// findByNumber resolves accounts; unknown numbers resolve to None.
#[test]
fn find_account_by_number() {
    let mut economy = economy(42);
    let opened = economy.account_for("lucia").unwrap();

    let found = economy.find_account(&opened.number).unwrap().unwrap();
    assert_eq!(found.id, opened.id);
    assert_eq!(found.owner, "lucia");

    assert!(economy.find_account("0000000000").unwrap().is_none());
}

/// Adjustments are unconditional: a debit below zero is recorded, not
/// rejected, and each adjustment leaves one ledger row of the right
/// kind.
#[test]
fn adjust_account_is_unconditional() {
    let mut economy = economy(42);

    let after_credit = economy.adjust_account("sofia", 500.0, "Saldo inicial").unwrap();
    assert_eq!(after_credit.balance, 500.0);

    let after_debit = economy.adjust_account("sofia", -800.0, "Sanción").unwrap();
    assert_eq!(after_debit.balance, -300.0, "Negative balances are legal");

    let entries = economy.statement("sofia", 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, TxKind::GovernmentAdjustmentSub);
    assert_eq!(entries[0].amount, 800.0, "Ledger stores the magnitude");
    assert_eq!(entries[1].kind, TxKind::GovernmentAdjustmentAdd);
}

/// The statement is newest-first and capped at the requested limit.
#[test]
fn statement_is_newest_first_and_limited() {
    let mut economy = economy(42);
    for i in 1..=5 {
        economy
            .adjust_account("marcos", i as f64, "Ajuste")
            .unwrap();
    }

    let entries = economy.statement("marcos", 3).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].amount, 5.0, "Most recent entry first");
    assert_eq!(entries[2].amount, 3.0);

    assert!(
        economy.statement("nobody", 10).unwrap().is_empty(),
        "An owner with no account has no history"
    );
}

#[test]
fn card_style_defaults_and_updates() {
    let mut economy = economy(42);

    let account = economy.account_for("marcos").unwrap();
    assert_eq!(account.card_style, "classic");

    let updated = economy.set_card_style("marcos", "gold").unwrap();
    assert_eq!(updated.card_style, "gold");

    let reread = economy.account_for("marcos").unwrap();
    assert_eq!(reread.card_style, "gold");
}

/// The transfer preview resolves a number to the holder's display
/// name, falling back to the raw handle when the directory has none.
#[test]
fn lookup_resolves_display_names() {
    let mut economy = economy(42);
    let directory = StaticDirectory::new().with_name("marcos", "Marcos Vega");

    let marcos = economy.account_for("marcos").unwrap();
    let lucia = economy.account_for("lucia").unwrap();

    assert_eq!(
        economy.lookup(&directory, &marcos.number).unwrap(),
        Some("Marcos Vega".to_string())
    );
    assert_eq!(
        economy.lookup(&directory, &lucia.number).unwrap(),
        Some("lucia".to_string()),
        "Unknown to the directory: fall back to the handle"
    );
    assert_eq!(economy.lookup(&directory, "0000000000").unwrap(), None);
}
