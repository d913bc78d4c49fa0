//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two engines, same seed, same operations.
//! They must produce byte-identical event logs.
//! Any divergence is a blocker — do not merge until fixed.

use chrono::NaiveDate;
use hermes_core::engine::Economy;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

/// A fixed three-week town script touching every money path: fund,
/// accounts, transfers, loans with penalties, savings, lottery.
fn run_script(economy: &mut Economy) {
    economy.adjust_fund(250_000.0, "Presupuesto inicial").unwrap();
    economy
        .adjust_account("marcos", 20_000.0, "Saldo inicial")
        .unwrap();
    let lucia = economy.account_for("lucia").unwrap();
    economy.transfer("marcos", &lucia.number, 2_500.0).unwrap();
    economy.issue_loan("lucia").unwrap();
    economy.open_savings("marcos", 3_000.0).unwrap();
    economy.buy_ticket("marcos", "13577").unwrap();

    for day in 0..20u32 {
        economy.clock.advance_days(1);
        economy.accrue_overdue_penalties().unwrap();
        economy.ensure_drawn().unwrap();
        if day % 3 == 0 {
            economy.buy_ticket("marcos", "90210").unwrap();
        }
        if day == 15 {
            economy.repay_loan("lucia", 2_000.0).unwrap();
        }
    }
}

fn collect_event_log(economy: &Economy) -> Vec<(String, String)> {
    // The script never dispatches, so the undispatched view is the
    // full log in append order.
    economy
        .undispatched_events()
        .expect("read events")
        .into_iter()
        .map(|row| (row.kind, row.payload))
        .collect()
}

#[test]
fn same_seed_produces_identical_event_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let mut economy_a = Economy::build_test(SEED, start()).expect("economy a");
    let mut economy_b = Economy::build_test(SEED, start()).expect("economy b");

    run_script(&mut economy_a);
    run_script(&mut economy_b);

    let log_a = collect_event_log(&economy_a);
    let log_b = collect_event_log(&economy_b);

    assert_eq!(
        log_a.len(),
        log_b.len(),
        "Event log lengths differ: {} vs {}",
        log_a.len(),
        log_b.len()
    );

    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Event log diverged at entry {i}:\n  A: {a:?}\n  B: {b:?}");
    }
}

#[test]
fn different_seeds_produce_different_logs() {
    let mut economy_a = Economy::build_test(42, start()).expect("economy a");
    let mut economy_b = Economy::build_test(99, start()).expect("economy b");

    run_script(&mut economy_a);
    run_script(&mut economy_b);

    // The clearest observable: the very first account number minted.
    let a = economy_a.find_owner_account("marcos").unwrap().unwrap();
    let b = economy_b.find_owner_account("marcos").unwrap().unwrap();
    assert_ne!(
        a.number, b.number,
        "Different seeds minted the same account number — seed is not reaching the stream"
    );

    let log_a = collect_event_log(&economy_a);
    let log_b = collect_event_log(&economy_b);
    let any_different = log_a.iter().zip(log_b.iter()).any(|(x, y)| x != y);
    assert!(
        any_different,
        "Different seeds produced identical logs — seed is not being used"
    );
}

/// The lottery draw replays identically: same seed, same tickets, same
/// winning numbers, same payouts.
#[test]
fn draws_replay_identically() {
    let mut economy_a = Economy::build_test(7, start()).expect("economy a");
    let mut economy_b = Economy::build_test(7, start()).expect("economy b");

    for economy in [&mut economy_a, &mut economy_b] {
        economy
            .adjust_account("maria", 2_000.0, "Saldo inicial")
            .unwrap();
        economy.buy_ticket("maria", "00000").unwrap();
        economy.buy_ticket("maria", "99999").unwrap();
        economy.clock.advance_days(1);
    }

    let outcome_a = economy_a.ensure_drawn().unwrap().expect("draw a");
    let outcome_b = economy_b.ensure_drawn().unwrap().expect("draw b");

    assert_eq!(outcome_a.winning_numbers, outcome_b.winning_numbers);
    assert_eq!(outcome_a.winners, outcome_b.winners);
    assert_eq!(outcome_a.prize_each, outcome_b.prize_each);
    assert_eq!(
        economy_a.find_owner_account("maria").unwrap().unwrap().balance,
        economy_b.find_owner_account("maria").unwrap().unwrap().balance,
        "Payouts must replay identically"
    );
}
