//! Lottery engine tests: exactly-once daily draws, jackpot flow, and
//! the seeded, predictable winning stream.

use chrono::NaiveDate;
use hermes_core::{
    engine::Economy,
    error::EconomyError,
    rng::{RngBank, StreamSlot},
    types::TxKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn economy(seed: u64) -> Economy {
    Economy::build_test(seed, date(2025, 3, 1)).unwrap()
}

/// The winning string of the first rollover, as a fresh copy of the
/// lottery stream would draw it.
fn predicted_winning(seed: u64) -> String {
    RngBank::new(seed).for_stream(StreamSlot::Lottery).digits(5)
}

/// First access creates the singleton at the seed jackpot; repeated
/// calls on the same day change nothing.
#[test]
fn draw_fires_at_most_once_per_day() {
    let mut economy = economy(42);

    assert!(economy.ensure_drawn().unwrap().is_none(), "Init, no draw");
    let summary = economy.lottery().unwrap();
    assert_eq!(summary.jackpot, 50_000.0);
    assert_eq!(summary.last_run, date(2025, 3, 1));

    assert!(
        economy.ensure_drawn().unwrap().is_none(),
        "Same day: no second draw"
    );

    economy.clock.advance_days(1);
    assert!(
        economy.ensure_drawn().unwrap().is_some(),
        "Day rollover fires the draw"
    );
    assert!(
        economy.ensure_drawn().unwrap().is_none(),
        "And only once per day"
    );
    assert_eq!(economy.lottery().unwrap().last_run, date(2025, 3, 2));
}

/// Ticket money is split between jackpot growth and the treasury.
#[test]
fn ticket_price_splits_between_jackpot_and_fund() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 1_000.0, "Saldo inicial").unwrap();
    let fund_before = economy.fund_balance().unwrap();

    economy.buy_ticket("marcos", "12345").unwrap();

    assert_eq!(
        economy.find_owner_account("marcos").unwrap().unwrap().balance,
        500.0
    );
    assert_eq!(economy.lottery().unwrap().jackpot, 50_250.0);
    assert_eq!(economy.fund_balance().unwrap(), fund_before + 250.0);
    assert_eq!(economy.lottery().unwrap().tickets_today, 1);

    let entries = economy.statement("marcos", 5).unwrap();
    assert_eq!(entries[0].kind, TxKind::LotteryTicket);
    assert_eq!(entries[0].amount, 500.0);
}

#[test]
fn ticket_numbers_must_be_five_digits() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 1_000.0, "Saldo inicial").unwrap();

    for numbers in ["1234", "123456", "12a45", "     ", "1234é"] {
        let err = economy.buy_ticket("marcos", numbers).unwrap_err();
        assert!(
            matches!(err, EconomyError::InvalidTicketFormat { .. }),
            "Expected InvalidTicketFormat for {numbers:?}, got {err:?}"
        );
    }
}

#[test]
fn ticket_requires_funds() {
    let mut economy = economy(42);
    economy.adjust_account("marcos", 100.0, "Saldo inicial").unwrap();

    let err = economy.buy_ticket("marcos", "12345").unwrap_err();
    assert!(matches!(err, EconomyError::InsufficientFunds { .. }));
}

/// A ticket matching the drawn string takes the whole jackpot, and the
/// jackpot reseeds for the next round.
#[test]
fn matching_ticket_wins_the_jackpot() {
    let mut economy = economy(7);
    economy.adjust_account("maria", 10_000.0, "Saldo inicial").unwrap();
    let winning = predicted_winning(7);

    economy.buy_ticket("maria", &winning).unwrap();
    economy.clock.advance_days(1);
    let outcome = economy.ensure_drawn().unwrap().expect("draw fires");

    assert_eq!(outcome.winning_numbers, winning);
    assert_eq!(outcome.draw_date, date(2025, 3, 1));
    assert_eq!(outcome.winners, vec!["maria".to_string()]);
    assert_eq!(outcome.prize_each, 50_250.0, "Seed jackpot plus this ticket's share");

    assert_eq!(
        economy.find_owner_account("maria").unwrap().unwrap().balance,
        59_750.0,
        "10000 - 500 ticket + 50250 prize"
    );
    assert_eq!(
        economy.lottery().unwrap().jackpot,
        50_000.0,
        "Jackpot reseeds after a win"
    );

    let wins: Vec<_> = economy
        .statement("maria", 10)
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TxKind::LotteryWin)
        .collect();
    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].amount, 50_250.0);
}

/// Two matching tickets split the jackpot evenly.
#[test]
fn multiple_winners_split_evenly() {
    let mut economy = economy(7);
    economy.adjust_account("maria", 1_000.0, "Saldo inicial").unwrap();
    economy.adjust_account("pedro", 1_000.0, "Saldo inicial").unwrap();
    let winning = predicted_winning(7);

    economy.buy_ticket("maria", &winning).unwrap();
    economy.buy_ticket("pedro", &winning).unwrap();
    economy.clock.advance_days(1);
    let outcome = economy.ensure_drawn().unwrap().expect("draw fires");

    assert_eq!(outcome.winners.len(), 2);
    assert_eq!(outcome.prize_each, 25_250.0, "(50000 + 2 x 250) / 2");
    assert_eq!(
        economy.find_owner_account("maria").unwrap().unwrap().balance,
        25_750.0
    );
    assert_eq!(
        economy.find_owner_account("pedro").unwrap().unwrap().balance,
        25_750.0
    );
}

/// With no matching ticket the jackpot carries into the next round.
#[test]
fn jackpot_carries_over_without_winners() {
    let mut economy = economy(7);
    economy.adjust_account("maria", 1_000.0, "Saldo inicial").unwrap();
    let winning = predicted_winning(7);
    // One digit off the drawn string: a guaranteed loser.
    let flipped = b'0' + ((winning.as_bytes()[0] - b'0' + 1) % 10);
    let losing = format!("{}{}", flipped as char, &winning[1..]);

    economy.buy_ticket("maria", &losing).unwrap();
    economy.clock.advance_days(1);
    let outcome = economy.ensure_drawn().unwrap().expect("draw fires");

    assert!(outcome.winners.is_empty());
    assert_eq!(outcome.prize_each, 0.0);
    assert_eq!(
        economy.lottery().unwrap().jackpot,
        50_250.0,
        "Unwon jackpot carries, including the ticket share"
    );
    assert_eq!(
        economy.find_owner_account("maria").unwrap().unwrap().balance,
        500.0
    );
}

/// A ticket participates only in the draw of the day it was bought.
#[test]
fn tickets_are_bound_to_their_draw_day() {
    let mut economy = economy(7);
    economy.adjust_account("maria", 10_000.0, "Saldo inicial").unwrap();
    let mut stream = RngBank::new(7).for_stream(StreamSlot::Lottery);
    let first_winning = stream.digits(5);
    let second_winning = stream.digits(5);

    // Bought on day one, so eligible for the first draw only, even
    // though the numbers match the second draw's string.
    economy.buy_ticket("maria", &second_winning).unwrap();

    economy.clock.advance_days(1);
    let first = economy.ensure_drawn().unwrap().expect("first draw");
    assert_eq!(first.winning_numbers, first_winning);

    economy.clock.advance_days(1);
    let second = economy.ensure_drawn().unwrap().expect("second draw");
    assert_eq!(second.winning_numbers, second_winning);
    assert!(
        second.winners.is_empty(),
        "Day-one tickets must not enter the day-two draw"
    );
}
