//! Lottery engine — one draw per calendar day.
//!
//! RULE: The draw is an explicit advance operation. Comparing
//! `last_run_date` to today inside a single transaction guarantees it
//! fires exactly once per day no matter how many callers race to
//! trigger it, and the day only advances after the draw is fully
//! processed. Winning numbers come from the dedicated lottery RNG
//! stream, so a run with a known seed has a predictable draw.

use crate::{
    accounts::open_or_fetch,
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    treasury::ensure_fund,
    types::{Money, TxKind},
};
use chrono::NaiveDate;
use serde::Serialize;

/// Digits in a ticket and in the winning string.
pub const TICKET_DIGITS: usize = 5;

/// The lottery singleton as stored.
#[derive(Debug, Clone)]
pub struct LotteryRow {
    pub jackpot: Money,
    pub last_run: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub owner: String,
    pub numbers: String,
    pub draw_date: NaiveDate,
}

/// What a fired draw did. `ensure_drawn` returns None when the day
/// had already been processed.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub draw_date: NaiveDate,
    pub winning_numbers: String,
    pub winners: Vec<String>,
    pub prize_each: Money,
}

#[derive(Debug, Clone)]
pub struct LotterySummary {
    pub jackpot: Money,
    pub last_run: NaiveDate,
    pub tickets_today: i64,
}

impl Economy {
    /// Advance the lottery to today. Initializes the singleton on
    /// first access; on a day rollover, draws one winning string
    /// against the tickets of the last processed day, pays winners an
    /// even jackpot split, and reseeds (win) or carries (no win) the
    /// jackpot.
    pub fn ensure_drawn(&mut self) -> EconomyResult<Option<DrawOutcome>> {
        let Self {
            store,
            clock,
            config,
            accounts_rng,
            lottery_rng,
        } = self;
        let now = clock.now();
        let today = now.date();
        store.with_txn(|tx| {
            let row = match tx.lottery_row()? {
                Some(row) => row,
                None => {
                    tx.init_lottery(config.lottery_seed_jackpot, today)?;
                    log::info!(
                        "Lottery initialized: jackpot {:.2}, round of {today}",
                        config.lottery_seed_jackpot
                    );
                    return Ok(None);
                }
            };
            if today <= row.last_run {
                return Ok(None);
            }

            let winning = lottery_rng.digits(TICKET_DIGITS);
            let tickets = tx.tickets_for_draw(row.last_run)?;
            let winners: Vec<&Ticket> = tickets.iter().filter(|t| t.numbers == winning).collect();
            let prize_each = if winners.is_empty() {
                0.0
            } else {
                row.jackpot / winners.len() as f64
            };

            for ticket in &winners {
                let account = open_or_fetch(tx, accounts_rng, config, &ticket.owner, now)?;
                tx.adjust_balance(account.id, prize_each)?;
                tx.append_entry(
                    account.id,
                    TxKind::LotteryWin,
                    prize_each,
                    None,
                    "¡Premio de lotería!",
                    now,
                )?;
                tx.append_event(
                    &EconomyEvent::LotteryWon {
                        owner: ticket.owner.clone(),
                        amount: prize_each,
                        winning_numbers: winning.clone(),
                    },
                    now,
                )?;
                log::info!(
                    "Lottery win: {} takes {:.2} with {}",
                    ticket.owner,
                    prize_each,
                    winning
                );
            }

            let next_jackpot = if winners.is_empty() {
                row.jackpot
            } else {
                config.lottery_seed_jackpot
            };
            tx.set_lottery(next_jackpot, today)?;
            tx.append_event(
                &EconomyEvent::DrawCompleted {
                    draw_date: row.last_run,
                    winning_numbers: winning.clone(),
                    winner_count: winners.len(),
                    prize_each,
                },
                now,
            )?;
            log::info!(
                "Draw for {}: winning {}, {} winner(s), jackpot now {:.2}",
                row.last_run,
                winning,
                winners.len(),
                next_jackpot
            );
            Ok(Some(DrawOutcome {
                draw_date: row.last_run,
                winning_numbers: winning,
                winners: winners.iter().map(|t| t.owner.clone()).collect(),
                prize_each,
            }))
        })
    }

    /// Buy one ticket for today's round at the fixed price. Part of
    /// the price grows the jackpot, the rest is treasury income.
    pub fn buy_ticket(&mut self, owner: &str, numbers: &str) -> EconomyResult<Ticket> {
        if numbers.len() != TICKET_DIGITS || !numbers.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EconomyError::InvalidTicketFormat {
                numbers: numbers.to_string(),
            });
        }
        self.ensure_drawn()?;

        let Self {
            store,
            clock,
            config,
            accounts_rng,
            ..
        } = self;
        let now = clock.now();
        let today = now.date();
        store.with_txn(|tx| {
            let account = open_or_fetch(tx, accounts_rng, config, owner, now)?;
            let price = config.lottery_ticket_price;
            if account.balance < price {
                return Err(EconomyError::InsufficientFunds {
                    required: price,
                    available: account.balance,
                });
            }
            tx.adjust_balance(account.id, -price)?;
            tx.append_entry(
                account.id,
                TxKind::LotteryTicket,
                price,
                None,
                "Boleto de lotería",
                now,
            )?;
            tx.add_to_jackpot(config.lottery_jackpot_share)?;
            ensure_fund(tx)?;
            tx.adjust_fund_balance(price - config.lottery_jackpot_share)?;
            let ticket = tx.insert_ticket(owner, numbers, today)?;
            tx.append_event(
                &EconomyEvent::TicketPurchased {
                    owner: owner.to_string(),
                    numbers: numbers.to_string(),
                    draw_date: today,
                },
                now,
            )?;
            log::info!("{owner} bought ticket {numbers} for the {today} draw");
            Ok(ticket)
        })
    }

    /// Current lottery state, advancing the draw first so the numbers
    /// reflect today's round.
    pub fn lottery(&mut self) -> EconomyResult<LotterySummary> {
        self.ensure_drawn()?;
        let today = self.clock.today();
        let tx = self.store.view();
        let row = tx
            .lottery_row()?
            .ok_or_else(|| anyhow::anyhow!("lottery row missing after ensure_drawn"))?;
        Ok(LotterySummary {
            jackpot: row.jackpot,
            last_run: row.last_run,
            tickets_today: tx.ticket_count_for(today)?,
        })
    }
}
