//! Savings engine — time-locked deposits maturing at fixed interest.
//!
//! State machine: Active -> Withdrawn (terminal, one-shot). The lock
//! compares calendar days, so a deposit made at any hour of day 0
//! unlocks at midnight of day 30.

use crate::{
    accounts::open_or_fetch,
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    types::{Money, SavingsStatus, TxKind},
};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Savings {
    pub id: i64,
    pub account_id: i64,
    pub amount: Money,
    pub deposit_date: NaiveDateTime,
    pub status: SavingsStatus,
}

impl Economy {
    /// Move `amount` from the owner's balance into a new locked
    /// deposit.
    pub fn open_savings(&mut self, owner: &str, amount: Money) -> EconomyResult<Savings> {
        if amount <= 0.0 {
            return Err(EconomyError::InvalidAmount { amount });
        }
        let Self {
            store,
            clock,
            config,
            accounts_rng,
            ..
        } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let account = open_or_fetch(tx, accounts_rng, config, owner, now)?;
            if account.balance < amount {
                return Err(EconomyError::InsufficientFunds {
                    required: amount,
                    available: account.balance,
                });
            }
            tx.adjust_balance(account.id, -amount)?;
            tx.append_entry(
                account.id,
                TxKind::SavingsDeposit,
                amount,
                None,
                "Depósito de ahorro",
                now,
            )?;
            let savings = tx.insert_savings(account.id, amount, now)?;
            tx.append_event(
                &EconomyEvent::SavingsOpened {
                    owner: account.owner.clone(),
                    savings_id: savings.id,
                    amount,
                },
                now,
            )?;
            log::info!(
                "Savings {} opened by {}: {:.2} locked for {} days",
                savings.id,
                account.number,
                amount,
                config.savings_lock_days
            );
            Ok(savings)
        })
    }

    /// All deposits ever made by the owner, newest last.
    pub fn savings_for(&self, owner: &str) -> EconomyResult<Vec<Savings>> {
        let tx = self.store.view();
        match tx.account_by_owner(owner)? {
            Some(account) => tx.savings_for_account(account.id),
            None => Ok(Vec::new()),
        }
    }

    /// Withdraw a matured deposit: credits principal plus interest and
    /// closes the deposit for good. Returns the amount paid out.
    pub fn withdraw_savings(&mut self, owner: &str, savings_id: i64) -> EconomyResult<Money> {
        let Self {
            store,
            clock,
            config,
            ..
        } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let savings = tx
                .savings_by_id(savings_id)?
                .ok_or(EconomyError::InvalidDeposit)?;
            if savings.status != SavingsStatus::Active {
                return Err(EconomyError::InvalidDeposit);
            }
            let account = tx.account_by_id(savings.account_id)?.ok_or_else(|| {
                anyhow::anyhow!(
                    "savings {} references missing account {}",
                    savings.id,
                    savings.account_id
                )
            })?;
            if account.owner != owner {
                return Err(EconomyError::InvalidDeposit);
            }
            let unlock_date = savings.deposit_date.date() + Duration::days(config.savings_lock_days);
            if now.date() < unlock_date {
                return Err(EconomyError::StillLocked { unlock_date });
            }

            let paid_out = savings.amount * (1.0 + config.savings_interest);
            tx.adjust_balance(account.id, paid_out)?;
            tx.append_entry(
                account.id,
                TxKind::SavingsWithdrawal,
                paid_out,
                None,
                "Retiro de ahorro",
                now,
            )?;
            tx.mark_withdrawn(savings.id)?;
            tx.append_event(
                &EconomyEvent::SavingsWithdrawn {
                    owner: account.owner.clone(),
                    savings_id: savings.id,
                    paid_out,
                },
                now,
            )?;
            log::info!(
                "Savings {} withdrawn by {}: {:.2} paid out",
                savings.id,
                account.number,
                paid_out
            );
            Ok(paid_out)
        })
    }
}
