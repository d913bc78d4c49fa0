//! Loan engine — issue, penalty accrual, repayment.
//!
//! State machine: none -> Active -> Paid (terminal). One active loan
//! per account at a time.
//!
//! RULE: Penalty accrual is idempotent per 2-day interval. The charge
//! is computed from whole calendar days elapsed since the last check
//! (or the due date, before the first check); re-running inside the
//! same interval charges nothing. Accrual runs from the explicit
//! advance operation and again at repayment time, so a repayment is
//! always priced against the current debt.

use crate::{
    accounts::{open_or_fetch, Account},
    config::EconomyConfig,
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    store::Txn,
    treasury::ensure_fund,
    types::{LoanStatus, Money, TxKind},
};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Loan {
    pub id: i64,
    pub account_id: i64,
    pub amount_due: Money,
    pub start_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub last_penalty_check: Option<NaiveDateTime>,
    pub status: LoanStatus,
}

impl Economy {
    /// Disburse the fixed principal to the owner's account and open a
    /// loan for the fixed repayment target, due in `loan_term_days`.
    /// The disbursement is financed by the government fund.
    pub fn issue_loan(&mut self, owner: &str) -> EconomyResult<Loan> {
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
            if tx.active_loan_for(account.id)?.is_some() {
                return Err(EconomyError::LoanAlreadyActive);
            }
            let due = now + Duration::days(config.loan_term_days);
            tx.adjust_balance(account.id, config.loan_principal)?;
            tx.append_entry(
                account.id,
                TxKind::LoanReceived,
                config.loan_principal,
                None,
                "Préstamo del banco",
                now,
            )?;
            ensure_fund(tx)?;
            tx.adjust_fund_balance(-config.loan_principal)?;
            let loan = tx.insert_loan(account.id, config.loan_amount_due, now, due)?;
            tx.append_event(
                &EconomyEvent::LoanIssued {
                    owner: account.owner.clone(),
                    number: account.number.clone(),
                    principal: config.loan_principal,
                    amount_due: loan.amount_due,
                    due_date: due.date(),
                },
                now,
            )?;
            log::info!(
                "Loan issued to {}: {:.2} disbursed, {:.2} due by {}",
                account.number,
                config.loan_principal,
                loan.amount_due,
                due.date()
            );
            Ok(loan)
        })
    }

    /// The owner's active loan, if any. Read-only: penalties accrue
    /// through [`Economy::accrue_overdue_penalties`], not views.
    pub fn active_loan(&self, owner: &str) -> EconomyResult<Option<Loan>> {
        let tx = self.store.view();
        match tx.account_by_owner(owner)? {
            Some(account) => tx.active_loan_for(account.id),
            None => Ok(None),
        }
    }

    /// Assess penalties on every overdue active loan. Idempotent:
    /// callable on demand or from a scheduler, any number of times.
    /// Returns how many loans were actually charged this pass.
    pub fn accrue_overdue_penalties(&mut self) -> EconomyResult<usize> {
        let Self { store, clock, config, .. } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let overdue = tx.overdue_active_loans(now)?;
            let mut charged = 0;
            for loan in &overdue {
                let account = tx.account_by_id(loan.account_id)?.ok_or_else(|| {
                    anyhow::anyhow!("loan {} references missing account {}", loan.id, loan.account_id)
                })?;
                let updated = apply_penalty(tx, config, &account, loan, now)?;
                if updated.amount_due > loan.amount_due {
                    charged += 1;
                }
            }
            Ok(charged)
        })
    }

    /// Repay up to `amount` against the owner's active loan. The
    /// charge is capped at the outstanding debt; paying the debt in
    /// full settles the loan. Repayments flow back to the fund that
    /// financed the loan.
    pub fn repay_loan(&mut self, owner: &str, amount: Money) -> EconomyResult<Loan> {
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
            let loan = tx
                .active_loan_for(account.id)?
                .ok_or(EconomyError::NoActiveLoan)?;

            // Any outstanding penalty lands first; it also debits the
            // balance, so reread the account before the funds check.
            let loan = apply_penalty(tx, config, &account, &loan, now)?;
            let account = tx.account_by_id(account.id)?.ok_or_else(|| {
                anyhow::anyhow!("account {} vanished mid-transaction", account.id)
            })?;

            let charge = amount.min(loan.amount_due);
            if account.balance < charge {
                return Err(EconomyError::InsufficientFunds {
                    required: charge,
                    available: account.balance,
                });
            }
            let remaining = loan.amount_due - charge;
            let status = if remaining <= 0.0 {
                LoanStatus::Paid
            } else {
                LoanStatus::Active
            };

            tx.adjust_balance(account.id, -charge)?;
            tx.append_entry(
                account.id,
                TxKind::LoanPayment,
                charge,
                None,
                "Pago de préstamo",
                now,
            )?;
            ensure_fund(tx)?;
            tx.adjust_fund_balance(charge)?;
            tx.record_payment(loan.id, remaining, status)?;
            tx.append_event(
                &EconomyEvent::LoanRepaid {
                    owner: account.owner.clone(),
                    number: account.number.clone(),
                    paid: charge,
                    remaining,
                },
                now,
            )?;
            log::info!(
                "Loan {} repayment of {:.2} by {}, remaining {:.2}",
                loan.id,
                charge,
                account.number,
                remaining
            );
            Ok(Loan {
                amount_due: remaining,
                status,
                ..loan
            })
        })
    }
}

/// Apply the overdue penalty to one loan inside an open transaction.
/// No-op while `now` is on or before the due date, and inside an
/// interval that has already been charged. Returns the loan as it
/// stands afterwards.
pub(crate) fn apply_penalty(
    tx: &Txn<'_>,
    config: &EconomyConfig,
    account: &Account,
    loan: &Loan,
    now: NaiveDateTime,
) -> EconomyResult<Loan> {
    if now <= loan.due_date {
        return Ok(loan.clone());
    }
    let base = loan.last_penalty_check.unwrap_or(loan.due_date);
    let elapsed_days = (now.date() - base.date()).num_days();
    let intervals = elapsed_days / config.loan_penalty_interval_days;
    if intervals < 1 {
        return Ok(loan.clone());
    }

    let penalty = loan.amount_due * config.loan_penalty_rate * intervals as f64;
    let amount_due = loan.amount_due + penalty;
    tx.record_penalty(loan.id, amount_due, now)?;
    tx.adjust_balance(account.id, -penalty)?;
    tx.append_entry(
        account.id,
        TxKind::LoanFee,
        penalty,
        None,
        "Penalización por impago",
        now,
    )?;
    tx.append_event(
        &EconomyEvent::PenaltyApplied {
            owner: account.owner.clone(),
            number: account.number.clone(),
            loan_id: loan.id,
            penalty,
            amount_due,
        },
        now,
    )?;
    log::info!(
        "Penalty {:.2} on loan {} ({} overdue intervals), debt now {:.2}",
        penalty,
        loan.id,
        intervals,
        amount_due
    );
    Ok(Loan {
        amount_due,
        last_penalty_check: Some(now),
        ..loan.clone()
    })
}
