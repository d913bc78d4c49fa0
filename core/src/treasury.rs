//! Government treasury — the fund behind loans, fines and licensing.
//!
//! The fund is a single-row balance with no floor: officials may drive
//! it negative. It is debited by loan issuance and payroll settlement
//! and credited by loan repayments, fines, license sales and the
//! treasury share of lottery tickets.

use crate::{
    accounts::{open_or_fetch, Account},
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    store::Txn,
    types::{LicenseKind, Money, TxKind},
};

impl Economy {
    pub fn fund_balance(&self) -> EconomyResult<Money> {
        Ok(self.store.view().fund_balance_row()?.unwrap_or(0.0))
    }

    /// Unconditional fund adjustment by an official. Returns the new
    /// balance.
    pub fn adjust_fund(&mut self, delta: Money, reason: &str) -> EconomyResult<Money> {
        let Self { store, clock, .. } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let before = ensure_fund(tx)?;
            tx.adjust_fund_balance(delta)?;
            let balance = before + delta;
            tx.append_event(
                &EconomyEvent::FundAdjusted {
                    delta,
                    balance,
                    reason: reason.to_string(),
                },
                now,
            )?;
            log::info!(
                "Government fund adjusted by {:+.2} ({reason}), balance {:.2}",
                delta,
                balance
            );
            Ok(balance)
        })
    }

    /// Settle a fine: the amount leaves the citizen's account and
    /// enters the fund.
    pub fn pay_fine(&mut self, owner: &str, amount: Money, reason: &str) -> EconomyResult<Account> {
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
                TxKind::FinePayment,
                amount,
                None,
                &format!("Multa: {reason}"),
                now,
            )?;
            ensure_fund(tx)?;
            tx.adjust_fund_balance(amount)?;
            tx.append_event(
                &EconomyEvent::FinePaid {
                    owner: account.owner.clone(),
                    amount,
                    reason: reason.to_string(),
                },
                now,
            )?;
            log::info!("Fine of {:.2} paid by {} ({reason})", amount, account.number);
            Ok(Account {
                balance: account.balance - amount,
                ..account
            })
        })
    }

    /// Buy a license at the configured price; the price is treasury
    /// income.
    pub fn buy_license(&mut self, owner: &str, kind: LicenseKind) -> EconomyResult<Account> {
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
            let price = config.license_price(kind);
            if account.balance < price {
                return Err(EconomyError::InsufficientFunds {
                    required: price,
                    available: account.balance,
                });
            }
            tx.adjust_balance(account.id, -price)?;
            tx.append_entry(
                account.id,
                TxKind::LicenseBuy,
                price,
                None,
                &format!("Licencia de {}", kind.label()),
                now,
            )?;
            ensure_fund(tx)?;
            tx.adjust_fund_balance(price)?;
            tx.append_event(
                &EconomyEvent::LicensePurchased {
                    owner: account.owner.clone(),
                    kind,
                    price,
                },
                now,
            )?;
            log::info!(
                "License {} bought by {} for {:.2}",
                kind.label(),
                account.number,
                price
            );
            Ok(Account {
                balance: account.balance - price,
                ..account
            })
        })
    }
}

/// Fetch the fund balance inside an open transaction, creating the
/// single row on first access.
pub(crate) fn ensure_fund(tx: &Txn<'_>) -> EconomyResult<Money> {
    match tx.fund_balance_row()? {
        Some(balance) => Ok(balance),
        None => {
            tx.init_fund()?;
            Ok(0.0)
        }
    }
}
