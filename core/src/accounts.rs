//! Account store — balances keyed by account number.
//!
//! RULE: Accounts are created lazily on first use by an owner, never
//! ahead of time and never twice. Balance mutation is unconditional at
//! the store level; each operation does its own sufficiency checks.

use crate::{
    config::EconomyConfig,
    directory::Directory,
    engine::Economy,
    error::EconomyResult,
    event::EconomyEvent,
    ledger::LedgerEntry,
    rng::EconomyRng,
    store::Txn,
    types::{AccountNumber, Money, OwnerId, TxKind},
};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const DEFAULT_CARD_STYLE: &str = "classic";

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub owner: OwnerId,
    pub number: AccountNumber,
    pub balance: Money,
    pub card_style: String,
    pub created_at: NaiveDateTime,
}

impl Economy {
    /// Get the owner's account, opening one on first use.
    pub fn account_for(&mut self, owner: &str) -> EconomyResult<Account> {
        let Self {
            store,
            clock,
            config,
            accounts_rng,
            ..
        } = self;
        let now = clock.now();
        store.with_txn(|tx| open_or_fetch(tx, accounts_rng, config, owner, now))
    }

    pub fn find_account(&self, number: &str) -> EconomyResult<Option<Account>> {
        self.store.view().account_by_number(number)
    }

    /// Read-only owner lookup. Unlike [`Economy::account_for`] this
    /// never opens an account.
    pub fn find_owner_account(&self, owner: &str) -> EconomyResult<Option<Account>> {
        self.store.view().account_by_owner(owner)
    }

    /// Recipient preview for the transfer form: resolve an account
    /// number to the holder's display name.
    pub fn lookup(&self, directory: &dyn Directory, number: &str) -> EconomyResult<Option<String>> {
        match self.store.view().account_by_number(number)? {
            Some(account) => Ok(Some(
                directory
                    .display_name(&account.owner)
                    .unwrap_or_else(|| account.owner.clone()),
            )),
            None => Ok(None),
        }
    }

    /// Most recent ledger entries for the owner's account. An owner
    /// with no account has no history.
    pub fn statement(&self, owner: &str, limit: i64) -> EconomyResult<Vec<LedgerEntry>> {
        let tx = self.store.view();
        match tx.account_by_owner(owner)? {
            Some(account) => tx.entries_for_account(account.id, limit),
            None => Ok(Vec::new()),
        }
    }

    pub fn set_card_style(&mut self, owner: &str, style: &str) -> EconomyResult<Account> {
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
            tx.set_card_style(account.id, style)?;
            Ok(Account {
                card_style: style.to_string(),
                ..account
            })
        })
    }

    /// Official balance adjustment. Unconditional: the delta is applied
    /// as given and the balance may go negative.
    pub fn adjust_account(
        &mut self,
        owner: &str,
        delta: Money,
        reason: &str,
    ) -> EconomyResult<Account> {
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
            tx.adjust_balance(account.id, delta)?;
            let kind = if delta >= 0.0 {
                TxKind::GovernmentAdjustmentAdd
            } else {
                TxKind::GovernmentAdjustmentSub
            };
            tx.append_entry(account.id, kind, delta.abs(), None, reason, now)?;
            tx.append_event(
                &EconomyEvent::AccountAdjusted {
                    owner: account.owner.clone(),
                    number: account.number.clone(),
                    delta,
                    reason: reason.to_string(),
                },
                now,
            )?;
            log::info!(
                "Balance of {} adjusted by {:+.2} ({reason})",
                account.number,
                delta
            );
            Ok(Account {
                balance: account.balance + delta,
                ..account
            })
        })
    }
}

/// Fetch the owner's account inside an open transaction, creating it
/// with a fresh unique number when absent. Every operation that takes
/// an owner handle funnels through here.
pub(crate) fn open_or_fetch(
    tx: &Txn<'_>,
    rng: &mut EconomyRng,
    config: &EconomyConfig,
    owner: &str,
    now: NaiveDateTime,
) -> EconomyResult<Account> {
    if let Some(account) = tx.account_by_owner(owner)? {
        return Ok(account);
    }
    // Regenerate on collision.
    let number = loop {
        let candidate = rng.digits(config.account_number_len);
        if tx.account_by_number(&candidate)?.is_none() {
            break candidate;
        }
    };
    let account = tx.insert_account(owner, &number, DEFAULT_CARD_STYLE, now)?;
    tx.append_event(
        &EconomyEvent::AccountOpened {
            owner: account.owner.clone(),
            number: account.number.clone(),
        },
        now,
    )?;
    log::info!("Opened account {} for {owner}", account.number);
    Ok(account)
}
