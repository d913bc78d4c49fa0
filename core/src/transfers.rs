//! Peer-to-peer transfers.
//!
//! RULE: For every successful transfer the sum of the two balance
//! deltas is zero, and exactly two ledger rows are appended whose
//! `related_account` fields cross-reference each other.

use crate::{
    accounts::{open_or_fetch, Account},
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    types::{Money, TxKind},
};

impl Economy {
    /// Move `amount` from the sender's account to the account with
    /// number `target_number`. Returns the updated source account.
    pub fn transfer(
        &mut self,
        source_owner: &str,
        target_number: &str,
        amount: Money,
    ) -> EconomyResult<Account> {
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
            let source = open_or_fetch(tx, accounts_rng, config, source_owner, now)?;
            let target = tx.account_by_number(target_number)?.ok_or_else(|| {
                EconomyError::AccountNotFound {
                    number: target_number.to_string(),
                }
            })?;
            if target.id == source.id {
                return Err(EconomyError::SelfTransfer);
            }
            if source.balance < amount {
                return Err(EconomyError::InsufficientFunds {
                    required: amount,
                    available: source.balance,
                });
            }

            tx.adjust_balance(source.id, -amount)?;
            tx.adjust_balance(target.id, amount)?;
            tx.append_entry(
                source.id,
                TxKind::TransferOut,
                amount,
                Some(&target.number),
                &format!("Transferencia a {}", target.number),
                now,
            )?;
            tx.append_entry(
                target.id,
                TxKind::TransferIn,
                amount,
                Some(&source.number),
                &format!("Transferencia de {}", source.number),
                now,
            )?;
            tx.append_event(
                &EconomyEvent::TransferCompleted {
                    source_owner: source.owner.clone(),
                    source_number: source.number.clone(),
                    target_owner: target.owner.clone(),
                    target_number: target.number.clone(),
                    amount,
                },
                now,
            )?;
            log::info!(
                "Transfer {:.2} from {} to {}",
                amount,
                source.number,
                target.number
            );
            Ok(Account {
                balance: source.balance - amount,
                ..source
            })
        })
    }
}
