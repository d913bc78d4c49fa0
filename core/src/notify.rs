//! Outbound notifications.
//!
//! RULE: Delivery is best-effort and strictly after commit. The
//! dispatcher drains undispatched events from the outbox, renders the
//! citizen-facing messages, and hands them to the [`Notifier`].
//! Delivery failures are logged and swallowed; a drained event is
//! marked dispatched whether or not its messages went out, so nothing
//! is ever retried and nothing ever rolls back money.

use crate::{engine::Economy, error::EconomyResult, event::EconomyEvent};

pub trait Notifier {
    fn notify(&self, owner: &str, message: &str) -> anyhow::Result<()>;
}

/// Default notifier: writes every message to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, owner: &str, message: &str) -> anyhow::Result<()> {
        log::info!("[notify {owner}] {message}");
        Ok(())
    }
}

impl Economy {
    /// Drain the outbox. Returns how many messages were delivered.
    pub fn dispatch_notifications(&mut self, notifier: &dyn Notifier) -> EconomyResult<usize> {
        let pending = self.store.view().undispatched_events()?;
        let mut delivered = 0;

        for row in &pending {
            let event = match row.decode() {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Undecodable event {} ({}): {e}", row.id, row.kind);
                    continue;
                }
            };
            for (owner, message) in notifications_for(&event) {
                match notifier.notify(&owner, &message) {
                    Ok(()) => delivered += 1,
                    Err(e) => log::warn!("Notification to {owner} failed: {e}"),
                }
            }
        }

        self.store.with_txn(|tx| {
            for row in &pending {
                tx.mark_dispatched(row.id)?;
            }
            Ok(())
        })?;
        Ok(delivered)
    }
}

/// The messages an event produces, as (owner, message) pairs. Events
/// with no citizen-facing message produce none; a transfer produces
/// one for each side.
pub fn notifications_for(event: &EconomyEvent) -> Vec<(String, String)> {
    match event {
        EconomyEvent::TransferCompleted {
            source_owner,
            source_number,
            target_owner,
            target_number,
            amount,
        } => vec![
            (
                source_owner.clone(),
                format!("Has enviado {amount:.2}$ a la cuenta {target_number}."),
            ),
            (
                target_owner.clone(),
                format!("Has recibido {amount:.2}$ de la cuenta {source_number}."),
            ),
        ],
        EconomyEvent::PenaltyApplied {
            owner,
            penalty,
            amount_due,
            ..
        } => vec![(
            owner.clone(),
            format!(
                "Se te ha aplicado una penalización de {penalty:.2}$ por impago de tu préstamo. Deuda actual: {amount_due:.2}$."
            ),
        )],
        EconomyEvent::SalaryPaid {
            owner,
            amount,
            department,
            ..
        } => vec![(
            owner.clone(),
            format!("Nómina recibida: {amount:.2}$ ({department})."),
        )],
        EconomyEvent::LotteryWon {
            owner,
            amount,
            winning_numbers,
        } => vec![(
            owner.clone(),
            format!("¡Premio de lotería! Has ganado {amount:.2}$ con el número {winning_numbers}."),
        )],
        EconomyEvent::LicensePurchased { owner, kind, price } => vec![(
            owner.clone(),
            format!("Licencia de {} comprada por {price:.2}$.", kind.label()),
        )],
        EconomyEvent::AccountAdjusted {
            owner,
            delta,
            reason,
            ..
        } => vec![(
            owner.clone(),
            format!("Ajuste de saldo: {delta:+.2}$. Motivo: {reason}."),
        )],
        _ => Vec::new(),
    }
}
