//! The ledger — append-only history of every balance change.
//!
//! RULE: Ledger rows are immutable once written. Corrections are new
//! rows, never edits. The stored amount is a non-negative magnitude;
//! the direction of the balance change is implied by the kind.

use crate::types::{Money, TxKind};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub account_id: i64,
    pub kind: TxKind,
    pub amount: Money,
    /// Counterparty account number, set on transfers only.
    pub related_account: Option<String>,
    pub description: String,
    pub created_at: NaiveDateTime,
}
