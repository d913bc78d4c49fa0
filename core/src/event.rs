//! Domain events — the transactional outbox.
//!
//! RULE: Every event is appended in the SAME database transaction as
//! the money movement it describes. The notifier drains the log later;
//! a failed delivery never rolls a financial operation back.

use crate::types::{LicenseKind, Money};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Every event emitted by the engine.
/// Variants are added as the portal grows — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EconomyEvent {
    // ── Accounts ───────────────────────────────────
    AccountOpened {
        owner: String,
        number: String,
    },
    AccountAdjusted {
        owner: String,
        number: String,
        delta: Money,
        reason: String,
    },

    // ── Transfers ──────────────────────────────────
    TransferCompleted {
        source_owner: String,
        source_number: String,
        target_owner: String,
        target_number: String,
        amount: Money,
    },

    // ── Loans ──────────────────────────────────────
    LoanIssued {
        owner: String,
        number: String,
        principal: Money,
        amount_due: Money,
        due_date: NaiveDate,
    },
    PenaltyApplied {
        owner: String,
        number: String,
        loan_id: i64,
        penalty: Money,
        amount_due: Money,
    },
    LoanRepaid {
        owner: String,
        number: String,
        paid: Money,
        remaining: Money,
    },

    // ── Savings ────────────────────────────────────
    SavingsOpened {
        owner: String,
        savings_id: i64,
        amount: Money,
    },
    SavingsWithdrawn {
        owner: String,
        savings_id: i64,
        paid_out: Money,
    },

    // ── Lottery ────────────────────────────────────
    TicketPurchased {
        owner: String,
        numbers: String,
        draw_date: NaiveDate,
    },
    DrawCompleted {
        draw_date: NaiveDate,
        winning_numbers: String,
        winner_count: usize,
        prize_each: Money,
    },
    LotteryWon {
        owner: String,
        amount: Money,
        winning_numbers: String,
    },

    // ── Treasury & payroll ─────────────────────────
    FundAdjusted {
        delta: Money,
        balance: Money,
        reason: String,
    },
    FinePaid {
        owner: String,
        amount: Money,
        reason: String,
    },
    LicensePurchased {
        owner: String,
        kind: LicenseKind,
        price: Money,
    },
    SalaryPaid {
        owner: String,
        number: String,
        amount: Money,
        department: String,
    },
    PayrollSubmitted {
        request_id: i64,
        department: String,
        total: Money,
    },
    PayrollDecided {
        request_id: i64,
        department: String,
        approved: bool,
        total: Money,
    },
}

impl EconomyEvent {
    /// Stable string name for the event_log `kind` column.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AccountOpened { .. } => "account_opened",
            Self::AccountAdjusted { .. } => "account_adjusted",
            Self::TransferCompleted { .. } => "transfer_completed",
            Self::LoanIssued { .. } => "loan_issued",
            Self::PenaltyApplied { .. } => "penalty_applied",
            Self::LoanRepaid { .. } => "loan_repaid",
            Self::SavingsOpened { .. } => "savings_opened",
            Self::SavingsWithdrawn { .. } => "savings_withdrawn",
            Self::TicketPurchased { .. } => "ticket_purchased",
            Self::DrawCompleted { .. } => "draw_completed",
            Self::LotteryWon { .. } => "lottery_won",
            Self::FundAdjusted { .. } => "fund_adjusted",
            Self::FinePaid { .. } => "fine_paid",
            Self::LicensePurchased { .. } => "license_purchased",
            Self::SalaryPaid { .. } => "salary_paid",
            Self::PayrollSubmitted { .. } => "payroll_submitted",
            Self::PayrollDecided { .. } => "payroll_decided",
        }
    }
}

/// An event_log row as persisted to SQLite.
#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: i64,
    pub kind: String,
    pub payload: String, // JSON-serialized EconomyEvent
    pub created_at: NaiveDateTime,
    pub dispatched: bool,
}

impl EventRow {
    pub fn decode(&self) -> serde_json::Result<EconomyEvent> {
        serde_json::from_str(&self.payload)
    }
}
