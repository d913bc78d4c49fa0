//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// Monetary amount. The backing store keeps REAL columns, so money is
/// f64 end to end; display layers round to two decimals.
pub type Money = f64;

/// Opaque handle for an account holder. Identity lives outside this
/// crate — the engine only records the handle.
pub type OwnerId = String;

/// External account identifier: a fixed-length numeric string.
pub type AccountNumber = String;

/// Every kind of ledger entry. The stored `amount` is a non-negative
/// magnitude; the direction of the balance change is implied by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    TransferIn,
    TransferOut,
    LoanReceived,
    LoanPayment,
    LoanFee,
    SavingsDeposit,
    SavingsWithdrawal,
    FinePayment,
    LotteryTicket,
    LotteryWin,
    Salary,
    GovernmentAdjustmentAdd,
    GovernmentAdjustmentSub,
    LicenseBuy,
}

impl TxKind {
    /// Stable string form, used for the `kind` column in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::LoanReceived => "loan_received",
            Self::LoanPayment => "loan_payment",
            Self::LoanFee => "loan_fee",
            Self::SavingsDeposit => "savings_deposit",
            Self::SavingsWithdrawal => "savings_withdrawal",
            Self::FinePayment => "fine_payment",
            Self::LotteryTicket => "lottery_ticket",
            Self::LotteryWin => "lottery_win",
            Self::Salary => "salary",
            Self::GovernmentAdjustmentAdd => "government_adjustment_add",
            Self::GovernmentAdjustmentSub => "government_adjustment_sub",
            Self::LicenseBuy => "license_buy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "transfer_in" => Self::TransferIn,
            "transfer_out" => Self::TransferOut,
            "loan_received" => Self::LoanReceived,
            "loan_payment" => Self::LoanPayment,
            "loan_fee" => Self::LoanFee,
            "savings_deposit" => Self::SavingsDeposit,
            "savings_withdrawal" => Self::SavingsWithdrawal,
            "fine_payment" => Self::FinePayment,
            "lottery_ticket" => Self::LotteryTicket,
            "lottery_win" => Self::LotteryWin,
            "salary" => Self::Salary,
            "government_adjustment_add" => Self::GovernmentAdjustmentAdd,
            "government_adjustment_sub" => Self::GovernmentAdjustmentSub,
            "license_buy" => Self::LicenseBuy,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Paid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsStatus {
    Active,
    Withdrawn,
}

impl SavingsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    Pending,
    Approved,
    Rejected,
}

impl PayrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// License catalogue of the portal. Prices live in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseKind {
    Conducir,
    Armas,
    Caza,
    Pesca,
}

impl LicenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conducir => "conducir",
            Self::Armas => "armas",
            Self::Caza => "caza",
            Self::Pesca => "pesca",
        }
    }

    /// Label as shown to citizens.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Conducir => "Conducir",
            Self::Armas => "Armas",
            Self::Caza => "Caza",
            Self::Pesca => "Pesca",
        }
    }
}
