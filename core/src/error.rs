use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No account with number '{number}'")]
    AccountNotFound { number: String },

    #[error("Insufficient funds: required {required:.2}, available {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Amount must be positive, got {amount:.2}")]
    InvalidAmount { amount: f64 },

    #[error("Cannot transfer to the sender's own account")]
    SelfTransfer,

    #[error("Account already has an active loan")]
    LoanAlreadyActive,

    #[error("Account has no active loan")]
    NoActiveLoan,

    #[error("No such active savings deposit")]
    InvalidDeposit,

    #[error("Savings deposit is locked until {unlock_date}")]
    StillLocked { unlock_date: NaiveDate },

    #[error("Ticket numbers must be exactly 5 digits, got '{numbers}'")]
    InvalidTicketFormat { numbers: String },

    #[error("Payroll request has already been processed")]
    AlreadyProcessed,

    #[error("Department '{department}' has no payable salaries")]
    EmptyPayroll { department: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EconomyResult<T> = Result<T, EconomyError>;
