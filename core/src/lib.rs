//! hermes-core: the economic engine behind the Gobierno de San Andreas
//! community portal.
//!
//! Accounts, an append-only ledger, peer transfers, loans with overdue
//! penalty accrual, time-locked savings, a daily lottery, and the
//! government treasury with batch payroll — all persisted to SQLite,
//! with every money movement committed atomically alongside its ledger
//! rows and outbox events. The surrounding web portal and chat bot are
//! out of scope; they call into this crate.

pub mod accounts;
pub mod clock;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod loans;
pub mod lottery;
pub mod notify;
pub mod payroll;
pub mod rng;
pub mod savings;
pub mod store;
pub mod transfers;
pub mod treasury;
pub mod types;

pub use engine::Economy;
pub use error::{EconomyError, EconomyResult};
