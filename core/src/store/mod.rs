//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Engine operations call row methods on a [`Txn`] view — they never
//! execute SQL directly. Every multi-row mutation runs inside
//! [`LedgerStore::with_txn`], which opens one immediate transaction
//! and commits only when the closure returns Ok; any error rolls every
//! write back, so partial credits or debits are never observable.

use crate::error::EconomyResult;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};

mod account;
mod event;
mod ledger;
mod loan;
mod lottery;
mod payroll;
mod savings;
mod treasury;

const DT_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

pub struct LedgerStore {
    conn: Connection,
}

/// A view over one connection, either inside an open transaction
/// (mutations) or directly over it (reads). All row-level methods are
/// implemented on this type, split across the per-entity submodules.
pub struct Txn<'c> {
    pub(crate) conn: &'c Connection,
}

impl LedgerStore {
    pub fn open(path: &str) -> EconomyResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconomyResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EconomyResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Run `f` inside a single BEGIN IMMEDIATE transaction. Commits
    /// when `f` returns Ok; any Err rolls the whole transaction back.
    pub fn with_txn<T>(
        &mut self,
        f: impl FnOnce(&Txn<'_>) -> EconomyResult<T>,
    ) -> EconomyResult<T> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&Txn { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    /// Read-only view over the bare connection.
    pub fn view(&self) -> Txn<'_> {
        Txn { conn: &self.conn }
    }
}

// ── TEXT date codecs ───────────────────────────────────────────────

pub(crate) fn encode_dt(t: NaiveDateTime) -> String {
    t.format(DT_FMT).to_string()
}

pub(crate) fn decode_dt(s: &str, col: usize) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DT_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn encode_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn decode_date(s: &str, col: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}
