//! Ledger rows. Append-only: there is no update or delete here.

use super::{decode_dt, encode_dt, Txn};
use crate::{
    error::EconomyResult,
    ledger::LedgerEntry,
    types::{Money, TxKind},
};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let kind_str: String = row.get(2)?;
    let kind = TxKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(2, "kind".to_string(), rusqlite::types::Type::Text)
    })?;
    Ok(LedgerEntry {
        id: row.get(0)?,
        account_id: row.get(1)?,
        kind,
        amount: row.get(3)?,
        related_account: row.get(4)?,
        description: row.get(5)?,
        created_at: decode_dt(&row.get::<_, String>(6)?, 6)?,
    })
}

impl Txn<'_> {
    pub fn append_entry(
        &self,
        account_id: i64,
        kind: TxKind,
        amount: Money,
        related_account: Option<&str>,
        description: &str,
        now: NaiveDateTime,
    ) -> EconomyResult<()> {
        self.conn.execute(
            "INSERT INTO ledger (account_id, kind, amount, related_account, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account_id,
                kind.as_str(),
                amount,
                related_account,
                description,
                encode_dt(now)
            ],
        )?;
        Ok(())
    }

    /// Most-recent-first entries for one account.
    pub fn entries_for_account(
        &self,
        account_id: i64,
        limit: i64,
    ) -> EconomyResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, kind, amount, related_account, description, created_at
             FROM ledger WHERE account_id = ?1
             ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![account_id, limit], row_to_entry)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn entries_of_kind(&self, kind: TxKind) -> EconomyResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, kind, amount, related_account, description, created_at
             FROM ledger WHERE kind = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![kind.as_str()], row_to_entry)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn ledger_count(&self) -> EconomyResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM ledger", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
