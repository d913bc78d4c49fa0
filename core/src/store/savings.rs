//! Savings rows.

use super::{decode_dt, encode_dt, Txn};
use crate::{
    error::EconomyResult,
    savings::Savings,
    types::{Money, SavingsStatus},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_savings(row: &Row<'_>) -> rusqlite::Result<Savings> {
    let status_str: String = row.get(4)?;
    let status = SavingsStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(4, "status".to_string(), rusqlite::types::Type::Text)
    })?;
    Ok(Savings {
        id: row.get(0)?,
        account_id: row.get(1)?,
        amount: row.get(2)?,
        deposit_date: decode_dt(&row.get::<_, String>(3)?, 3)?,
        status,
    })
}

impl Txn<'_> {
    pub fn insert_savings(
        &self,
        account_id: i64,
        amount: Money,
        now: NaiveDateTime,
    ) -> EconomyResult<Savings> {
        self.conn.execute(
            "INSERT INTO savings (account_id, amount, deposit_date, status)
             VALUES (?1, ?2, ?3, 'active')",
            params![account_id, amount, encode_dt(now)],
        )?;
        Ok(Savings {
            id: self.conn.last_insert_rowid(),
            account_id,
            amount,
            deposit_date: now,
            status: SavingsStatus::Active,
        })
    }

    pub fn savings_by_id(&self, id: i64) -> EconomyResult<Option<Savings>> {
        self.conn
            .query_row(
                "SELECT id, account_id, amount, deposit_date, status
                 FROM savings WHERE id = ?1",
                params![id],
                row_to_savings,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn savings_for_account(&self, account_id: i64) -> EconomyResult<Vec<Savings>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, amount, deposit_date, status
             FROM savings WHERE account_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![account_id], row_to_savings)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn mark_withdrawn(&self, id: i64) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE savings SET status = 'withdrawn' WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }
}
