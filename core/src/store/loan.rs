//! Loan rows.

use super::{decode_dt, encode_dt, Txn};
use crate::{
    error::EconomyResult,
    loans::Loan,
    types::{LoanStatus, Money},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_loan(row: &Row<'_>) -> rusqlite::Result<Loan> {
    let status_str: String = row.get(6)?;
    let status = LoanStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(6, "status".to_string(), rusqlite::types::Type::Text)
    })?;
    let last_check: Option<String> = row.get(5)?;
    Ok(Loan {
        id: row.get(0)?,
        account_id: row.get(1)?,
        amount_due: row.get(2)?,
        start_date: decode_dt(&row.get::<_, String>(3)?, 3)?,
        due_date: decode_dt(&row.get::<_, String>(4)?, 4)?,
        last_penalty_check: match last_check {
            Some(s) => Some(decode_dt(&s, 5)?),
            None => None,
        },
        status,
    })
}

impl Txn<'_> {
    pub fn insert_loan(
        &self,
        account_id: i64,
        amount_due: Money,
        start: NaiveDateTime,
        due: NaiveDateTime,
    ) -> EconomyResult<Loan> {
        self.conn.execute(
            "INSERT INTO loan (account_id, amount_due, start_date, due_date, status)
             VALUES (?1, ?2, ?3, ?4, 'active')",
            params![account_id, amount_due, encode_dt(start), encode_dt(due)],
        )?;
        Ok(Loan {
            id: self.conn.last_insert_rowid(),
            account_id,
            amount_due,
            start_date: start,
            due_date: due,
            last_penalty_check: None,
            status: LoanStatus::Active,
        })
    }

    pub fn active_loan_for(&self, account_id: i64) -> EconomyResult<Option<Loan>> {
        self.conn
            .query_row(
                "SELECT id, account_id, amount_due, start_date, due_date, last_penalty_check, status
                 FROM loan WHERE account_id = ?1 AND status = 'active'",
                params![account_id],
                row_to_loan,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Every active loan past its due date. TEXT datetimes in this
    /// format order lexicographically, so string comparison is safe.
    pub fn overdue_active_loans(&self, now: NaiveDateTime) -> EconomyResult<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, amount_due, start_date, due_date, last_penalty_check, status
             FROM loan WHERE status = 'active' AND due_date < ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![encode_dt(now)], row_to_loan)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn record_penalty(
        &self,
        loan_id: i64,
        amount_due: Money,
        checked_at: NaiveDateTime,
    ) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE loan SET amount_due = ?1, last_penalty_check = ?2 WHERE id = ?3",
            params![amount_due, encode_dt(checked_at), loan_id],
        )?;
        Ok(())
    }

    pub fn record_payment(
        &self,
        loan_id: i64,
        amount_due: Money,
        status: LoanStatus,
    ) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE loan SET amount_due = ?1, status = ?2 WHERE id = ?3",
            params![amount_due, status.as_str(), loan_id],
        )?;
        Ok(())
    }
}
