//! Payroll request and item rows.

use super::{decode_dt, encode_dt, Txn};
use crate::{
    error::EconomyResult,
    payroll::{PayrollItem, PayrollRequest},
    types::{Money, PayrollStatus},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_request(row: &Row<'_>) -> rusqlite::Result<PayrollRequest> {
    let status_str: String = row.get(3)?;
    let status = PayrollStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(3, "status".to_string(), rusqlite::types::Type::Text)
    })?;
    Ok(PayrollRequest {
        id: row.get(0)?,
        department: row.get(1)?,
        total_amount: row.get(2)?,
        status,
        created_at: decode_dt(&row.get::<_, String>(4)?, 4)?,
    })
}

impl Txn<'_> {
    pub fn insert_payroll_request(
        &self,
        department: &str,
        total_amount: Money,
        now: NaiveDateTime,
    ) -> EconomyResult<PayrollRequest> {
        self.conn.execute(
            "INSERT INTO payroll_request (department, total_amount, status, created_at)
             VALUES (?1, ?2, 'pending', ?3)",
            params![department, total_amount, encode_dt(now)],
        )?;
        Ok(PayrollRequest {
            id: self.conn.last_insert_rowid(),
            department: department.to_string(),
            total_amount,
            status: PayrollStatus::Pending,
            created_at: now,
        })
    }

    pub fn insert_payroll_item(
        &self,
        request_id: i64,
        owner: &str,
        amount: Money,
    ) -> EconomyResult<()> {
        self.conn.execute(
            "INSERT INTO payroll_item (request_id, owner, amount) VALUES (?1, ?2, ?3)",
            params![request_id, owner, amount],
        )?;
        Ok(())
    }

    pub fn payroll_request_by_id(&self, id: i64) -> EconomyResult<Option<PayrollRequest>> {
        self.conn
            .query_row(
                "SELECT id, department, total_amount, status, created_at
                 FROM payroll_request WHERE id = ?1",
                params![id],
                row_to_request,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn pending_payroll_requests(&self) -> EconomyResult<Vec<PayrollRequest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, department, total_amount, status, created_at
             FROM payroll_request WHERE status = 'pending'
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_request)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn items_for_request(&self, request_id: i64) -> EconomyResult<Vec<PayrollItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, request_id, owner, amount FROM payroll_item
             WHERE request_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![request_id], |row| {
            Ok(PayrollItem {
                id: row.get(0)?,
                request_id: row.get(1)?,
                owner: row.get(2)?,
                amount: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn set_payroll_status(&self, id: i64, status: PayrollStatus) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE payroll_request SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(())
    }
}
