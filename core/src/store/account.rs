//! Account rows.

use super::{decode_dt, encode_dt, Txn};
use crate::{accounts::Account, error::EconomyResult, types::Money};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        owner: row.get(1)?,
        number: row.get(2)?,
        balance: row.get(3)?,
        card_style: row.get(4)?,
        created_at: decode_dt(&row.get::<_, String>(5)?, 5)?,
    })
}

impl Txn<'_> {
    pub fn insert_account(
        &self,
        owner: &str,
        number: &str,
        card_style: &str,
        now: NaiveDateTime,
    ) -> EconomyResult<Account> {
        self.conn.execute(
            "INSERT INTO account (owner, number, balance, card_style, created_at)
             VALUES (?1, ?2, 0, ?3, ?4)",
            params![owner, number, card_style, encode_dt(now)],
        )?;
        Ok(Account {
            id: self.conn.last_insert_rowid(),
            owner: owner.to_string(),
            number: number.to_string(),
            balance: 0.0,
            card_style: card_style.to_string(),
            created_at: now,
        })
    }

    pub fn account_by_owner(&self, owner: &str) -> EconomyResult<Option<Account>> {
        self.conn
            .query_row(
                "SELECT id, owner, number, balance, card_style, created_at
                 FROM account WHERE owner = ?1",
                params![owner],
                row_to_account,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn account_by_number(&self, number: &str) -> EconomyResult<Option<Account>> {
        self.conn
            .query_row(
                "SELECT id, owner, number, balance, card_style, created_at
                 FROM account WHERE number = ?1",
                params![number],
                row_to_account,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn account_by_id(&self, id: i64) -> EconomyResult<Option<Account>> {
        self.conn
            .query_row(
                "SELECT id, owner, number, balance, card_style, created_at
                 FROM account WHERE id = ?1",
                params![id],
                row_to_account,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Unconditional balance mutation. Callers do the sufficiency
    /// checks; negative balances are legal.
    pub fn adjust_balance(&self, account_id: i64, delta: Money) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
            params![delta, account_id],
        )?;
        Ok(())
    }

    pub fn set_card_style(&self, account_id: i64, style: &str) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE account SET card_style = ?1 WHERE id = ?2",
            params![style, account_id],
        )?;
        Ok(())
    }

    pub fn account_count(&self) -> EconomyResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
