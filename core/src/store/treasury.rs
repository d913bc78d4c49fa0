//! Government fund singleton.

use super::Txn;
use crate::{error::EconomyResult, types::Money};
use rusqlite::{params, OptionalExtension};

impl Txn<'_> {
    pub fn fund_balance_row(&self) -> EconomyResult<Option<Money>> {
        self.conn
            .query_row(
                "SELECT balance FROM government_fund WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn init_fund(&self) -> EconomyResult<()> {
        self.conn
            .execute("INSERT INTO government_fund (id, balance) VALUES (1, 0)", [])?;
        Ok(())
    }

    /// Unconditional, no floor. The fund may go negative.
    pub fn adjust_fund_balance(&self, delta: Money) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE government_fund SET balance = balance + ?1 WHERE id = 1",
            params![delta],
        )?;
        Ok(())
    }
}
