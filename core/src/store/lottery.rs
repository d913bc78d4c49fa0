//! Lottery singleton and ticket rows.

use super::{decode_date, encode_date, Txn};
use crate::{
    error::EconomyResult,
    lottery::{LotteryRow, Ticket},
    types::Money,
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        owner: row.get(1)?,
        numbers: row.get(2)?,
        draw_date: decode_date(&row.get::<_, String>(3)?, 3)?,
    })
}

impl Txn<'_> {
    pub fn lottery_row(&self) -> EconomyResult<Option<LotteryRow>> {
        self.conn
            .query_row(
                "SELECT current_jackpot, last_run_date FROM lottery WHERE id = 1",
                [],
                |row| {
                    Ok(LotteryRow {
                        jackpot: row.get(0)?,
                        last_run: decode_date(&row.get::<_, String>(1)?, 1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn init_lottery(&self, jackpot: Money, today: NaiveDate) -> EconomyResult<()> {
        self.conn.execute(
            "INSERT INTO lottery (id, current_jackpot, last_run_date) VALUES (1, ?1, ?2)",
            params![jackpot, encode_date(today)],
        )?;
        Ok(())
    }

    pub fn set_lottery(&self, jackpot: Money, last_run: NaiveDate) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE lottery SET current_jackpot = ?1, last_run_date = ?2 WHERE id = 1",
            params![jackpot, encode_date(last_run)],
        )?;
        Ok(())
    }

    pub fn add_to_jackpot(&self, delta: Money) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE lottery SET current_jackpot = current_jackpot + ?1 WHERE id = 1",
            params![delta],
        )?;
        Ok(())
    }

    pub fn insert_ticket(
        &self,
        owner: &str,
        numbers: &str,
        draw_date: NaiveDate,
    ) -> EconomyResult<Ticket> {
        self.conn.execute(
            "INSERT INTO ticket (owner, numbers, draw_date) VALUES (?1, ?2, ?3)",
            params![owner, numbers, encode_date(draw_date)],
        )?;
        Ok(Ticket {
            id: self.conn.last_insert_rowid(),
            owner: owner.to_string(),
            numbers: numbers.to_string(),
            draw_date,
        })
    }

    pub fn tickets_for_draw(&self, draw_date: NaiveDate) -> EconomyResult<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, numbers, draw_date FROM ticket
             WHERE draw_date = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![encode_date(draw_date)], row_to_ticket)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn ticket_count_for(&self, draw_date: NaiveDate) -> EconomyResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM ticket WHERE draw_date = ?1",
                params![encode_date(draw_date)],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}
