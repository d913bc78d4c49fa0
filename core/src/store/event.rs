//! Event outbox rows. Events are appended inside the same transaction as
//! the state change they describe and drained by the dispatcher later.

use super::{decode_dt, encode_dt, Txn};
use crate::{
    error::EconomyResult,
    event::{EconomyEvent, EventRow},
};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        payload: row.get(2)?,
        created_at: decode_dt(&row.get::<_, String>(3)?, 3)?,
        dispatched: row.get::<_, i64>(4)? != 0,
    })
}

impl Txn<'_> {
    pub fn append_event(&self, event: &EconomyEvent, now: NaiveDateTime) -> EconomyResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO event_log (kind, payload, created_at, dispatched)
             VALUES (?1, ?2, ?3, 0)",
            params![event.kind_name(), payload, encode_dt(now)],
        )?;
        Ok(())
    }

    pub fn undispatched_events(&self) -> EconomyResult<Vec<EventRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, payload, created_at, dispatched
             FROM event_log WHERE dispatched = 0 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn mark_dispatched(&self, id: i64) -> EconomyResult<()> {
        self.conn.execute(
            "UPDATE event_log SET dispatched = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    pub fn events_of_kind(&self, kind: &str) -> EconomyResult<Vec<EventRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, payload, created_at, dispatched
             FROM event_log WHERE kind = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![kind], row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn event_count(&self) -> EconomyResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM event_log", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
