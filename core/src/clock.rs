//! Wall-clock source — every date the engine reads comes through here.
//!
//! Production uses `Clock::System`. Tests and the headless runner pin a
//! `Fixed` instant and advance it manually, so day-based behavior (loan
//! penalties, savings locks, lottery rollover) is fully controllable.
//! All day/interval math truncates to calendar days.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Clock {
    System,
    Fixed { now: NaiveDateTime },
}

impl Clock {
    /// A fixed clock starting at midnight of the given day.
    pub fn fixed(date: NaiveDate) -> Self {
        Self::Fixed {
            now: date.and_hms_opt(0, 0, 0).unwrap_or_default(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Utc::now().naive_utc(),
            Self::Fixed { now } => *now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Advance a fixed clock by whole days.
    /// Panics on a system clock — callers must not advance real time.
    pub fn advance_days(&mut self, days: i64) {
        match self {
            Self::System => panic!("advance_days() called on system clock"),
            Self::Fixed { now } => *now += Duration::days(days),
        }
    }

    /// Advance a fixed clock by an arbitrary duration.
    pub fn advance(&mut self, delta: Duration) {
        match self {
            Self::System => panic!("advance() called on system clock"),
            Self::Fixed { now } => *now += delta,
        }
    }
}
