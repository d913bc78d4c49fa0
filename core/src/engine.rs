//! The economy engine — the heart of the city bank.
//!
//! RULES:
//!   - Every money movement runs inside one store transaction: the
//!     balance change, its ledger rows, and the events describing it
//!     commit together or not at all.
//!   - All randomness flows through the RngBank streams. Nothing in
//!     the engine calls a platform RNG.
//!   - All dates are read from the Clock. Nothing calls the system
//!     time directly, so tests and the runner can pin and advance it.
//!   - Notifications never run inside a transaction. Operations append
//!     events to the outbox; the dispatcher delivers them afterwards.

use crate::{
    clock::Clock,
    config::EconomyConfig,
    error::EconomyResult,
    event::EventRow,
    rng::{EconomyRng, RngBank, StreamSlot},
    store::LedgerStore,
};
use chrono::NaiveDate;

pub struct Economy {
    pub(crate) store: LedgerStore,
    pub clock: Clock,
    pub config: EconomyConfig,
    pub(crate) accounts_rng: EconomyRng,
    pub(crate) lottery_rng: EconomyRng,
}

impl Economy {
    /// Open (or create) a database at `path` and run migrations.
    pub fn open(path: &str, seed: u64, clock: Clock, config: EconomyConfig) -> EconomyResult<Self> {
        let store = LedgerStore::open(path)?;
        store.migrate()?;
        Ok(Self::assemble(store, seed, clock, config))
    }

    /// Fresh in-memory engine with the default config and a clock
    /// pinned to midnight of `start`. Used by tests and tooling.
    pub fn build_test(seed: u64, start: NaiveDate) -> EconomyResult<Self> {
        let store = LedgerStore::in_memory()?;
        store.migrate()?;
        Ok(Self::assemble(
            store,
            seed,
            Clock::fixed(start),
            EconomyConfig::default_test(),
        ))
    }

    fn assemble(store: LedgerStore, seed: u64, clock: Clock, config: EconomyConfig) -> Self {
        let bank = RngBank::new(seed);
        Self {
            store,
            clock,
            config,
            accounts_rng: bank.for_stream(StreamSlot::Account),
            lottery_rng: bank.for_stream(StreamSlot::Lottery),
        }
    }

    // ── Audit queries ──────────────────────────────────────────────

    pub fn events_of_kind(&self, kind: &str) -> EconomyResult<Vec<EventRow>> {
        self.store.view().events_of_kind(kind)
    }

    pub fn undispatched_events(&self) -> EconomyResult<Vec<EventRow>> {
        self.store.view().undispatched_events()
    }

    pub fn event_count(&self) -> EconomyResult<i64> {
        self.store.view().event_count()
    }

    pub fn ledger_count(&self) -> EconomyResult<i64> {
        self.store.view().ledger_count()
    }

    pub fn account_count(&self) -> EconomyResult<i64> {
        self.store.view().account_count()
    }
}
