//! Command handlers tying a ledger to its entry store
//!
//! The presentation layer raises intents (submit, delete, reset); each
//! handler validates, asks for confirmation through the supplied capability,
//! mutates the ledger, and persists the full collection. A handler either
//! applies completely or leaves both ledger and store untouched.

use crate::config::LeaseConfig;
use crate::ledger::{Ledger, Progress};
use crate::series::ChartSeries;
use crate::store::EntryStore;
use crate::types::{parse_date, Confirm, Entry, Outcome, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ledger plus the store that persists it
pub struct Tracker<S: EntryStore> {
    ledger: Ledger,
    store: S,
}

/// One row of the entry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub week: i64,
    pub date: NaiveDate,
    pub odometer: u32,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub series: ChartSeries,
    pub progress: Progress,
    pub months: BTreeMap<String, i64>,
    pub rows: Vec<EntryRow>,
}

impl<S: EntryStore> Tracker<S> {
    /// Open a tracker and load the store's current snapshot
    pub fn open(config: LeaseConfig, store: S) -> Result<Self> {
        let mut tracker = Self {
            ledger: Ledger::new(config)?,
            store,
        };
        tracker.reload()?;
        Ok(tracker)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Re-read the store and replace the in-memory collection
    pub fn reload(&mut self) -> Result<()> {
        let entries = self.store.load()?;
        self.on_snapshot(entries);
        Ok(())
    }

    /// Apply an authoritative snapshot pushed by the store
    pub fn on_snapshot(&mut self, entries: Vec<Entry>) {
        self.ledger.replace_all(entries);
    }

    /// Handle a submitted reading
    ///
    /// # Errors
    /// Returns [`crate::LedgerError::Validation`] for a missing or malformed
    /// date or odometer; nothing is changed in that case.
    pub fn on_submit<C: Confirm>(&mut self, date: &str, odometer: &str, confirm: C) -> Result<Outcome> {
        let entry = Entry::parse(date, odometer)?;
        let mut next = self.ledger.clone();
        let outcome = next.upsert(entry, confirm);
        self.commit(next, outcome)
    }

    /// Handle a delete request for `date`
    pub fn on_delete<C: Confirm>(&mut self, date: &str, confirm: C) -> Result<Outcome> {
        let date = parse_date(date)?;
        let mut next = self.ledger.clone();
        let outcome = next.delete(date, confirm);
        self.commit(next, outcome)
    }

    /// Handle a reset request
    pub fn on_reset<C: Confirm>(&mut self, confirm: C) -> Result<Outcome> {
        let mut next = self.ledger.clone();
        let outcome = next.clear(confirm);
        if outcome.is_applied() {
            self.store.clear()?;
            self.ledger = next;
        }
        Ok(outcome)
    }

    /// Derived values for rendering
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_ledger(&self.ledger)
    }

    // Persist first so a failed save leaves the in-memory ledger as it was.
    fn commit(&mut self, next: Ledger, outcome: Outcome) -> Result<Outcome> {
        if outcome.is_applied() {
            self.store.save(next.entries())?;
            self.ledger = next;
        }
        Ok(outcome)
    }
}

impl Dashboard {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let rows = ledger
            .entries()
            .iter()
            .map(|e| EntryRow {
                week: ledger.week_index(e.date),
                date: e.date,
                odometer: e.odometer,
            })
            .collect();
        Self {
            series: ChartSeries::from_ledger(ledger),
            progress: ledger.progress_and_penalty(),
            months: ledger.month_bucket(),
            rows,
        }
    }
}
