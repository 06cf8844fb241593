//! The mileage ledger
//!
//! An ordered collection of odometer entries, unique per date, together with
//! the views derived from it. Derived values are computed on demand from the
//! current entries and never cached.

use crate::config::{LeaseConfig, PenaltyPolicy};
use crate::types::{Confirm, Dollars, Entry, Outcome, Prompt, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Entries recorded against a fixed set of lease terms
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LeaseConfig,
    /// Sorted ascending by date, at most one entry per date
    entries: Vec<Entry>,
}

/// Progress and penalty derived from the current entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Odometer of the chronologically last entry (0 when empty)
    pub current: u32,
    /// Total lease allowance
    pub allowance: u32,
    /// Odometer value the penalty was computed from
    pub projected: f64,
    /// Average miles per day between the first and last entries
    pub daily_rate: f64,
    /// Projected overage penalty
    pub penalty: Dollars,
    /// Policy used to compute the penalty
    pub policy: PenaltyPolicy,
}

impl Ledger {
    /// Create an empty ledger
    ///
    /// # Errors
    /// Returns [`crate::LedgerError::InvalidConfig`] if the lease terms are
    /// inconsistent.
    pub fn new(config: LeaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: Vec::new(),
        })
    }

    /// Create a ledger from an existing set of entries
    pub fn with_entries(config: LeaseConfig, entries: Vec<Entry>) -> Result<Self> {
        let mut ledger = Self::new(config)?;
        ledger.replace_all(entries);
        Ok(ledger)
    }

    /// Lease terms of this ledger
    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    /// All entries, ascending by date
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Odometer recorded for `date`, if any
    pub fn get(&self, date: NaiveDate) -> Option<u32> {
        self.position(date).ok().map(|idx| self.entries[idx].odometer)
    }

    /// Lease week index of `date`
    pub fn week_index(&self, date: NaiveDate) -> i64 {
        self.config.week_index(date)
    }

    /// True if odometer values never decrease over time
    pub fn is_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].odometer <= pair[1].odometer)
    }

    /// Insert a reading, or replace the reading already recorded for its date
    ///
    /// Replacing an existing reading asks `confirm` first; a declined prompt
    /// leaves the ledger untouched.
    pub fn upsert<C: Confirm>(&mut self, entry: Entry, mut confirm: C) -> Outcome {
        match self.position(entry.date) {
            Ok(idx) => {
                let current = self.entries[idx].odometer;
                if current == entry.odometer {
                    log::debug!("Entry for {} already at {} mi", entry.date, current);
                    return Outcome::Unchanged;
                }
                let prompt = Prompt::Overwrite {
                    date: entry.date,
                    current,
                    proposed: entry.odometer,
                };
                if !confirm.confirm(&prompt) {
                    log::info!("Overwrite of {} declined", entry.date);
                    return Outcome::Declined;
                }
                self.entries[idx] = entry;
                log::info!(
                    "Replaced entry for {}: {} -> {} mi",
                    entry.date,
                    current,
                    entry.odometer
                );
            }
            Err(idx) => {
                self.entries.insert(idx, entry);
                log::info!("Recorded entry {}", entry);
            }
        }

        if !self.is_monotonic() {
            log::warn!(
                "Odometer readings are no longer non-decreasing after {}",
                entry
            );
        }
        Outcome::Applied
    }

    /// Remove the reading recorded for `date`
    ///
    /// A date with no reading is a no-op and asks nothing.
    pub fn delete<C: Confirm>(&mut self, date: NaiveDate, mut confirm: C) -> Outcome {
        let idx = match self.position(date) {
            Ok(idx) => idx,
            Err(_) => {
                log::debug!("No entry for {}, nothing to delete", date);
                return Outcome::Unchanged;
            }
        };

        let prompt = Prompt::Delete {
            date,
            odometer: self.entries[idx].odometer,
        };
        if !confirm.confirm(&prompt) {
            log::info!("Delete of {} declined", date);
            return Outcome::Declined;
        }

        let removed = self.entries.remove(idx);
        log::info!("Deleted entry {}", removed);
        Outcome::Applied
    }

    /// Remove every reading
    pub fn clear<C: Confirm>(&mut self, mut confirm: C) -> Outcome {
        let prompt = Prompt::Reset {
            entries: self.entries.len(),
        };
        if !confirm.confirm(&prompt) {
            log::info!("Reset declined");
            return Outcome::Declined;
        }
        self.entries.clear();
        log::info!("Ledger reset");
        Outcome::Applied
    }

    /// Replace the whole collection with an authoritative snapshot
    ///
    /// The snapshot may arrive in any order. When it holds several records
    /// for one date the later record wins.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        let received = entries.len();
        let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for entry in entries {
            by_date.insert(entry.date, entry.odometer);
        }
        if by_date.len() != received {
            log::warn!(
                "Snapshot held {} duplicate date(s); kept the later records",
                received - by_date.len()
            );
        }

        self.entries = by_date
            .into_iter()
            .map(|(date, odometer)| Entry { date, odometer })
            .collect();
        log::debug!("Loaded snapshot with {} entries", self.entries.len());
    }

    /// Last odometer value per lease week
    ///
    /// Yields exactly `lease_weeks` slots; slot `i` holds the last reading
    /// whose date falls in week `i + 1`. Each call starts a fresh pass.
    pub fn week_bucket(&self) -> WeekBucket<'_> {
        WeekBucket {
            config: &self.config,
            entries: &self.entries,
            cursor: 0,
            week: 1,
        }
    }

    /// Miles driven within each calendar month (`YYYY-MM`)
    ///
    /// The delta is the last reading of the month minus the first, so a month
    /// with a single reading shows 0. Keys iterate chronologically.
    pub fn month_bucket(&self) -> BTreeMap<String, i64> {
        let mut bounds: BTreeMap<String, (u32, u32)> = BTreeMap::new();
        for entry in &self.entries {
            bounds
                .entry(entry.month_key())
                .and_modify(|(_, last)| *last = entry.odometer)
                .or_insert((entry.odometer, entry.odometer));
        }
        bounds
            .into_iter()
            .map(|(month, (first, last))| (month, i64::from(last) - i64::from(first)))
            .collect()
    }

    /// Average miles per day between the first and last entries
    ///
    /// Zero when there are fewer than two entries.
    pub fn daily_rate(&self) -> f64 {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => {
                let days = (last.date - first.date).num_days();
                if days <= 0 {
                    return 0.0;
                }
                (f64::from(last.odometer) - f64::from(first.odometer)) / days as f64
            }
            _ => 0.0,
        }
    }

    /// Current progress and penalty under the configured policy
    pub fn progress_and_penalty(&self) -> Progress {
        self.progress_with(self.config.policy)
    }

    /// Current progress and penalty under an explicit policy
    pub fn progress_with(&self, policy: PenaltyPolicy) -> Progress {
        let current = self.last().map(|e| e.odometer).unwrap_or(0);
        let mut progress = Progress {
            current,
            allowance: self.config.allowance,
            projected: f64::from(current),
            daily_rate: 0.0,
            penalty: Dollars::ZERO,
            policy,
        };

        let Some(last) = self.last() else {
            return progress;
        };

        let over = match policy {
            PenaltyPolicy::Simple => {
                let week = self.week_index(last.date).clamp(1, i64::from(self.config.lease_weeks));
                let reference = self.config.allowance_at_week(week as u32);
                f64::from(last.odometer) - reference
            }
            PenaltyPolicy::Projected => {
                // Dates are unique, so two entries always span at least a day.
                if self.entries.len() < 2 {
                    return progress;
                }
                let rate = self.daily_rate();
                let remaining = (self.config.lease_end() - last.date).num_days().max(0);
                progress.daily_rate = rate;
                progress.projected = f64::from(last.odometer) + rate * remaining as f64;
                progress.projected - f64::from(self.config.allowance)
            }
        };

        progress.penalty = Dollars(over.max(0.0) * self.config.penalty_rate);
        log::debug!(
            "Progress {} mi, reference value {:.1}, penalty {} ({} policy)",
            progress.current,
            progress.projected,
            progress.penalty,
            policy
        );
        progress
    }

    fn position(&self, date: NaiveDate) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|e| e.date.cmp(&date))
    }
}

/// Lazy per-week view over a ledger's entries
///
/// Created by [`Ledger::week_bucket`].
#[derive(Debug, Clone)]
pub struct WeekBucket<'a> {
    config: &'a LeaseConfig,
    entries: &'a [Entry],
    cursor: usize,
    week: u32,
}

impl Iterator for WeekBucket<'_> {
    type Item = Option<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.week > self.config.lease_weeks {
            return None;
        }
        let week = i64::from(self.week);

        // Entries are date-ordered, so week indices never decrease.
        let mut slot = None;
        while let Some(entry) = self.entries.get(self.cursor) {
            let entry_week = self.config.week_index(entry.date);
            if entry_week > week {
                break;
            }
            if entry_week == week {
                slot = Some(entry.odometer);
            }
            self.cursor += 1;
        }

        log::trace!("Week {}: {:?}", self.week, slot);
        self.week += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.config.lease_weeks + 1).saturating_sub(self.week) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WeekBucket<'_> {}
