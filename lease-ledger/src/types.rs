//! Core types for the lease ledger library
//!
//! This module defines the odometer entry, the error taxonomy, and the small
//! value types (outcomes, prompts, money) shared by the ledger and the stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for entry dates and month keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// A single odometer reading
///
/// Serialized as `{"date": "YYYY-MM-DD", "odometer": 12345}`, the record shape
/// both entry stores persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Calendar date of the reading
    pub date: NaiveDate,
    /// Odometer value in miles
    pub odometer: u32,
}

impl Entry {
    /// Create an entry from already-typed values
    pub fn new(date: NaiveDate, odometer: u32) -> Self {
        Self { date, odometer }
    }

    /// Parse raw user input into an entry
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] if the date is missing or not a
    /// `YYYY-MM-DD` calendar date, or if the odometer is missing, not an
    /// integer, or negative.
    pub fn parse(date: &str, odometer: &str) -> Result<Self> {
        let date = parse_date(date)?;
        let odometer = parse_odometer(odometer)?;
        Ok(Self { date, odometer })
    }

    /// Month key (`YYYY-MM`) of this entry
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} mi", self.date.format(DATE_FORMAT), self.odometer)
    }
}

/// Parse a `YYYY-MM-DD` date from user input
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("date is required".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        LedgerError::Validation(format!("invalid date '{}': {}", trimmed, e))
    })
}

/// Parse a non-negative integer odometer value from user input
pub fn parse_odometer(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("odometer is required".to_string()));
    }
    let value: i64 = trimmed.parse().map_err(|_| {
        LedgerError::Validation(format!("odometer '{}' is not an integer", trimmed))
    })?;
    if value < 0 {
        return Err(LedgerError::Validation(format!(
            "odometer must not be negative (got {})",
            value
        )));
    }
    u32::try_from(value).map_err(|_| {
        LedgerError::Validation(format!("odometer {} is out of range", value))
    })
}

/// Errors that can occur in the ledger and its stores
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid lease configuration: {0}")]
    InvalidConfig(String),

    #[error("Entry store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of a mutating ledger operation
///
/// A declined confirmation is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied
    Applied,
    /// The user declined the confirmation prompt; nothing changed
    Declined,
    /// There was nothing to do (missing date, identical value)
    Unchanged,
}

impl Outcome {
    /// True if the ledger changed
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => write!(f, "applied"),
            Outcome::Declined => write!(f, "declined"),
            Outcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// A question the ledger needs answered before a destructive change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Replace the reading already recorded for `date`
    Overwrite {
        date: NaiveDate,
        current: u32,
        proposed: u32,
    },
    /// Remove the reading recorded for `date`
    Delete { date: NaiveDate, odometer: u32 },
    /// Remove every reading
    Reset { entries: usize },
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Overwrite { date, current, proposed } => write!(
                f,
                "An entry for {} already exists ({} mi). Replace it with {} mi?",
                date.format(DATE_FORMAT),
                current,
                proposed
            ),
            Prompt::Delete { date, odometer } => write!(
                f,
                "Delete the entry for {} ({} mi)?",
                date.format(DATE_FORMAT),
                odometer
            ),
            Prompt::Reset { entries } => write!(f, "Reset all data ({} entries)?", entries),
        }
    }
}

/// Yes/no decision capability passed into mutating operations
///
/// Implemented for [`Answer`] (a pre-decided answer) and for any
/// `FnMut(&Prompt) -> bool` closure.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

/// A pre-decided answer to every prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

impl Confirm for Answer {
    fn confirm(&mut self, _prompt: &Prompt) -> bool {
        matches!(self, Answer::Yes)
    }
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// Dollar amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Dollars(pub f64);

impl Dollars {
    pub const ZERO: Dollars = Dollars(0.0);

    /// Amount rounded to whole cents
    pub fn cents(self) -> i64 {
        (self.0 * 100.0).round() as i64
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}
