//! Lease Mileage Ledger Library
//!
//! Tracks periodic odometer readings against a fixed lease mileage allowance
//! and derives the values a tracker front end displays.
//!
//! # Architecture
//!
//! - [`Ledger`] holds the entries (one per date, ascending) and computes the
//!   weekly and monthly buckets, progress, and projected overage penalty
//! - [`EntryStore`] persists the whole collection; [`JsonFileStore`] keeps it
//!   in a local JSON document and [`MemoryStore`] models a synced snapshot store
//! - [`Tracker`] exposes explicit command handlers (`on_submit`, `on_delete`,
//!   `on_reset`) that validate, confirm, mutate and persist atomically
//!
//! Rendering is left to the application layer (lease-cli).
//!
//! # Example Usage
//!
//! ```
//! use lease_ledger::{Answer, LeaseConfig, MemoryStore, Outcome, Tracker};
//!
//! let mut tracker = Tracker::open(LeaseConfig::default(), MemoryStore::new()).unwrap();
//! tracker.on_submit("2025-07-29", "0", Answer::Yes).unwrap();
//! let outcome = tracker.on_submit("2025-08-05", "200", Answer::Yes).unwrap();
//! assert_eq!(outcome, Outcome::Applied);
//!
//! let dashboard = tracker.dashboard();
//! assert_eq!(dashboard.progress.current, 200);
//! assert_eq!(dashboard.series.actual_series[1], Some(200));
//! ```

// Public modules
pub mod config;
pub mod ledger;
pub mod series;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export main types for convenience
pub use config::{LeaseConfig, PenaltyPolicy};
pub use ledger::{Ledger, Progress, WeekBucket};
pub use series::ChartSeries;
pub use store::{EntryStore, JsonFileStore, MemoryStore};
pub use tracker::{Dashboard, EntryRow, Tracker};
pub use types::{
    Answer, Confirm, Dollars, Entry, LedgerError, Outcome, Prompt, Result,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
