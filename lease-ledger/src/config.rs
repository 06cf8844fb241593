//! Lease configuration types
//!
//! The lease terms are fixed for the life of a ledger: allowance, penalty rate,
//! duration, and the start/end dates every derived value is measured against.

use crate::types::{LedgerError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default total mileage allowance for the lease term
pub const DEFAULT_ALLOWANCE: u32 = 22_500;

/// Default cost per mile over the allowance, in dollars
pub const DEFAULT_PENALTY_RATE: f64 = 0.20;

/// Default lease duration in weeks
pub const DEFAULT_LEASE_WEEKS: u32 = 156;

/// Default ceiling used for the upper pace line of the chart
pub const DEFAULT_MAX_ALLOWANCE: u32 = 36_000;

/// Longest lease term accepted, in weeks (50 years)
pub const MAX_LEASE_WEEKS: u32 = 2_600;

/// How the overage penalty is derived from the recorded entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyPolicy {
    /// Compare the latest reading with the allowance pace at its lease week
    Simple,
    /// Extrapolate the observed daily rate to lease end and compare with the
    /// full allowance
    #[default]
    Projected,
}

impl std::fmt::Display for PenaltyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PenaltyPolicy::Simple => write!(f, "simple"),
            PenaltyPolicy::Projected => write!(f, "projected"),
        }
    }
}

/// Configuration for a lease ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// Total contracted mileage for the lease term
    #[serde(default = "default_allowance")]
    pub allowance: u32,

    /// Dollars charged per mile over the allowance
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: f64,

    /// Lease duration in weeks (number of week slots)
    #[serde(default = "default_lease_weeks")]
    pub lease_weeks: u32,

    /// First day of lease week 1
    #[serde(default = "default_lease_start")]
    pub lease_start: NaiveDate,

    /// Lease end date (defaults to `lease_start + lease_weeks` weeks)
    #[serde(default)]
    pub lease_end: Option<NaiveDate>,

    /// Mileage ceiling used for the upper chart pace line
    #[serde(default = "default_max_allowance")]
    pub max_allowance: u32,

    /// Penalty derivation policy
    #[serde(default)]
    pub policy: PenaltyPolicy,
}

fn default_allowance() -> u32 {
    DEFAULT_ALLOWANCE
}

fn default_penalty_rate() -> f64 {
    DEFAULT_PENALTY_RATE
}

fn default_lease_weeks() -> u32 {
    DEFAULT_LEASE_WEEKS
}

fn default_max_allowance() -> u32 {
    DEFAULT_MAX_ALLOWANCE
}

/// Default lease start date (2025-07-29)
pub fn default_lease_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 29).expect("2025-07-29 is a valid calendar date")
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            allowance: DEFAULT_ALLOWANCE,
            penalty_rate: DEFAULT_PENALTY_RATE,
            lease_weeks: DEFAULT_LEASE_WEEKS,
            lease_start: default_lease_start(),
            lease_end: None,
            max_allowance: DEFAULT_MAX_ALLOWANCE,
            policy: PenaltyPolicy::default(),
        }
    }
}

impl LeaseConfig {
    /// Create a lease configuration with default terms
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the mileage allowance
    pub fn with_allowance(mut self, allowance: u32) -> Self {
        self.allowance = allowance;
        self
    }

    /// Builder method: set the penalty rate in dollars per mile
    pub fn with_penalty_rate(mut self, rate: f64) -> Self {
        self.penalty_rate = rate;
        self
    }

    /// Builder method: set the lease duration in weeks
    pub fn with_lease_weeks(mut self, weeks: u32) -> Self {
        self.lease_weeks = weeks;
        self
    }

    /// Builder method: set the lease start date
    pub fn with_lease_start(mut self, start: NaiveDate) -> Self {
        self.lease_start = start;
        self
    }

    /// Builder method: set an explicit lease end date
    pub fn with_lease_end(mut self, end: NaiveDate) -> Self {
        self.lease_end = Some(end);
        self
    }

    /// Builder method: set the upper pace line ceiling
    pub fn with_max_allowance(mut self, max_allowance: u32) -> Self {
        self.max_allowance = max_allowance;
        self
    }

    /// Builder method: select the penalty policy
    pub fn with_policy(mut self, policy: PenaltyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Effective lease end date
    ///
    /// Saturates at `NaiveDate::MAX` when `lease_start + lease_weeks` is not
    /// representable; [`LeaseConfig::validate`] rejects such terms.
    pub fn lease_end(&self) -> NaiveDate {
        self.checked_lease_end().unwrap_or(NaiveDate::MAX)
    }

    /// Effective lease end date, or `None` if the computed date overflows
    pub fn checked_lease_end(&self) -> Option<NaiveDate> {
        match self.lease_end {
            Some(end) => Some(end),
            None => self
                .lease_start
                .checked_add_signed(Duration::weeks(i64::from(self.lease_weeks))),
        }
    }

    /// Lease week index of a date: `floor((date - start) / 7) + 1`
    ///
    /// Dates before the lease start map to week 0 or below.
    pub fn week_index(&self, date: NaiveDate) -> i64 {
        (date - self.lease_start).num_days().div_euclid(7) + 1
    }

    /// Cumulative allowance pace at the end of `week`
    pub fn allowance_at_week(&self, week: u32) -> f64 {
        pace(self.allowance, week, self.lease_weeks)
    }

    /// Cumulative ceiling pace at the end of `week`
    pub fn max_allowance_at_week(&self, week: u32) -> f64 {
        pace(self.max_allowance, week, self.lease_weeks)
    }

    /// Check the terms for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.lease_weeks == 0 {
            return Err(LedgerError::InvalidConfig(
                "lease_weeks must be at least 1".to_string(),
            ));
        }
        if self.lease_weeks > MAX_LEASE_WEEKS {
            return Err(LedgerError::InvalidConfig(format!(
                "lease_weeks must be at most {} (got {})",
                MAX_LEASE_WEEKS, self.lease_weeks
            )));
        }
        if !self.penalty_rate.is_finite() || self.penalty_rate < 0.0 {
            return Err(LedgerError::InvalidConfig(format!(
                "penalty_rate must be a non-negative number (got {})",
                self.penalty_rate
            )));
        }
        // Every week slot must map to a representable date, even with an
        // explicit end date.
        let span_end = self
            .lease_start
            .checked_add_signed(Duration::weeks(i64::from(self.lease_weeks)))
            .ok_or_else(|| {
                LedgerError::InvalidConfig(format!(
                    "lease of {} weeks starting {} ends past the last representable date",
                    self.lease_weeks, self.lease_start
                ))
            })?;
        let end = self.lease_end.unwrap_or(span_end);
        if end <= self.lease_start {
            return Err(LedgerError::InvalidConfig(format!(
                "lease end {} is not after lease start {}",
                end, self.lease_start
            )));
        }
        Ok(())
    }
}

fn pace(total: u32, week: u32, weeks: u32) -> f64 {
    if weeks == 0 {
        return 0.0;
    }
    f64::from(total) * f64::from(week.min(weeks)) / f64::from(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_terms() {
        let config = LeaseConfig::default();
        assert_eq!(config.allowance, 22_500);
        assert_eq!(config.lease_weeks, 156);
        assert_eq!(config.lease_start, date(2025, 7, 29));
        assert_eq!(config.lease_end(), date(2028, 7, 25));
        assert_eq!(config.policy, PenaltyPolicy::Projected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_week_index() {
        let config = LeaseConfig::default();
        assert_eq!(config.week_index(date(2025, 7, 29)), 1);
        assert_eq!(config.week_index(date(2025, 8, 4)), 1);
        assert_eq!(config.week_index(date(2025, 8, 5)), 2);
        assert_eq!(config.week_index(date(2025, 7, 28)), 0);
        assert_eq!(config.week_index(date(2025, 7, 21)), -1);
    }

    #[test]
    fn test_pace_lines() {
        let config = LeaseConfig::default();
        assert_eq!(config.allowance_at_week(156), 22_500.0);
        assert_eq!(config.allowance_at_week(78), 11_250.0);
        assert_eq!(config.allowance_at_week(500), 22_500.0);
        assert_eq!(config.max_allowance_at_week(156), 36_000.0);
    }

    #[test]
    fn test_builder_and_validation() {
        let config = LeaseConfig::new()
            .with_allowance(30_000)
            .with_penalty_rate(0.25)
            .with_lease_start(date(2024, 1, 1))
            .with_lease_end(date(2027, 1, 1))
            .with_policy(PenaltyPolicy::Simple);
        assert_eq!(config.lease_end(), date(2027, 1, 1));
        assert!(config.validate().is_ok());

        assert!(LeaseConfig::new().with_lease_weeks(0).validate().is_err());
        assert!(LeaseConfig::new().with_penalty_rate(-1.0).validate().is_err());
        assert!(LeaseConfig::new()
            .with_lease_end(date(2025, 1, 1))
            .validate()
            .is_err());
    }

    #[test]
    fn test_oversized_terms_are_rejected() {
        let err = LeaseConfig::new().with_lease_weeks(u32::MAX).validate();
        assert!(matches!(err, Err(LedgerError::InvalidConfig(_))));

        let err = LeaseConfig::new()
            .with_lease_weeks(MAX_LEASE_WEEKS + 1)
            .validate();
        assert!(matches!(err, Err(LedgerError::InvalidConfig(_))));
        assert!(LeaseConfig::new()
            .with_lease_weeks(MAX_LEASE_WEEKS)
            .validate()
            .is_ok());

        let late = LeaseConfig::new().with_lease_start(NaiveDate::MAX - Duration::days(3));
        assert_eq!(late.checked_lease_end(), None);
        assert_eq!(late.lease_end(), NaiveDate::MAX);
        assert!(matches!(late.validate(), Err(LedgerError::InvalidConfig(_))));

        let explicit_end = late.with_lease_end(NaiveDate::MAX);
        assert!(matches!(explicit_end.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: LeaseConfig =
            serde_json::from_str(r#"{"allowance": 30000, "policy": "simple"}"#).unwrap();
        assert_eq!(config.allowance, 30_000);
        assert_eq!(config.policy, PenaltyPolicy::Simple);
        assert_eq!(config.lease_weeks, DEFAULT_LEASE_WEEKS);
        assert_eq!(config.penalty_rate, DEFAULT_PENALTY_RATE);
    }
}
