//! Per-week chart series for the presentation layer

use crate::ledger::Ledger;
use chrono::Duration;
use serde::Serialize;

/// Weekly series consumed by a chart renderer
///
/// Every vector has one slot per lease week; `None` marks a week with no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Last recorded odometer of each week
    pub actual_series: Vec<Option<u32>>,
    /// Cumulative allowance pace
    pub min_series: Vec<Option<f64>>,
    /// Cumulative ceiling pace
    pub max_series: Vec<Option<f64>>,
    /// Average-rate line through the first entry
    pub average_series: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Build all four series from the ledger's current entries
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let config = ledger.config();
        let weeks = 1..=config.lease_weeks;

        let actual_series = ledger.week_bucket().collect();
        let min_series = weeks
            .clone()
            .map(|w| Some(config.allowance_at_week(w)))
            .collect();
        let max_series = weeks
            .clone()
            .map(|w| Some(config.max_allowance_at_week(w)))
            .collect();

        let average_series = match ledger.first() {
            Some(first) if ledger.len() >= 2 => {
                let rate = ledger.daily_rate();
                let first_week = ledger.week_index(first.date);
                weeks
                    .map(|w| {
                        if i64::from(w) < first_week {
                            return None;
                        }
                        // Last day of week `w`
                        let week_end = config.lease_start + Duration::days(i64::from(w) * 7 - 1);
                        let days = (week_end - first.date).num_days().max(0);
                        Some(f64::from(first.odometer) + rate * days as f64)
                    })
                    .collect()
            }
            _ => vec![None; config.lease_weeks as usize],
        };

        Self {
            actual_series,
            min_series,
            max_series,
            average_series,
        }
    }

    /// Number of week slots in each series
    pub fn len(&self) -> usize {
        self.actual_series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual_series.is_empty()
    }
}
