//! Text report generation
//!
//! Renders the dashboard as plain ASCII: a summary block, the entry table,
//! the monthly mileage summary, and the weekly series.

use lease_ledger::{Dashboard, LeaseConfig, PenaltyPolicy};
use std::fmt::{self, Write};

/// Summary, entry table and monthly summary
pub fn write_overview<W: Write>(
    out: &mut W,
    dashboard: &Dashboard,
    config: &LeaseConfig,
) -> fmt::Result {
    write_summary(out, dashboard, config)?;
    writeln!(out)?;
    write_entries(out, dashboard)?;
    writeln!(out)?;
    write_months(out, dashboard)
}

/// Progress and penalty block
pub fn write_summary<W: Write>(
    out: &mut W,
    dashboard: &Dashboard,
    config: &LeaseConfig,
) -> fmt::Result {
    let progress = &dashboard.progress;
    writeln!(out, "Lease Mileage Summary")?;
    writeln!(out, "─────────────────────────────────────")?;
    writeln!(
        out,
        "  Progress:  {} / {} mi",
        group_thousands(i64::from(progress.current)),
        group_thousands(i64::from(progress.allowance))
    )?;
    writeln!(out, "  {}", progress_bar(progress.current, progress.allowance, 30))?;
    writeln!(
        out,
        "  Lease:     {} to {}",
        config.lease_start,
        config.lease_end()
    )?;
    if progress.policy == PenaltyPolicy::Projected && progress.daily_rate > 0.0 {
        writeln!(out, "  Rate:      {:.1} mi/day", progress.daily_rate)?;
        writeln!(
            out,
            "  Projected: {} mi at lease end",
            group_thousands(progress.projected.round() as i64)
        )?;
    }
    writeln!(
        out,
        "  Penalty:   {} ({} policy, ${:.2}/mi)",
        progress.penalty, progress.policy, config.penalty_rate
    )
}

/// Week / date / odometer table
pub fn write_entries<W: Write>(out: &mut W, dashboard: &Dashboard) -> fmt::Result {
    writeln!(out, "{:>6}  {:<10}  {:>10}", "Week", "Date", "Odometer")?;
    writeln!(out, "{:-<6}  {:-<10}  {:->10}", "", "", "")?;
    if dashboard.rows.is_empty() {
        writeln!(out, "  (no entries)")?;
    }
    for row in &dashboard.rows {
        writeln!(
            out,
            "{:>6}  {:<10}  {:>10}",
            row.week,
            row.date.to_string(),
            row.odometer
        )?;
    }
    Ok(())
}

/// Monthly mileage summary
pub fn write_months<W: Write>(out: &mut W, dashboard: &Dashboard) -> fmt::Result {
    writeln!(out, "Monthly Mileage Summary")?;
    for (month, delta) in &dashboard.months {
        writeln!(out, "  {}: {} mi", month, group_thousands(*delta))?;
    }
    Ok(())
}

/// Weekly series table; weeks without a reading are skipped unless `all`
pub fn write_weeks<W: Write>(out: &mut W, dashboard: &Dashboard, all: bool) -> fmt::Result {
    let series = &dashboard.series;
    writeln!(
        out,
        "{:>5}  {:>9}  {:>9}  {:>9}  {:>9}",
        "Week", "Actual", "Min", "Max", "Average"
    )?;
    for i in 0..series.len() {
        let actual = series.actual_series[i];
        if !all && actual.is_none() {
            continue;
        }
        writeln!(
            out,
            "{:>5}  {:>9}  {:>9}  {:>9}  {:>9}",
            i + 1,
            cell(actual.map(f64::from)),
            cell(series.min_series[i]),
            cell(series.max_series[i]),
            cell(series.average_series[i])
        )?;
    }
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}", v),
        None => "-".to_string(),
    }
}

fn progress_bar(current: u32, total: u32, width: usize) -> String {
    let ratio = if total == 0 {
        0.0
    } else {
        (f64::from(current) / f64::from(total)).min(1.0)
    };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        ratio * 100.0
    )
}

/// Format an integer with comma thousands separators
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lease_ledger::{Entry, Ledger};

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut String) -> fmt::Result,
    {
        let mut out = String::new();
        write(&mut out).unwrap();
        out
    }

    fn dashboard(entries: &[(&str, u32)]) -> Dashboard {
        let entries = entries
            .iter()
            .map(|(d, o)| Entry::parse(d, &o.to_string()).unwrap())
            .collect();
        let ledger = Ledger::with_entries(LeaseConfig::default(), entries).unwrap();
        Dashboard::from_ledger(&ledger)
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(22_500), "22,500");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-4_000), "-4,000");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 100, 10), "[..........]   0%");
        assert_eq!(progress_bar(50, 100, 10), "[#####.....]  50%");
        assert_eq!(progress_bar(500, 100, 10), "[##########] 100%");
    }

    #[test]
    fn test_overview_contents() {
        let dash = dashboard(&[("2025-07-29", 0), ("2025-08-05", 50), ("2025-08-20", 150)]);
        let text = render(|out| write_overview(out, &dash, &LeaseConfig::default()));
        assert!(text.contains("150 / 22,500 mi"));
        assert!(text.contains("2025-07: 0 mi"));
        assert!(text.contains("2025-08: 100 mi"));
        assert!(text.contains("2025-08-05"));
        assert!(text.contains("Penalty:   $0.00"));
    }

    #[test]
    fn test_empty_overview() {
        let dash = dashboard(&[]);
        let text = render(|out| write_overview(out, &dash, &LeaseConfig::default()));
        assert!(text.contains("0 / 22,500 mi"));
        assert!(text.contains("(no entries)"));
    }

    #[test]
    fn test_weeks_skip_empty_by_default() {
        let dash = dashboard(&[("2025-07-29", 0), ("2025-08-05", 200)]);
        let text = render(|out| write_weeks(out, &dash, false));
        assert_eq!(text.lines().count(), 3);
        assert_eq!(render(|out| write_weeks(out, &dash, true)).lines().count(), 157);
    }

    struct FailingWriter {
        lines: usize,
    }

    impl Write for FailingWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if s.contains('\n') {
                self.lines += 1;
            }
            if self.lines > 2 {
                Err(fmt::Error)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_writer_error_stops_report() {
        let dash = dashboard(&[("2025-07-29", 0), ("2025-08-05", 200)]);
        let mut out = FailingWriter { lines: 0 };
        assert!(write_overview(&mut out, &dash, &LeaseConfig::default()).is_err());
        assert_eq!(out.lines, 3);
    }
}
