use anyhow::Context;
use chrono::{Local, NaiveDate};

use crate::dates::WeekStart;

/// Settings shared by every aggregation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub week_start: WeekStart,
    /// Anchor for "this week" and "this month".
    pub today: NaiveDate,
}

impl AnalyticsConfig {
    /// Falls back to the local calendar date when `today` is not pinned.
    pub fn new(week_start: WeekStart, today: Option<NaiveDate>) -> Self {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        Self { week_start, today }
    }
}

/// Argument parser for `YYYY-MM-DD` command-line dates.
pub fn parse_cli_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got `{raw}`"))
}
