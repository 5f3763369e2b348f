use chrono::NaiveDate;

use crate::classify::is_starred;
use crate::dates::start_of_day;
use crate::models::JobApplication;

/// Caller-side narrowing applied before any aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub starred_only: bool,
}

impl Scope {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none() && !self.starred_only
    }

    /// Inclusive on both ends. Undated records are dropped only when a
    /// bound is set.
    pub fn contains(&self, job: &JobApplication) -> bool {
        if self.starred_only && !is_starred(job) {
            return false;
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(day) = job.date_applied.map(start_of_day) else {
            return false;
        };
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    pub fn apply<'a>(&self, records: &'a [JobApplication]) -> Vec<&'a JobApplication> {
        records.iter().filter(|job| self.contains(job)).collect()
    }

    pub fn describe(&self) -> String {
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => format!("applications from {from} to {to}"),
            (Some(from), None) => format!("applications since {from}"),
            (None, Some(to)) => format!("applications up to {to}"),
            (None, None) => "all applications".to_string(),
        };
        if self.starred_only {
            format!("starred {range}")
        } else {
            range
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date_value;

    fn job(applied: Option<&str>, priority: Option<&str>) -> JobApplication {
        JobApplication {
            date_applied: applied.and_then(parse_date_value),
            priority: priority.map(str::to_string),
            ..Default::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unbounded_scope_keeps_everything() {
        let jobs = vec![job(None, None), job(Some("2024-01-01"), None)];
        let scope = Scope::default();
        assert!(scope.is_unbounded());
        assert_eq!(scope.apply(&jobs).len(), 2);
        assert_eq!(scope.describe(), "all applications");
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated() {
        let jobs = vec![
            job(Some("2024-01-01"), None),
            job(Some("2024-01-31T22:10:00"), None),
            job(Some("2024-02-01"), None),
            job(None, None),
        ];
        let scope = Scope {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 31)),
            starred_only: false,
        };
        assert!(!scope.is_unbounded());
        assert_eq!(scope.apply(&jobs).len(), 2);
    }

    #[test]
    fn starred_only_filters_by_priority() {
        let jobs = vec![job(None, Some("High")), job(None, Some("low")), job(None, None)];
        let scope = Scope {
            starred_only: true,
            ..Default::default()
        };
        assert!(!scope.is_unbounded());
        assert_eq!(scope.apply(&jobs).len(), 1);
        assert_eq!(scope.describe(), "starred all applications");
    }
}
