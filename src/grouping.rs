use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use clap::ValueEnum;
use tracing::debug;

use crate::classify::{
    classify_status, parse_skills, pipeline_state, response_elapsed_days, work_style,
};
use crate::dates::{
    format_day_label, format_month_label, format_week_label, spans_multiple_years, start_of_day,
    start_of_month, start_of_week, WeekStart,
};
use crate::models::{Group, JobApplication, ResponseBucket};

pub const COMPANY_LIMIT: usize = 10;
pub const KEYWORD_LIMIT: usize = 12;
pub const UNKNOWN_COMPANY: &str = "Unknown company";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Axis {
    Status,
    PipelineState,
    WorkStyle,
    Day,
    Week,
    Month,
    Company,
    Keyword,
    ResponseTime,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Status => "Status",
            Axis::PipelineState => "Pipeline state",
            Axis::WorkStyle => "Work style",
            Axis::Day => "Day",
            Axis::Week => "Week",
            Axis::Month => "Month",
            Axis::Company => "Company",
            Axis::Keyword => "Keyword",
            Axis::ResponseTime => "Response time",
        }
    }
}

pub fn group_by_axis(
    records: &[JobApplication],
    axis: Axis,
    week_start: WeekStart,
) -> Vec<Group<'_>> {
    let refs: Vec<&JobApplication> = records.iter().collect();
    group_refs_by_axis(&refs, axis, week_start)
}

/// Same as [`group_by_axis`] for an already-filtered view.
pub fn group_refs_by_axis<'a>(
    records: &[&'a JobApplication],
    axis: Axis,
    week_start: WeekStart,
) -> Vec<Group<'a>> {
    match axis {
        Axis::Status => group_in_order(records, |job| {
            Some(classify_status(job.status.as_ref()).label().to_string())
        }),
        Axis::PipelineState => group_in_order(records, |job| {
            Some(pipeline_state(job.status.as_ref()).label().to_string())
        }),
        Axis::WorkStyle => group_in_order(records, |job| Some(work_style(job).label().to_string())),
        Axis::Day => group_by_date(records, DateBucket::Day, week_start),
        Axis::Week => group_by_date(records, DateBucket::Week, week_start),
        Axis::Month => group_by_date(records, DateBucket::Month, week_start),
        Axis::Company => {
            let groups = group_in_order(records, |job| Some(company_label(job)));
            largest_first(groups, COMPANY_LIMIT)
        }
        Axis::Keyword => largest_first(group_by_keyword(records), KEYWORD_LIMIT),
        Axis::ResponseTime => group_by_response_time(records),
    }
}

pub fn company_label(job: &JobApplication) -> String {
    job.company
        .as_deref()
        .map(str::trim)
        .filter(|company| !company.is_empty())
        .unwrap_or(UNKNOWN_COMPANY)
        .to_string()
}

/// Groups in order of first appearance. Records with no key are skipped.
fn group_in_order<'a, F>(records: &[&'a JobApplication], key: F) -> Vec<Group<'a>>
where
    F: Fn(&JobApplication) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for &job in records {
        let Some(label) = key(job) else {
            continue;
        };
        let position = *index.entry(label.clone()).or_insert_with(|| {
            groups.push(Group {
                label,
                bucket: None,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].records.push(job);
    }

    groups
}

/// Stable sort by size descending, then keep the first `limit`.
fn largest_first(mut groups: Vec<Group<'_>>, limit: usize) -> Vec<Group<'_>> {
    groups.sort_by(|a, b| b.records.len().cmp(&a.records.len()));
    groups.truncate(limit);
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBucket {
    Day,
    Week,
    Month,
}

fn group_by_date<'a>(
    records: &[&'a JobApplication],
    bucket: DateBucket,
    week_start: WeekStart,
) -> Vec<Group<'a>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a JobApplication>> = BTreeMap::new();

    for &job in records {
        let Some(applied) = job.date_applied else {
            continue;
        };
        let day = start_of_day(applied);
        let key = match bucket {
            DateBucket::Day => Some(day),
            DateBucket::Week => start_of_week(day, week_start),
            DateBucket::Month => Some(start_of_month(day)),
        };
        let Some(key) = key else {
            debug!(%day, "week start out of range; skipping record");
            continue;
        };
        buckets.entry(key).or_default().push(job);
    }

    let with_year = spans_multiple_years(buckets.keys().copied());
    buckets
        .into_iter()
        .map(|(start, records)| Group {
            label: match bucket {
                DateBucket::Day => format_day_label(start, with_year),
                DateBucket::Week => format_week_label(start, with_year),
                DateBucket::Month => format_month_label(start),
            },
            bucket: Some(start),
            records,
        })
        .collect()
}

/// A record joins every distinct skill group it mentions.
fn group_by_keyword<'a>(records: &[&'a JobApplication]) -> Vec<Group<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for &job in records {
        let Some(details) = job.technical_details.as_ref() else {
            continue;
        };
        let mut seen = HashSet::new();
        for skill in parse_skills(details) {
            if !seen.insert(skill.clone()) {
                continue;
            }
            let position = *index.entry(skill.clone()).or_insert_with(|| {
                groups.push(Group {
                    label: skill,
                    bucket: None,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[position].records.push(job);
        }
    }

    groups
}

fn group_by_response_time<'a>(records: &[&'a JobApplication]) -> Vec<Group<'a>> {
    let mut buckets: BTreeMap<ResponseBucket, Vec<&'a JobApplication>> = BTreeMap::new();

    for &job in records {
        if let Some(bucket) = response_elapsed_days(job).and_then(ResponseBucket::for_days) {
            buckets.entry(bucket).or_default().push(job);
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, records)| Group {
            label: bucket.label().to_string(),
            bucket: None,
            records,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, TechnicalDetails};
    use pretty_assertions::assert_eq;

    fn job(status: &str, applied: Option<&str>) -> JobApplication {
        JobApplication {
            status: Status::parse(status),
            date_applied: applied.and_then(crate::dates::parse_date_value),
            ..Default::default()
        }
    }

    fn labels(groups: &[Group<'_>]) -> Vec<String> {
        groups.iter().map(|group| group.label.clone()).collect()
    }

    fn sizes(groups: &[Group<'_>]) -> Vec<usize> {
        groups.iter().map(|group| group.records.len()).collect()
    }

    #[test]
    fn empty_input_has_no_groups() {
        for axis in Axis::value_variants() {
            assert!(group_by_axis(&[], *axis, WeekStart::Monday).is_empty());
        }
    }

    #[test]
    fn status_groups_keep_first_appearance_order() {
        let jobs = vec![
            job("Rejected", None),
            job("OA", None),
            job("Final Interview", None),
            job("Withdrawn", None),
            job("Rejected", None),
        ];
        let groups = group_by_axis(&jobs, Axis::Status, WeekStart::Monday);
        assert_eq!(labels(&groups), vec!["Rejected", "Interview", "Unknown"]);
        assert_eq!(sizes(&groups), vec![2, 2, 1]);
    }

    #[test]
    fn pipeline_state_counts_active_and_offer() {
        let jobs = vec![
            JobApplication {
                status: Some(Status::Applied),
                ..Default::default()
            },
            JobApplication {
                status: Some(Status::Offer),
                ..Default::default()
            },
        ];
        let groups = group_by_axis(&jobs, Axis::PipelineState, WeekStart::Monday);
        assert_eq!(labels(&groups), vec!["Active", "Offer"]);
        assert_eq!(sizes(&groups), vec![1, 1]);
    }

    #[test]
    fn date_axes_skip_undated_records_and_sort_by_bucket() {
        let jobs = vec![
            job("Applied", Some("2024-02-14")),
            job("Applied", None),
            job("Applied", Some("2024-01-03")),
            job("Applied", Some("2024-01-03T17:00:00")),
        ];

        let days = group_by_axis(&jobs, Axis::Day, WeekStart::Monday);
        assert_eq!(labels(&days), vec!["Jan 3", "Feb 14"]);
        assert_eq!(sizes(&days).iter().sum::<usize>(), 3);

        let weeks = group_by_axis(&jobs, Axis::Week, WeekStart::Monday);
        assert_eq!(labels(&weeks), vec!["Week of Jan 1", "Week of Feb 12"]);

        let months = group_by_axis(&jobs, Axis::Month, WeekStart::Monday);
        assert_eq!(labels(&months), vec!["Jan 2024", "Feb 2024"]);
        assert_eq!(sizes(&months), vec![2, 1]);
    }

    #[test]
    fn weeks_starting_before_the_calendar_floor_are_dropped() {
        let jobs = crate::ingest::parse_json(
            r#"[
                {"status": "Applied", "dateApplied": "-262143-01-01"},
                {"status": "Applied", "dateApplied": "2024-01-10"}
            ]"#,
        )
        .unwrap();
        assert!(jobs[0].date_applied.is_some());

        let monday = group_by_axis(&jobs, Axis::Week, WeekStart::Monday);
        assert_eq!(labels(&monday), vec!["Week of Jan 8"]);
        assert_eq!(sizes(&monday), vec![1]);

        let sunday = group_by_axis(&jobs, Axis::Week, WeekStart::Sunday);
        assert_eq!(labels(&sunday), vec!["Week of Jan 7"]);
        assert_eq!(sizes(&sunday), vec![1]);
    }

    #[test]
    fn day_labels_stay_unique_across_years() {
        let jobs = vec![job("Applied", Some("2024-01-05")), job("Applied", Some("2025-01-05"))];
        let days = group_by_axis(&jobs, Axis::Day, WeekStart::Monday);
        assert_eq!(labels(&days), vec!["Jan 5, 2024", "Jan 5, 2025"]);
    }

    #[test]
    fn company_groups_are_truncated_by_size() {
        let mut jobs = Vec::new();
        for index in 0..15 {
            for _ in 0..=index {
                jobs.push(JobApplication {
                    company: Some(format!("Company {index}")),
                    ..Default::default()
                });
            }
        }
        jobs.push(JobApplication::default());

        let groups = group_by_axis(&jobs, Axis::Company, WeekStart::Monday);
        assert_eq!(groups.len(), COMPANY_LIMIT);
        assert_eq!(groups[0].label, "Company 14");
        assert!(groups
            .windows(2)
            .all(|pair| pair[0].records.len() >= pair[1].records.len()));
    }

    #[test]
    fn blank_company_becomes_unknown() {
        let jobs = vec![JobApplication {
            company: Some("   ".to_string()),
            ..Default::default()
        }];
        let groups = group_by_axis(&jobs, Axis::Company, WeekStart::Monday);
        assert_eq!(labels(&groups), vec![UNKNOWN_COMPANY]);
    }

    #[test]
    fn keyword_groups_count_each_record_once_per_skill() {
        let jobs = vec![
            JobApplication {
                technical_details: Some(TechnicalDetails::Text("Rust, rust, SQL".to_string())),
                ..Default::default()
            },
            JobApplication {
                technical_details: Some(TechnicalDetails::List(vec!["rust".to_string()])),
                ..Default::default()
            },
            JobApplication::default(),
        ];
        let groups = group_by_axis(&jobs, Axis::Keyword, WeekStart::Monday);
        assert_eq!(labels(&groups), vec!["Rust", "Sql"]);
        assert_eq!(sizes(&groups), vec![2, 1]);
    }

    #[test]
    fn keyword_groups_are_capped() {
        let skills: Vec<String> = (0..20).map(|index| format!("skill{index}")).collect();
        let jobs = vec![JobApplication {
            technical_details: Some(TechnicalDetails::List(skills)),
            ..Default::default()
        }];
        let groups = group_by_axis(&jobs, Axis::Keyword, WeekStart::Monday);
        assert_eq!(groups.len(), KEYWORD_LIMIT);
    }

    #[test]
    fn response_time_drops_empty_buckets() {
        let responded = |updated: &str| JobApplication {
            status: Some(Status::Rejected),
            date_applied: crate::dates::parse_date_value("2024-01-01"),
            last_status_update: crate::dates::parse_date_value(updated),
            ..Default::default()
        };
        let jobs = vec![
            responded("2024-01-04"),
            responded("2024-01-05"),
            responded("2024-02-01"),
            job("Applied", Some("2024-01-01")),
        ];
        let groups = group_by_axis(&jobs, Axis::ResponseTime, WeekStart::Monday);
        assert_eq!(labels(&groups), vec!["0-3 days", "4-7 days", "31+ days"]);
        assert_eq!(sizes(&groups), vec![1, 1, 1]);
    }

    #[test]
    fn grouping_is_repeatable_and_conserves_counts() {
        let jobs = vec![
            job("Applied", Some("2024-01-01")),
            job("Offer", Some("2024-01-09")),
            job("No Response", None),
        ];
        let before = jobs.clone();
        for axis in [Axis::Status, Axis::PipelineState, Axis::WorkStyle] {
            let first = group_by_axis(&jobs, axis, WeekStart::Sunday);
            let second = group_by_axis(&jobs, axis, WeekStart::Sunday);
            assert_eq!(first, second);
            assert_eq!(sizes(&first).iter().sum::<usize>(), jobs.len());
        }
        assert_eq!(jobs, before);
    }
}
