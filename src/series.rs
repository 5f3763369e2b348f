use std::collections::HashMap;

use crate::classify::{classify_status, work_style};
use crate::dates::WeekStart;
use crate::grouping::{group_by_axis, group_refs_by_axis, Axis};
use crate::metrics::{compute_metric, format_metric_value, Metric};
use crate::models::{Group, JobApplication, SeriesPoint};

/// Groups along `axis` and evaluates `metric` per group, keeping group order.
pub fn build_axis_series(
    records: &[JobApplication],
    axis: Axis,
    metric: Metric,
    week_start: WeekStart,
) -> Vec<SeriesPoint> {
    points(group_by_axis(records, axis, week_start), metric.for_axis(axis))
}

pub fn build_axis_series_for(
    records: &[&JobApplication],
    axis: Axis,
    metric: Metric,
    week_start: WeekStart,
) -> Vec<SeriesPoint> {
    points(group_refs_by_axis(records, axis, week_start), metric.for_axis(axis))
}

fn points(groups: Vec<Group<'_>>, metric: Metric) -> Vec<SeriesPoint> {
    groups
        .into_iter()
        .map(|group| {
            let value = compute_metric(&group.records, metric);
            SeriesPoint {
                display_value: format_metric_value(metric, value),
                label: group.label,
                value,
                bucket: group.bucket,
            }
        })
        .collect()
}

pub fn build_per_day_series(records: &[&JobApplication]) -> Vec<SeriesPoint> {
    // Week start only shapes week buckets.
    dated_counts(records, Axis::Day, WeekStart::default())
}

pub fn build_per_week_series(records: &[&JobApplication], week_start: WeekStart) -> Vec<SeriesPoint> {
    dated_counts(records, Axis::Week, week_start)
}

pub fn build_per_month_series(records: &[&JobApplication]) -> Vec<SeriesPoint> {
    dated_counts(records, Axis::Month, WeekStart::default())
}

fn dated_counts(records: &[&JobApplication], axis: Axis, week_start: WeekStart) -> Vec<SeriesPoint> {
    let mut series = build_axis_series_for(records, axis, Metric::Count, week_start);
    // Order on the bucket start, never on the label text.
    series.sort_by_key(|point| point.bucket);
    series
}

/// Status crossed with work style, largest first.
pub fn build_status_work_style_series(records: &[&JobApplication]) -> Vec<SeriesPoint> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for &job in records {
        let status = classify_status(job.status.as_ref()).label();
        let style = work_style(job);
        let key = if style.is_specified() {
            format!("{status} • {}", style.label())
        } else {
            status.to_string()
        };
        match index.get(&key) {
            Some(&position) => counts[position].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(label, count)| {
            let value = Some(count as f64);
            SeriesPoint {
                label,
                value,
                display_value: format_metric_value(Metric::Count, value),
                bucket: None,
            }
        })
        .collect()
}
