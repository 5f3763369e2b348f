use clap::ValueEnum;

use crate::classify::{classify_status, offer_elapsed_days, response_elapsed_days};
use crate::grouping::Axis;
use crate::models::{JobApplication, Status, StatusCategory};

pub const EMPTY_VALUE: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    Count,
    ResponseRate,
    OfferRate,
    InterviewRate,
    AverageResponseTime,
    AverageOfferTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Count,
    Percentage,
    Duration,
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Count => MetricKind::Count,
            Metric::ResponseRate | Metric::OfferRate | Metric::InterviewRate => {
                MetricKind::Percentage
            }
            Metric::AverageResponseTime | Metric::AverageOfferTime => MetricKind::Duration,
        }
    }

    /// Keyword and response-time groups only make sense as counts.
    pub fn for_axis(self, axis: Axis) -> Metric {
        match axis {
            Axis::Keyword | Axis::ResponseTime => Metric::Count,
            _ => self,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Count => "Applications",
            Metric::ResponseRate => "Response rate",
            Metric::OfferRate => "Offer rate",
            Metric::InterviewRate => "Interview rate",
            Metric::AverageResponseTime => "Average response time",
            Metric::AverageOfferTime => "Average time to offer",
        }
    }
}

pub fn compute_metric(records: &[&JobApplication], metric: Metric) -> Option<f64> {
    match metric {
        Metric::Count => Some(records.len() as f64),
        Metric::ResponseRate => Some(rate(records, |job| {
            matches!(&job.status, Some(status) if *status != Status::Applied)
        })),
        Metric::OfferRate => Some(rate(records, |job| job.status == Some(Status::Offer))),
        Metric::InterviewRate => Some(rate(records, |job| {
            classify_status(job.status.as_ref()) == StatusCategory::Interview
        })),
        Metric::AverageResponseTime => {
            mean(records.iter().filter_map(|job| response_elapsed_days(job)))
        }
        Metric::AverageOfferTime => mean(records.iter().filter_map(|job| offer_elapsed_days(job))),
    }
}

/// Percentage of `records` matching `predicate`; 0 for an empty group.
fn rate<F>(records: &[&JobApplication], predicate: F) -> f64
where
    F: Fn(&JobApplication) -> bool,
{
    if records.is_empty() {
        return 0.0;
    }
    let matching = records.iter().filter(|job| predicate(job)).count();
    matching as f64 / records.len() as f64 * 100.0
}

pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn format_metric_value(metric: Metric, value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return EMPTY_VALUE.to_string();
    };

    match metric.kind() {
        MetricKind::Count => format_count(value.round() as u64),
        MetricKind::Percentage => format!("{value:.1}%"),
        MetricKind::Duration => format!("{value:.1} days"),
    }
}

/// Integer with comma thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            output.push(',');
        }
        output.push(digit);
    }
    output
}
