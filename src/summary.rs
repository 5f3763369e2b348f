use chrono::{Days, NaiveDate};

use crate::classify::{is_starred, offer_elapsed_days, response_elapsed_days};
use crate::dates::{start_of_day, start_of_month, start_of_week, WeekStart};
use crate::metrics::{compute_metric, format_count, format_metric_value, mean, Metric};
use crate::models::{JobApplication, ResponseBucket, Status, Summary, SummaryCard, TimingSummary};

/// Headline numbers over the whole record set.
///
/// `today` anchors "this week" and "this month"; callers pass the local date
/// so the result does not depend on the wall clock.
pub fn summarize(records: &[&JobApplication], today: NaiveDate, week_start: WeekStart) -> Summary {
    let total = records.len();
    let closed = records
        .iter()
        .filter(|job| job.status.as_ref().is_some_and(Status::is_closed))
        .count();
    let offers = records
        .iter()
        .filter(|job| job.status == Some(Status::Offer))
        .count();

    let week = start_of_week(today, week_start)
        .and_then(|begin| Some((begin, begin.checked_add_days(Days::new(7))?)));
    let month_begin = start_of_month(today);

    let applied_days: Vec<NaiveDate> = records
        .iter()
        .filter_map(|job| job.date_applied.map(start_of_day))
        .collect();
    let this_week = applied_days
        .iter()
        .filter(|day| week.is_some_and(|(begin, end)| **day >= begin && **day < end))
        .count();
    let this_month = applied_days
        .iter()
        .filter(|day| start_of_month(**day) == month_begin)
        .count();

    Summary {
        total,
        active: total - closed,
        closed,
        offers,
        starred: records.iter().filter(|job| is_starred(job)).count(),
        response_rate: compute_metric(records, Metric::ResponseRate).unwrap_or(0.0),
        offer_rate: compute_metric(records, Metric::OfferRate).unwrap_or(0.0),
        interview_rate: compute_metric(records, Metric::InterviewRate).unwrap_or(0.0),
        this_week,
        this_month,
    }
}

pub fn timing_summary(records: &[&JobApplication]) -> TimingSummary {
    let response_days: Vec<f64> = records
        .iter()
        .filter_map(|job| response_elapsed_days(job))
        .collect();
    let offer_days: Vec<f64> = records
        .iter()
        .filter_map(|job| offer_elapsed_days(job))
        .collect();

    TimingSummary {
        average_response_days: mean(response_days.iter().copied()),
        average_offer_days: mean(offer_days.iter().copied()),
        responded_count: response_days.len(),
        offer_count: offer_days.len(),
        fastest_response_days: response_days.iter().copied().reduce(f64::min),
        slowest_response_days: response_days.iter().copied().reduce(f64::max),
        most_common_response_bucket: most_common_bucket(&response_days),
    }
}

/// Largest bucket; ties go to the shorter delay.
fn most_common_bucket(days: &[f64]) -> Option<ResponseBucket> {
    let mut counts = ResponseBucket::ALL.map(|_| 0usize);
    for bucket in days.iter().filter_map(|day| ResponseBucket::for_days(*day)) {
        counts[bucket as usize] += 1;
    }

    let mut best: Option<(ResponseBucket, usize)> = None;
    for (bucket, count) in ResponseBucket::ALL.into_iter().zip(counts) {
        if count == 0 {
            continue;
        }
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((bucket, count));
        }
    }
    best.map(|(bucket, _)| bucket)
}

pub fn summary_cards(summary: &Summary, timing: &TimingSummary) -> Vec<SummaryCard> {
    let rate = |value: f64| format_metric_value(Metric::ResponseRate, Some(value));
    let card = |label: &str, description: &str, value: String| SummaryCard {
        label: label.to_string(),
        description: description.to_string(),
        value,
    };

    vec![
        card(
            "Total applications",
            "All applications in scope",
            format_count(summary.total as u64),
        ),
        card(
            "Active",
            "Still waiting on a final outcome",
            format_count(summary.active as u64),
        ),
        card(
            "Closed",
            "Rejected, offer, or no response",
            format_count(summary.closed as u64),
        ),
        card(
            "Response rate",
            "Moved past the applied stage",
            rate(summary.response_rate),
        ),
        card(
            "Interview rate",
            "Currently in an interview stage",
            rate(summary.interview_rate),
        ),
        card("Offer rate", "Applications ending in an offer", rate(summary.offer_rate)),
        card(
            "This week",
            "Applied during the current week",
            format_count(summary.this_week as u64),
        ),
        card(
            "This month",
            "Applied during the current month",
            format_count(summary.this_month as u64),
        ),
        card(
            "Starred",
            "Marked as high priority or collected",
            format_count(summary.starred as u64),
        ),
        card(
            "Avg response time",
            "From application to last status update",
            format_metric_value(Metric::AverageResponseTime, timing.average_response_days),
        ),
        card(
            "Avg time to offer",
            "From application to offer",
            format_metric_value(Metric::AverageOfferTime, timing.average_offer_days),
        ),
        card(
            "Typical response delay",
            "Most common response-time bucket",
            timing
                .most_common_response_bucket
                .map(|bucket| bucket.label().to_string())
                .unwrap_or_else(|| crate::metrics::EMPTY_VALUE.to_string()),
        ),
    ]
}
