use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};
use clap::ValueEnum;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// First day of the calendar week. Used for week buckets and "this week".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

pub fn start_of_day(at: NaiveDateTime) -> NaiveDate {
    at.date()
}

/// `None` when the week would begin before the earliest representable date.
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    date.checked_sub_days(Days::new(u64::from(offset)))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// "Jan 5", or "Jan 5, 2025" when the series spans several years.
pub fn format_day_label(date: NaiveDate, with_year: bool) -> String {
    if with_year {
        format!("{} {}, {}", month_abbrev(date), date.day(), date.year())
    } else {
        format!("{} {}", month_abbrev(date), date.day())
    }
}

pub fn format_week_label(week_start: NaiveDate, with_year: bool) -> String {
    format!("Week of {}", format_day_label(week_start, with_year))
}

pub fn format_month_label(date: NaiveDate) -> String {
    format!("{} {}", month_abbrev(date), date.year())
}

/// True when the dates fall in more than one calendar year, i.e. short
/// day labels would collide.
pub fn spans_multiple_years<I>(dates: I) -> bool
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut years = dates.into_iter().map(|date| date.year());
    match years.next() {
        Some(first) => years.any(|year| year != first),
        None => false,
    }
}

/// Parses the date formats the backend has been seen to store.
///
/// Offsets are converted to the local calendar; everything else is taken
/// as already local.
pub fn parse_date_value(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Elapsed time between two instants in fractional days.
pub fn elapsed_days(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 86_400_000.0
}
