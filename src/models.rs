use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A job application as seen by the analytics engine.
///
/// Legacy field names are resolved by the ingestion layer, so every concept
/// has exactly one field here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobApplication {
    pub id: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub status: Option<Status>,
    pub date_applied: Option<NaiveDateTime>,
    pub last_status_update: Option<NaiveDateTime>,
    pub priority: Option<String>,
    pub collection: bool,
    pub work_arrangement: Option<String>,
    pub technical_details: Option<TechnicalDetails>,
}

/// Skills as stored by the backend: either a list or one delimited string.
#[derive(Debug, Clone, PartialEq)]
pub enum TechnicalDetails {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Applied,
    OnlineAssessment,
    BehavioralInterview,
    TechnicalInterview,
    FinalInterview,
    /// Numbered interview rounds; "5+" is stored as 5.
    InterviewRound(u8),
    Offer,
    Rejected,
    NoResponse,
    Unrecognized(String),
}

impl Status {
    /// Parses a stored status string. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Status> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized = trimmed.to_lowercase().replace(['_', '-'], " ");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        let status = match normalized.as_str() {
            "applied" => Status::Applied,
            "oa" | "online assessment" | "assessment" => Status::OnlineAssessment,
            "behavioral interview" | "behavioral" | "behavioural interview" => {
                Status::BehavioralInterview
            }
            "technical interview" | "technical" => Status::TechnicalInterview,
            "final interview" | "final round" | "final" => Status::FinalInterview,
            "offer" => Status::Offer,
            "rejected" => Status::Rejected,
            "no response" | "ghosted" => Status::NoResponse,
            other => match parse_interview_round(other) {
                Some(round) => Status::InterviewRound(round),
                None => Status::Unrecognized(trimmed.to_string()),
            },
        };

        Some(status)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Status::Unrecognized(_))
    }

    pub fn is_interview_stage(&self) -> bool {
        matches!(
            self,
            Status::OnlineAssessment
                | Status::BehavioralInterview
                | Status::TechnicalInterview
                | Status::FinalInterview
                | Status::InterviewRound(_)
        )
    }

    /// Terminal states. Offer is included.
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Offer | Status::Rejected | Status::NoResponse)
    }
}

fn parse_interview_round(normalized: &str) -> Option<u8> {
    let rest = normalized
        .strip_prefix("interview round ")
        .or_else(|| normalized.strip_prefix("round "))
        .or_else(|| normalized.strip_prefix("interview "))?;
    let digits = rest.trim_end_matches('+').trim();
    let round: u8 = digits.parse().ok()?;
    if round == 0 {
        return None;
    }
    Some(round.min(5))
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Applied => write!(f, "Applied"),
            Status::OnlineAssessment => write!(f, "OA"),
            Status::BehavioralInterview => write!(f, "Behavioral Interview"),
            Status::TechnicalInterview => write!(f, "Technical Interview"),
            Status::FinalInterview => write!(f, "Final Interview"),
            Status::InterviewRound(5) => write!(f, "Interview Round 5+"),
            Status::InterviewRound(round) => write!(f, "Interview Round {round}"),
            Status::Offer => write!(f, "Offer"),
            Status::Rejected => write!(f, "Rejected"),
            Status::NoResponse => write!(f, "No Response"),
            Status::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Applied,
    Interview,
    Offer,
    Rejected,
    NoResponse,
    Unknown,
}

impl StatusCategory {
    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Applied => "Applied",
            StatusCategory::Interview => "Interview",
            StatusCategory::Offer => "Offer",
            StatusCategory::Rejected => "Rejected",
            StatusCategory::NoResponse => "No Response",
            StatusCategory::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Active,
    Closed,
    Offer,
    Unknown,
}

impl PipelineState {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Active => "Active",
            PipelineState::Closed => "Closed",
            PipelineState::Offer => "Offer",
            PipelineState::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkStyle {
    Remote,
    Hybrid,
    OnSite,
    Unspecified,
}

impl WorkStyle {
    pub fn label(&self) -> &'static str {
        match self {
            WorkStyle::Remote => "Remote",
            WorkStyle::Hybrid => "Hybrid",
            WorkStyle::OnSite => "On-site",
            WorkStyle::Unspecified => "Unspecified",
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, WorkStyle::Unspecified)
    }
}

/// Fixed response-delay ranges, in bucket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ResponseBucket {
    #[serde(rename = "0-3 days")]
    UpToThree,
    #[serde(rename = "4-7 days")]
    UpToSeven,
    #[serde(rename = "8-14 days")]
    UpToFourteen,
    #[serde(rename = "15-21 days")]
    UpToTwentyOne,
    #[serde(rename = "22-30 days")]
    UpToThirty,
    #[serde(rename = "31+ days")]
    OverThirty,
}

impl ResponseBucket {
    pub const ALL: [ResponseBucket; 6] = [
        ResponseBucket::UpToThree,
        ResponseBucket::UpToSeven,
        ResponseBucket::UpToFourteen,
        ResponseBucket::UpToTwentyOne,
        ResponseBucket::UpToThirty,
        ResponseBucket::OverThirty,
    ];

    /// Picks the first bucket whose upper bound covers `days`.
    pub fn for_days(days: f64) -> Option<ResponseBucket> {
        if !days.is_finite() || days < 0.0 {
            return None;
        }
        let bucket = if days <= 3.0 {
            ResponseBucket::UpToThree
        } else if days <= 7.0 {
            ResponseBucket::UpToSeven
        } else if days <= 14.0 {
            ResponseBucket::UpToFourteen
        } else if days <= 21.0 {
            ResponseBucket::UpToTwentyOne
        } else if days <= 30.0 {
            ResponseBucket::UpToThirty
        } else {
            ResponseBucket::OverThirty
        };
        Some(bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseBucket::UpToThree => "0-3 days",
            ResponseBucket::UpToSeven => "4-7 days",
            ResponseBucket::UpToFourteen => "8-14 days",
            ResponseBucket::UpToTwentyOne => "15-21 days",
            ResponseBucket::UpToThirty => "22-30 days",
            ResponseBucket::OverThirty => "31+ days",
        }
    }
}

/// A named partition produced by the grouping engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub label: String,
    /// Bucket start for date axes.
    pub bucket: Option<NaiveDate>,
    pub records: Vec<&'a JobApplication>,
}

/// One plottable item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
    pub display_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub closed: usize,
    pub offers: usize,
    pub starred: usize,
    pub response_rate: f64,
    pub offer_rate: f64,
    pub interview_rate: f64,
    pub this_week: usize,
    pub this_month: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingSummary {
    pub average_response_days: Option<f64>,
    pub average_offer_days: Option<f64>,
    pub responded_count: usize,
    pub offer_count: usize,
    pub fastest_response_days: Option<f64>,
    pub slowest_response_days: Option<f64>,
    pub most_common_response_bucket: Option<ResponseBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub description: String,
    pub value: String,
}
