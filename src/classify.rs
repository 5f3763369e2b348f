use crate::dates::elapsed_days;
use crate::models::{
    JobApplication, PipelineState, Status, StatusCategory, TechnicalDetails, WorkStyle,
};

const STARRED_PRIORITIES: [&str; 7] = [
    "high",
    "dream job",
    "dream",
    "collection",
    "favorite",
    "favourite",
    "starred",
];

const MAX_SKILL_CHARS: usize = 39;
const ID_DIGIT_RUN: usize = 6;

pub fn classify_status(status: Option<&Status>) -> StatusCategory {
    match status {
        Some(Status::Applied) => StatusCategory::Applied,
        Some(status) if status.is_interview_stage() => StatusCategory::Interview,
        Some(Status::Offer) => StatusCategory::Offer,
        Some(Status::Rejected) => StatusCategory::Rejected,
        Some(Status::NoResponse) => StatusCategory::NoResponse,
        _ => StatusCategory::Unknown,
    }
}

pub fn pipeline_state(status: Option<&Status>) -> PipelineState {
    match status {
        Some(Status::Offer) => PipelineState::Offer,
        Some(status) if status.is_closed() => PipelineState::Closed,
        Some(status) if status.is_recognized() => PipelineState::Active,
        _ => PipelineState::Unknown,
    }
}

/// Work arrangement first, location as the fallback.
pub fn work_style(record: &JobApplication) -> WorkStyle {
    [&record.work_arrangement, &record.location]
        .into_iter()
        .flatten()
        .find_map(|text| work_style_hint(text))
        .unwrap_or(WorkStyle::Unspecified)
}

fn work_style_hint(text: &str) -> Option<WorkStyle> {
    let lowered = text.to_lowercase();
    if lowered.contains("remote") {
        Some(WorkStyle::Remote)
    } else if lowered.contains("hybrid") {
        Some(WorkStyle::Hybrid)
    } else if ["on-site", "onsite", "on site", "in office"]
        .iter()
        .any(|hint| lowered.contains(hint))
    {
        Some(WorkStyle::OnSite)
    } else {
        None
    }
}

pub fn is_starred(record: &JobApplication) -> bool {
    if record.collection {
        return true;
    }
    record
        .priority
        .as_deref()
        .map(|priority| {
            let priority = priority.trim().to_lowercase();
            STARRED_PRIORITIES.contains(&priority.as_str())
        })
        .unwrap_or(false)
}

/// Status set whose `last_status_update` reflects an employer reply.
pub fn has_responded(status: Option<&Status>) -> bool {
    match status {
        Some(Status::Applied | Status::NoResponse | Status::Unrecognized(_)) | None => false,
        Some(_) => true,
    }
}

pub fn response_elapsed_days(record: &JobApplication) -> Option<f64> {
    if !has_responded(record.status.as_ref()) {
        return None;
    }
    status_elapsed_days(record)
}

pub fn offer_elapsed_days(record: &JobApplication) -> Option<f64> {
    if record.status != Some(Status::Offer) {
        return None;
    }
    status_elapsed_days(record)
}

fn status_elapsed_days(record: &JobApplication) -> Option<f64> {
    let applied = record.date_applied?;
    let updated = record.last_status_update?;
    let days = elapsed_days(applied, updated);
    (days.is_finite() && days >= 0.0).then_some(days)
}

pub fn parse_skills(raw: &TechnicalDetails) -> Vec<String> {
    let tokens: Vec<&str> = match raw {
        TechnicalDetails::Text(text) => text.split([',', ';', '\n']).collect(),
        TechnicalDetails::List(items) => items.iter().map(String::as_str).collect(),
    };

    tokens.into_iter().filter_map(normalize_skill).collect()
}

fn normalize_skill(token: &str) -> Option<String> {
    let spaced: String = token
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let words: Vec<&str> = spaced.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let joined = words.join(" ");
    if joined.chars().count() > MAX_SKILL_CHARS || has_digit_run(&joined, ID_DIGIT_RUN) {
        return None;
    }

    Some(
        words
            .iter()
            .map(|word| title_case(word))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn has_digit_run(text: &str, run: usize) -> bool {
    let mut current = 0;
    for c in text.chars() {
        if c.is_ascii_digit() {
            current += 1;
            if current >= run {
                return true;
            }
        } else {
            current = 0;
        }
    }
    false
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn record(status: &str) -> JobApplication {
        JobApplication {
            status: Status::parse(status),
            ..Default::default()
        }
    }

    #[test]
    fn interview_stages_collapse_into_one_category() {
        for status in [
            "OA",
            "Behavioral Interview",
            "Technical Interview",
            "Final Interview",
            "Interview Round 3",
        ] {
            assert_eq!(
                classify_status(Status::parse(status).as_ref()),
                StatusCategory::Interview,
                "{status}"
            );
        }
        assert_eq!(
            classify_status(Status::parse("Offer").as_ref()),
            StatusCategory::Offer
        );
        assert_eq!(classify_status(None), StatusCategory::Unknown);
        assert_eq!(
            classify_status(Status::parse("Withdrawn").as_ref()),
            StatusCategory::Unknown
        );
    }

    #[test]
    fn pipeline_state_prefers_offer_over_closed() {
        assert_eq!(pipeline_state(Some(&Status::Offer)), PipelineState::Offer);
        assert_eq!(pipeline_state(Some(&Status::Rejected)), PipelineState::Closed);
        assert_eq!(pipeline_state(Some(&Status::NoResponse)), PipelineState::Closed);
        assert_eq!(pipeline_state(Some(&Status::Applied)), PipelineState::Active);
        assert_eq!(
            pipeline_state(Some(&Status::TechnicalInterview)),
            PipelineState::Active
        );
        assert_eq!(pipeline_state(None), PipelineState::Unknown);
    }

    #[test]
    fn work_style_falls_back_to_location() {
        let mut job = JobApplication {
            work_arrangement: Some("Flexible".to_string()),
            location: Some("Berlin (Hybrid)".to_string()),
            ..Default::default()
        };
        assert_eq!(work_style(&job), WorkStyle::Hybrid);

        job.work_arrangement = Some("REMOTE".to_string());
        assert_eq!(work_style(&job), WorkStyle::Remote);

        job.work_arrangement = Some("onsite".to_string());
        assert_eq!(work_style(&job), WorkStyle::OnSite);

        assert_eq!(work_style(&JobApplication::default()), WorkStyle::Unspecified);
    }

    #[test]
    fn starred_uses_flag_then_priority() {
        let mut job = JobApplication::default();
        assert!(!is_starred(&job));

        job.priority = Some(" Dream Job ".to_string());
        assert!(is_starred(&job));

        job.priority = Some("medium".to_string());
        assert!(!is_starred(&job));

        job.collection = true;
        assert!(is_starred(&job));
    }

    #[test]
    fn response_days_require_a_reply_and_both_dates() {
        let mut job = record("Rejected");
        job.date_applied = Some(at(2024, 1, 1));
        job.last_status_update = Some(at(2024, 1, 5));
        assert_eq!(response_elapsed_days(&job), Some(4.0));
        assert_eq!(offer_elapsed_days(&job), None);

        let mut applied = job.clone();
        applied.status = Some(Status::Applied);
        assert_eq!(response_elapsed_days(&applied), None);

        let mut undated = job.clone();
        undated.last_status_update = None;
        assert_eq!(response_elapsed_days(&undated), None);

        let mut backwards = job.clone();
        backwards.last_status_update = Some(at(2023, 12, 25));
        assert_eq!(response_elapsed_days(&backwards), None);
    }

    #[test]
    fn offer_days_only_for_offers() {
        let mut job = record("Offer");
        job.date_applied = Some(at(2024, 1, 1));
        job.last_status_update = Some(at(2024, 1, 10));
        assert_eq!(offer_elapsed_days(&job), Some(9.0));
        assert_eq!(response_elapsed_days(&job), Some(9.0));
    }

    #[test]
    fn parses_delimited_skill_text() {
        let raw = TechnicalDetails::Text("React, node.js; AWS\n123456789".to_string());
        assert_eq!(parse_skills(&raw), vec!["React", "Node.js", "Aws"]);
    }

    #[test]
    fn normalizes_listed_skills() {
        let raw = TechnicalDetails::List(vec![
            "machine_learning".to_string(),
            "  ci-cd  pipelines ".to_string(),
            String::new(),
            "a".repeat(40),
            "req 4821937".to_string(),
            "python3".to_string(),
        ]);
        assert_eq!(
            parse_skills(&raw),
            vec!["Machine Learning", "Ci Cd Pipelines", "Python3"]
        );
    }
}
