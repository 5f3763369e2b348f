use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::dates::parse_date_value;
use crate::models::{JobApplication, Status, TechnicalDetails};

const ID_KEYS: &[&str] = &["_id", "id"];
const DATE_APPLIED_KEYS: &[&str] = &["dateApplied", "date_applied", "appliedDate", "applied_at"];
const LAST_UPDATE_KEYS: &[&str] = &[
    "lastStatusUpdate",
    "last_status_update",
    "statusUpdatedAt",
    "updatedAt",
];
const WORK_ARRANGEMENT_KEYS: &[&str] = &[
    "workArrangement",
    "work_arrangement",
    "workStyle",
    "workstyle",
    "work_style",
];
const SKILL_KEYS: &[&str] = &["technicalDetails", "technical_details", "skills"];
const COLLECTION_KEYS: &[&str] = &[
    "isCollection",
    "collection",
    "starred",
    "isStarred",
    "favorite",
    "isFavorite",
];

/// Loads a snapshot of applications. `.csv` files are read as CSV with a
/// header row; anything else is parsed as JSON.
pub fn load_applications(path: &Path) -> anyhow::Result<Vec<JobApplication>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let applications = if is_csv {
        read_csv(path)?
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_json(&text).with_context(|| format!("failed to parse {}", path.display()))?
    };

    info!(
        count = applications.len(),
        path = %path.display(),
        "loaded applications"
    );
    Ok(applications)
}

/// Accepts a bare array or an object wrapping an `applications` array.
pub fn parse_json(text: &str) -> anyhow::Result<Vec<JobApplication>> {
    let document: Value = serde_json::from_str(text)?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("applications") {
            Some(Value::Array(entries)) => entries,
            _ => bail!("expected an array of applications or an `applications` field"),
        },
        _ => bail!("expected an array of applications"),
    };

    let mut applications = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::Object(fields) => applications.push(normalize(&fields)),
            other => warn!(position, kind = value_kind(&other), "skipping non-object entry"),
        }
    }
    Ok(applications)
}

fn read_csv(path: &Path) -> anyhow::Result<Vec<JobApplication>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let mut applications = Vec::new();

    for result in reader.records() {
        let row = result.with_context(|| format!("malformed row in {}", path.display()))?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.trim().to_string(), Value::String(value.to_string())))
            .collect();
        applications.push(normalize(&fields));
    }

    Ok(applications)
}

/// Maps one backend document onto the canonical record.
pub fn normalize(fields: &Map<String, Value>) -> JobApplication {
    let status = pick(fields, &["status"])
        .and_then(value_text)
        .and_then(|text| Status::parse(&text));

    let work_arrangement = pick(fields, WORK_ARRANGEMENT_KEYS)
        .and_then(value_text)
        .or_else(|| {
            pick(fields, &["remote"])
                .and_then(value_flag)
                .and_then(|remote| remote.then(|| "Remote".to_string()))
        });

    let collection = COLLECTION_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .any(|value| value_flag(value).unwrap_or(false));

    JobApplication {
        id: pick(fields, ID_KEYS).and_then(value_text),
        company: pick(fields, &["company"]).and_then(value_text),
        position: pick(fields, &["position", "title"]).and_then(value_text),
        location: pick(fields, &["location"]).and_then(value_text),
        salary: pick(fields, &["salary"]).and_then(value_text),
        status,
        date_applied: date_field(fields, DATE_APPLIED_KEYS),
        last_status_update: date_field(fields, LAST_UPDATE_KEYS),
        priority: pick(fields, &["priority"]).and_then(value_text),
        collection,
        work_arrangement,
        technical_details: pick(fields, SKILL_KEYS).and_then(value_skills),
    }
}

/// First value among `keys` that is neither null nor a blank string.
fn pick<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        })
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        // Extended JSON exports wrap ids as {"$oid": "..."}.
        Value::Object(object) => object.get("$oid").and_then(value_text),
        _ => None,
    }
}

fn value_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn date_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<NaiveDateTime> {
    let value = pick(fields, keys)?;
    let parsed = value_date(value);
    if parsed.is_none() {
        debug!(field = keys[0], value = %value, "ignoring unparseable date");
    }
    parsed
}

fn value_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => parse_date_value(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|at| at.with_timezone(&Local).naive_local()),
        Value::Object(object) => object.get("$date").and_then(value_date),
        _ => None,
    }
}

fn value_skills(value: &Value) -> Option<TechnicalDetails> {
    match value {
        Value::String(text) if !text.trim().is_empty() => {
            Some(TechnicalDetails::Text(text.clone()))
        }
        Value::Array(items) => Some(TechnicalDetails::List(
            items.iter().filter_map(value_text).collect(),
        )),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
