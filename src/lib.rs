//! Analytics for a personal job-application tracker.
//!
//! Everything below [`ingest`] is pure: records go in, groups, metrics,
//! series and summaries come out. Missing or malformed per-record data is
//! excluded from the computation that needs it instead of failing.

pub mod classify;
pub mod config;
pub mod dates;
pub mod grouping;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod report;
pub mod scope;
pub mod series;
pub mod summary;

pub use config::AnalyticsConfig;
pub use dates::WeekStart;
pub use grouping::{group_by_axis, Axis};
pub use metrics::{compute_metric, Metric};
pub use models::{Group, JobApplication, SeriesPoint, Summary, SummaryCard, TimingSummary};
pub use scope::Scope;
