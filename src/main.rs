use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobtrack_insights::config::parse_cli_date;
use jobtrack_insights::{
    ingest, report, series, summary, AnalyticsConfig, Axis, JobApplication, Metric, Scope,
    SeriesPoint, Summary, SummaryCard, TimingSummary, WeekStart,
};

#[derive(Parser)]
#[command(name = "jobtrack-insights")]
#[command(about = "Dashboard analytics for a job application tracker", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Exported applications (JSON array or CSV with a header row)
    #[arg(long, global = true, env = "JOBTRACK_INPUT", default_value = "applications.json")]
    input: PathBuf,
    /// First day of the week for weekly buckets and "this week"
    #[arg(long, global = true, value_enum, env = "JOBTRACK_WEEK_START", default_value_t = WeekStart::Monday)]
    week_start: WeekStart,
    /// Reference date for "this week" and "this month" (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_cli_date)]
    today: Option<NaiveDate>,
    /// Only applications submitted on or after this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_cli_date)]
    from: Option<NaiveDate>,
    /// Only applications submitted on or before this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_cli_date)]
    to: Option<NaiveDate>,
    /// Only starred applications
    #[arg(long, global = true)]
    starred: bool,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeriesKind {
    Day,
    Week,
    Month,
    StatusWorkStyle,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline numbers and response timing
    Summary,
    /// Group applications along an axis and compute a metric per group
    Group {
        #[arg(long, value_enum)]
        axis: Axis,
        #[arg(long, value_enum, default_value_t = Metric::Count)]
        metric: Metric,
    },
    /// One of the default dashboard series
    Series {
        #[arg(value_enum)]
        kind: SeriesKind,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct SummaryOutput {
    summary: Summary,
    timing: TimingSummary,
    cards: Vec<SummaryCard>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let config = AnalyticsConfig::new(global.week_start, global.today);
    let scope = Scope {
        from: global.from,
        to: global.to,
        starred_only: global.starred,
    };

    let applications = ingest::load_applications(&global.input)?;
    let records: Vec<&JobApplication> = if scope.is_unbounded() {
        applications.iter().collect()
    } else {
        scope.apply(&applications)
    };
    info!(
        loaded = applications.len(),
        in_scope = records.len(),
        week_start = ?config.week_start,
        "applications ready"
    );

    match cli.command {
        Commands::Summary => {
            let headline = summary::summarize(&records, config.today, config.week_start);
            let timing = summary::timing_summary(&records);
            let cards = summary::summary_cards(&headline, &timing);

            match global.format {
                OutputFormat::Json => print_json(&SummaryOutput {
                    summary: headline,
                    timing,
                    cards,
                })?,
                OutputFormat::Text => {
                    println!("Summary for {}:", scope.describe());
                    for card in cards {
                        println!("- {}: {} ({})", card.label, card.value, card.description);
                    }
                }
            }
        }
        Commands::Group { axis, metric } => {
            let effective = metric.for_axis(axis);
            if effective != metric {
                info!(?axis, ?metric, "axis only supports counts; using count");
            }
            let points =
                series::build_axis_series_for(&records, axis, effective, config.week_start);
            print_series(
                &format!("{} by {}", effective.label(), axis.label().to_lowercase()),
                &points,
                global.format,
            )?;
        }
        Commands::Series { kind } => {
            let (title, points) = build_series(kind, &records, config.week_start);
            print_series(title, &points, global.format)?;
        }
        Commands::Report { out } => {
            let markdown = report::build_report(&records, &scope.describe(), &config);
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn build_series(
    kind: SeriesKind,
    records: &[&JobApplication],
    week_start: WeekStart,
) -> (&'static str, Vec<SeriesPoint>) {
    match kind {
        SeriesKind::Day => (
            "Applications per day",
            series::build_per_day_series(records),
        ),
        SeriesKind::Week => (
            "Applications per week",
            series::build_per_week_series(records, week_start),
        ),
        SeriesKind::Month => (
            "Applications per month",
            series::build_per_month_series(records),
        ),
        SeriesKind::StatusWorkStyle => (
            "Applications by status and work style",
            series::build_status_work_style_series(records),
        ),
    }
}

fn print_series(title: &str, series: &[SeriesPoint], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&series),
        OutputFormat::Text => {
            if series.is_empty() {
                println!("No applications found for this view.");
                return Ok(());
            }
            println!("{title}:");
            for point in series {
                println!("- {}: {}", point.label, point.display_value);
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
