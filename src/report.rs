use std::fmt::Write;

use crate::config::AnalyticsConfig;
use crate::grouping::Axis;
use crate::metrics::{format_metric_value, Metric};
use crate::models::{JobApplication, SeriesPoint};
use crate::series::{build_axis_series_for, build_per_month_series};
use crate::summary::{summarize, summary_cards, timing_summary};

pub fn build_report(
    records: &[&JobApplication],
    scope_label: &str,
    config: &AnalyticsConfig,
) -> String {
    let summary = summarize(records, config.today, config.week_start);
    let timing = timing_summary(records);

    let mut output = String::new();

    let _ = writeln!(output, "# Job Application Report");
    let _ = writeln!(
        output,
        "Generated for {} (as of {})",
        scope_label, config.today
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Headline Numbers");
    for card in summary_cards(&summary, &timing) {
        let _ = writeln!(output, "- {}: {} ({})", card.label, card.value, card.description);
    }

    write_section(
        &mut output,
        "Status Mix",
        &build_axis_series_for(records, Axis::Status, Metric::Count, config.week_start),
        "No applications recorded.",
    );
    write_section(
        &mut output,
        "Pipeline",
        &build_axis_series_for(records, Axis::PipelineState, Metric::Count, config.week_start),
        "No applications recorded.",
    );
    write_section(
        &mut output,
        "Work Styles",
        &build_axis_series_for(records, Axis::WorkStyle, Metric::ResponseRate, config.week_start),
        "No applications recorded.",
    );
    write_section(
        &mut output,
        "Monthly Activity",
        &build_per_month_series(records),
        "No dated applications recorded.",
    );
    write_section(
        &mut output,
        "Top Companies",
        &build_axis_series_for(records, Axis::Company, Metric::Count, config.week_start),
        "No companies recorded.",
    );
    write_section(
        &mut output,
        "Top Skills",
        &build_axis_series_for(records, Axis::Keyword, Metric::Count, config.week_start),
        "No skills recorded.",
    );
    write_section(
        &mut output,
        "Response Timing",
        &build_axis_series_for(records, Axis::ResponseTime, Metric::Count, config.week_start),
        "No responses with usable dates recorded.",
    );

    if timing.responded_count > 0 {
        let _ = writeln!(
            output,
            "Fastest reply {}, slowest {} across {} responses.",
            format_metric_value(Metric::AverageResponseTime, timing.fastest_response_days),
            format_metric_value(Metric::AverageResponseTime, timing.slowest_response_days),
            timing.responded_count
        );
    }

    output
}

fn write_section(output: &mut String, title: &str, series: &[SeriesPoint], empty: &str) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");

    if series.is_empty() {
        let _ = writeln!(output, "{empty}");
        return;
    }

    for point in series {
        let _ = writeln!(output, "- {}: {}", point.label, point.display_value);
    }
}
