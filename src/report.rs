use owo_colors::{OwoColorize, Stream, Style};

use crate::types::WorkloadReport;

fn style_label() -> Style {
    Style::new().green()
}

fn style_mean() -> Style {
    Style::new().yellow()
}

/// Format a mean latency in seconds for terminal output.
pub fn format_mean_secs(mean_secs: f64) -> String {
    format!("{:.6}s", mean_secs)
}

/// Aligned per-workload summary with header, one line per workload.
pub fn format_reports(reports: &[WorkloadReport]) -> String {
    let mut out = String::new();

    let header = "Average latency per workload:";
    out.push_str(
        &header
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );
    out.push('\n');

    let max_label_width = reports.iter().map(|r| r.label.len()).max().unwrap_or(0);

    let label_style = style_label();
    let mean_style = style_mean();

    for report in reports {
        let label_padded = format!("{:<width$}", report.label, width = max_label_width);
        let label_colored = label_padded
            .if_supports_color(Stream::Stdout, |s| s.style(label_style))
            .to_string();

        let mean_colored = format_mean_secs(report.mean_secs)
            .if_supports_color(Stream::Stdout, |s| s.style(mean_style))
            .to_string();

        let iterations = format!("({} samples)", report.iterations);
        let iterations_colored = iterations
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string();

        out.push_str(&format!(
            "  {}  {}  {}\n",
            label_colored, mean_colored, iterations_colored
        ));
    }

    out
}

/// JSON output format: a pretty-printed array of workload reports.
pub fn format_json(reports: &[WorkloadReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}
