use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use fnbench::chart::BarChart;
use fnbench::errors::FnbenchError;
use fnbench::invoke::{self, FunctionClient};
use fnbench::report;
use fnbench::stats;
use fnbench::types::{WorkloadReport, default_workloads};

const CHART_TITLE: &str = "Function Execution Time";
const CHART_X_LABEL: &str = "Functions";
const CHART_Y_LABEL: &str = "seconds";

#[derive(Parser)]
#[command(
    name = "fnbench",
    version,
    about = "Measure HTTP-triggered function latency and chart the averages"
)]
struct Cli {
    /// Invocations per workload
    #[arg(short, long, default_value_t = 5)]
    iterations: usize,

    /// Output path for the bar chart
    #[arg(long, default_value = "light_function.png")]
    output: PathBuf,

    #[arg(long)]
    json: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Keep stdout machine-readable under --json.
    if !cli.json {
        println!("Starting...");
    }

    let client = FunctionClient::new();
    let mut reports = Vec::new();

    for workload in &default_workloads() {
        let samples = invoke::sample_workload(&client, workload, cli.iterations)?;
        let mean = stats::mean_secs(&samples).ok_or_else(|| FnbenchError::EmptySamples {
            label: workload.label.clone(),
        })?;
        reports.push(WorkloadReport::new(
            workload.label.clone(),
            samples.len(),
            mean,
        ));
    }

    let mut chart = BarChart::new(CHART_TITLE, CHART_X_LABEL, CHART_Y_LABEL);
    for report in &reports {
        chart.add_bar(report.label.clone(), report.mean_secs);
    }
    chart.save_png(&cli.output)?;

    let output = if cli.json {
        report::format_json(&reports)
    } else {
        report::format_reports(&reports)
    };
    print!("{}", output);

    if !cli.json {
        println!("Done!");
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
