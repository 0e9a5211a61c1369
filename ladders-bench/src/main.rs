mod cli;
mod output;
mod plan;
mod reports;

use anyhow::{Context, Result};
use clap::Parser;
use ladders_game::constants::DEBUG_ENV_VAR;
use ladders_game::{Board, ResultAggregate, run_parallel};
use std::io::{Write, stderr};

use cli::Args;
use output::ReportTarget;
use plan::{ReportFormat, RunPlan, load_board};
use reports::{JsonReport, write_banner, write_csv_report, write_json_report, write_summary};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let plan = RunPlan::resolve(&args)?;
    let board = load_board(args.board.as_deref())?;

    // Summaries go to stderr so stdout stays clean for reports. Worker
    // threads log to stderr too, so the handle must stay unlocked while
    // they run.
    let mut console = stderr();
    write_banner(&mut console, &plan)?;

    let result = run(&board, &plan)?;
    write_summary(&mut console, &result, &plan)?;
    console.flush()?;

    write_report(&args, &plan, &result)
}

fn init_logging(verbose: bool) {
    let forced = verbose || std::env::var_os(DEBUG_ENV_VAR).is_some();
    let default_filter = if forced { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(board: &Board, plan: &RunPlan) -> Result<ResultAggregate> {
    run_parallel(board, plan.workers, plan.workload, plan.seeds).context("benchmark run failed")
}

fn write_report(args: &Args, plan: &RunPlan, result: &ResultAggregate) -> Result<()> {
    let Some(format) = plan.report else {
        return Ok(());
    };
    let mut target = ReportTarget::open(args.output.as_deref())?;
    match format {
        ReportFormat::Json => write_json_report(&mut target, &JsonReport::new(result, plan))?,
        ReportFormat::Csv => write_csv_report(&mut target, &result.histogram)?,
    }
    target
        .flush()
        .with_context(|| format!("failed to write report to {}", target.describe()))?;
    log::info!("{format:?} report written to {}", target.describe());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "ladders-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ladders-bench").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn run_plays_the_requested_games() {
        let plan = RunPlan::resolve(&args(&["-n", "200", "-j", "2", "--seed", "3"])).unwrap();
        let result = run(Board::standard(), &plan).unwrap();
        assert_eq!(result.total_trials, 400);
    }

    #[test]
    fn write_report_is_silent_without_a_format() {
        let path = temp_path("none.json");
        let _ = std::fs::remove_file(&path);
        let argv = args(&["-n", "5", "--output", path.to_str().unwrap()]);
        let plan = RunPlan::resolve(&argv).unwrap();
        write_report(&argv, &plan, &ResultAggregate::identity()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn write_report_emits_json_file() {
        let path = temp_path("report.json");
        let argv = args(&["-n", "50", "--seed", "11", "--json", "--output", path.to_str().unwrap()]);
        let plan = RunPlan::resolve(&argv).unwrap();
        let result = run(Board::standard(), &plan).unwrap();
        write_report(&argv, &plan, &result).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["num_games"], 50);
        assert!(value["counts"].is_object());
    }

    #[test]
    fn write_report_emits_csv_file() {
        let path = temp_path("report.csv");
        let argv = args(&["-n", "50", "--csv", "--output", path.to_str().unwrap()]);
        let plan = RunPlan::resolve(&argv).unwrap();
        let result = run(Board::standard(), &plan).unwrap();
        write_report(&argv, &plan, &result).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("length,count,percentage"));
    }
}
