//! Resolve command-line flags and the optional config file into one run.

use anyhow::{Context, Result, bail};
use ladders_game::constants::DEFAULT_TIME_BUDGET;
use ladders_game::{AdaptiveScheduler, Board, MedianMode, RunConfig, SeedPlan, Workload};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::cli::Args;

/// Which structured report, if any, follows the console summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

/// Everything needed to run and report one benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub workers: usize,
    pub workload: Workload,
    pub seeds: SeedPlan,
    pub median: MedianMode,
    pub report: Option<ReportFormat>,
}

impl RunPlan {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(jobs) = args.jobs {
            config.workers = if jobs == 0 { available_cores() } else { jobs };
        }
        if let Some(floor) = args.floor {
            config.floor = floor;
        }
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        if let Some(median) = args.median {
            config.median = median.into();
        }
        config.validate().context("invalid run configuration")?;

        let workload = match (args.games, args.seconds) {
            (Some(_), Some(_)) => bail!("choose either a game count or a time budget"),
            (Some(games), None) => Workload::Games(games),
            (None, seconds) => {
                let budget = match seconds {
                    Some(secs) => Duration::try_from_secs_f64(secs)
                        .with_context(|| format!("unusable time budget: {secs} seconds"))?,
                    None => DEFAULT_TIME_BUDGET,
                };
                Workload::Timed(AdaptiveScheduler::new(budget).with_floor(config.floor))
            }
        };

        let report = if args.json {
            Some(ReportFormat::Json)
        } else if args.csv {
            Some(ReportFormat::Csv)
        } else {
            None
        };

        Ok(Self {
            workers: config.workers,
            workload,
            seeds: config.seed_plan(),
            median: config.median,
            report,
        })
    }
}

fn available_cores() -> usize {
    thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    RunConfig::from_json(&raw).with_context(|| format!("failed to load config {}", path.display()))
}

/// The standard board unless an alternate one is supplied.
pub fn load_board(path: Option<&Path>) -> Result<Board> {
    let Some(path) = path else {
        return Ok(Board::standard().clone());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read board {}", path.display()))?;
    let board =
        Board::from_json(&raw).with_context(|| format!("failed to load board {}", path.display()))?;
    log::info!(
        "loaded board {} with {} ladders and {} snakes",
        path.display(),
        board.ladder_count(),
        board.snake_count()
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ladders-plan-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ladders-bench").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_ten_second_single_worker_run() {
        let plan = RunPlan::resolve(&parse(&[])).unwrap();
        assert_eq!(plan.workers, 1);
        assert_eq!(
            plan.workload,
            Workload::Timed(AdaptiveScheduler::new(Duration::from_secs(10)))
        );
        assert_eq!(plan.seeds, SeedPlan::Entropy);
        assert_eq!(plan.median, MedianMode::High);
        assert_eq!(plan.report, None);
    }

    #[test]
    fn flags_select_games_workers_and_report() {
        let plan = RunPlan::resolve(&parse(&["-n", "500", "-j", "3", "--seed", "9", "--csv"])).unwrap();
        assert_eq!(plan.workers, 3);
        assert_eq!(plan.workload, Workload::Games(500));
        assert_eq!(plan.seeds, SeedPlan::Fixed(9));
        assert_eq!(plan.report, Some(ReportFormat::Csv));
    }

    #[test]
    fn bare_jobs_uses_every_core() {
        let plan = RunPlan::resolve(&parse(&["-j"])).unwrap();
        assert_eq!(plan.workers, available_cores());
    }

    #[test]
    fn flags_override_config_file() {
        let path = temp_file("override", r#"{"workers": 6, "floor": 20, "median": "low"}"#);
        let path_str = path.to_str().unwrap();
        let plan = RunPlan::resolve(&parse(&["--config", path_str, "-s", "1"])).unwrap();
        assert_eq!(plan.workers, 6);
        assert_eq!(plan.median, MedianMode::Low);
        assert_eq!(
            plan.workload,
            Workload::Timed(AdaptiveScheduler::new(Duration::from_secs(1)).with_floor(20))
        );

        let plan =
            RunPlan::resolve(&parse(&["--config", path_str, "-j", "2", "--median", "mean"])).unwrap();
        assert_eq!(plan.workers, 2);
        assert_eq!(plan.median, MedianMode::MeanOfMiddle);
    }

    #[test]
    fn invalid_config_is_reported() {
        let path = temp_file("invalid", r#"{"workers": 0}"#);
        let err = RunPlan::resolve(&parse(&["--config", path.to_str().unwrap()])).unwrap_err();
        assert!(format!("{err:#}").contains("workers must be at least 1"));
        let err = RunPlan::resolve(&parse(&["--floor", "0"])).unwrap_err();
        assert!(format!("{err:#}").contains("floor"));
    }

    #[test]
    fn boards_load_from_json_or_default() {
        assert_eq!(&load_board(None).unwrap(), Board::standard());
        let path = temp_file("board", r#"{"overrides": {"2": 40}}"#);
        let board = load_board(Some(&path)).unwrap();
        assert_eq!(board.remap(2), 40);
        let bad = temp_file("bad-board", r#"{"overrides": {"100": 2}}"#);
        assert!(load_board(Some(&bad)).is_err());
        assert!(load_board(Some(Path::new("/definitely/missing/board.json"))).is_err());
    }
}
