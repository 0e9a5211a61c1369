//! Snakes and ladders benchmark engine.
//!
//! Plays very large numbers of solo games and reduces them to combinable
//! statistics: a histogram of game lengths, the shortest and longest games,
//! elapsed time, and an exact median computed from the histogram. This crate
//! has no I/O; the `ladders-bench` binary provides the command line and
//! reports.

pub mod board;
pub mod config;
pub mod constants;
pub mod game;
pub mod median;
pub mod numbers;
pub mod parallel;
pub mod result;
pub mod runner;
pub mod seed;
pub mod series;

// Re-export commonly used types
pub use board::{Board, BoardError, BoardSpec};
pub use config::{ConfigError, RunConfig};
pub use game::{Move, Trial, play, roll_die};
pub use median::{MedianError, MedianMode, frequencies, median};
pub use parallel::{ParallelError, Workload, run_parallel, run_workers};
pub use result::{Histogram, ResultAggregate, combine};
pub use runner::{AdaptiveScheduler, run_fixed, run_timed};
pub use seed::{SeedPlan, derive_worker_seed, worker_rng};
pub use series::CurrencySeries;
