//! Single-worker benchmark loops: a fixed number of trials, or as many as
//! fit a time budget.

use rand::RngCore;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::constants::DEFAULT_TIMED_FLOOR;
use crate::game::play;
use crate::result::{ResultAggregate, combine};
use crate::series::CurrencySeries;

/// Play exactly `count` trials, timing the batch as a whole.
///
/// A count of zero returns the identity aggregate without touching the
/// simulator or the clock.
pub fn run_fixed<R: RngCore + ?Sized>(board: &Board, rng: &mut R, count: u64) -> ResultAggregate {
    let mut result = ResultAggregate::identity();
    if count == 0 {
        return result;
    }

    let start = Instant::now();
    for _ in 0..count {
        result.record(play(board, rng));
    }
    result.elapsed = start.elapsed();
    result
}

/// Keep playing in growing batches until the accumulated play time exceeds
/// a budget.
///
/// Cumulative trial counts follow the currency series (100, 200, 500, ...),
/// so the final total is always a round number and the clock is read once
/// per batch rather than once per trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveScheduler {
    budget: Duration,
    floor: u64,
}

impl AdaptiveScheduler {
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self {
            budget,
            floor: DEFAULT_TIMED_FLOOR,
        }
    }

    /// Smallest cumulative total; values below 100 mostly measure the timer.
    #[must_use]
    pub const fn with_floor(mut self, floor: u64) -> Self {
        self.floor = if floor == 0 { 1 } else { floor };
        self
    }

    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    #[must_use]
    pub const fn floor(&self) -> u64 {
        self.floor
    }

    /// Run batches until the budget is spent. The first batch always runs,
    /// even if it alone exceeds the budget.
    pub fn run<R: RngCore + ?Sized>(&self, board: &Board, rng: &mut R) -> ResultAggregate {
        let mut previous = ResultAggregate::identity();
        for target in CurrencySeries::starting_at(self.floor) {
            let delta = target.saturating_sub(previous.total_trials);
            let batch = run_fixed(board, rng, delta);
            previous = combine(previous, batch);
            log::debug!(
                "batch of {delta} trials done: {} total in {:?}",
                previous.total_trials,
                previous.elapsed
            );
            if previous.elapsed > self.budget {
                break;
            }
        }
        previous
    }
}

/// Play for at least `budget`, starting from the default floor.
pub fn run_timed<R: RngCore + ?Sized>(
    board: &Board,
    rng: &mut R,
    budget: Duration,
) -> ResultAggregate {
    AdaptiveScheduler::new(budget).run(board, rng)
}
