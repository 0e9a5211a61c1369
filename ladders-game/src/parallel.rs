//! Fan a benchmark out across independent worker threads and merge the
//! results.
//!
//! Workers share nothing mutable: the board is read-only and each worker owns
//! its RNG stream and its aggregate. The coordinator blocks until every
//! worker has finished, then folds the aggregates with `combine`.

use std::any::Any;
use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::board::Board;
use crate::result::ResultAggregate;
use crate::runner::{AdaptiveScheduler, run_fixed};
use crate::seed::{SeedPlan, worker_rng};

/// What each worker plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// A fixed number of games per worker.
    Games(u64),
    /// Play in growing batches until the budget is spent.
    Timed(AdaptiveScheduler),
}

impl Workload {
    /// Timed workload with the default batch floor.
    #[must_use]
    pub const fn timed(budget: Duration) -> Self {
        Self::Timed(AdaptiveScheduler::new(budget))
    }

    /// Run this workload on the calling thread.
    pub fn run<R: rand::RngCore + ?Sized>(&self, board: &Board, rng: &mut R) -> ResultAggregate {
        match self {
            Self::Games(count) => run_fixed(board, rng, *count),
            Self::Timed(scheduler) => scheduler.run(board, rng),
        }
    }
}

/// Errors that abort a parallel run. No partial result is returned.
#[derive(Debug, Error)]
pub enum ParallelError {
    #[error("at least one worker is required")]
    NoWorkers,
    #[error("failed to spawn worker {worker}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

/// Run `job` once per worker on its own thread and combine the results.
///
/// `job` receives the worker index. Any worker failure fails the whole run.
///
/// # Errors
///
/// Returns `ParallelError` if `workers` is zero, a thread cannot be spawned,
/// or any worker panics.
pub fn run_workers<F>(workers: usize, job: F) -> Result<ResultAggregate, ParallelError>
where
    F: Fn(usize) -> ResultAggregate + Sync,
{
    if workers == 0 {
        return Err(ParallelError::NoWorkers);
    }

    let (spawn_error, outcomes) = thread::scope(|scope| {
        let job = &job;
        let mut handles = Vec::with_capacity(workers);
        let mut spawn_error = None;
        for index in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("ladders-worker-{index}"))
                .spawn_scoped(scope, move || job(index));
            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    spawn_error = Some(ParallelError::Spawn {
                        worker: index,
                        source,
                    });
                    break;
                }
            }
        }

        let outcomes: Vec<Result<ResultAggregate, ParallelError>> = handles
            .into_iter()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .map_err(|payload| ParallelError::WorkerPanicked {
                        worker,
                        message: panic_message(payload.as_ref()),
                    })
            })
            .collect();
        (spawn_error, outcomes)
    });

    if let Some(err) = spawn_error {
        return Err(err);
    }
    outcomes.into_iter().collect()
}

/// Play `workload` on `workers` threads, each with its own seeded stream.
///
/// # Errors
///
/// See [`run_workers`].
pub fn run_parallel(
    board: &Board,
    workers: usize,
    workload: Workload,
    seeds: SeedPlan,
) -> Result<ResultAggregate, ParallelError> {
    let worker_seeds = seeds.worker_seeds(workers);
    log::info!("starting {workers} worker(s) with {workload:?}");
    let result = run_workers(workers, |index| {
        let mut rng = worker_rng(worker_seeds[index]);
        let result = workload.run(board, &mut rng);
        log::debug!(
            "worker {index} finished {} trials in {:?}",
            result.total_trials,
            result.elapsed
        );
        result
    })?;
    log::info!(
        "{} trials across {workers} worker(s), {:?} cpu time",
        result.total_trials,
        result.elapsed
    );
    Ok(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;
    use crate::result::Histogram;

    #[test]
    fn zero_workers_is_rejected() {
        let err = run_workers(0, |_| ResultAggregate::identity()).unwrap_err();
        assert!(matches!(err, ParallelError::NoWorkers));
    }

    #[test]
    fn worker_results_are_combined() {
        let result = run_workers(4, |index| {
            let mut agg = ResultAggregate::identity();
            let len = u8::try_from(index + 10).unwrap();
            agg.record((1..=len).map(|i| Move::new(1, i)).collect());
            agg.elapsed = Duration::from_millis(5);
            agg
        })
        .unwrap();
        assert_eq!(result.total_trials, 4);
        assert_eq!(
            result.histogram,
            Histogram::from([(10, 1), (11, 1), (12, 1), (13, 1)])
        );
        assert_eq!(result.elapsed, Duration::from_millis(20));
        assert_eq!(result.shortest_len(), Some(10));
        assert_eq!(result.longest_len(), Some(13));
    }

    #[test]
    fn a_failed_worker_fails_the_run() {
        let err = run_workers(3, |index| {
            assert!(index != 1, "worker exploded");
            ResultAggregate::identity()
        })
        .unwrap_err();
        match err {
            ParallelError::WorkerPanicked { worker, message } => {
                assert_eq!(worker, 1);
                assert!(message.contains("worker exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fixed_games_run_on_every_worker() {
        let result =
            run_parallel(Board::standard(), 3, Workload::Games(250), SeedPlan::Fixed(42)).unwrap();
        assert_eq!(result.total_trials, 750);
        assert_eq!(result.histogram.values().sum::<u64>(), 750);
    }

    #[test]
    fn seeded_runs_reproduce_histograms() {
        let first =
            run_parallel(Board::standard(), 2, Workload::Games(300), SeedPlan::Fixed(7)).unwrap();
        let second =
            run_parallel(Board::standard(), 2, Workload::Games(300), SeedPlan::Fixed(7)).unwrap();
        assert_eq!(first.histogram, second.histogram);
        assert_eq!(first.shortest, second.shortest);
        assert_eq!(first.longest, second.longest);
    }

    #[test]
    fn timed_workload_respects_floor_per_worker() {
        let workload = Workload::Timed(AdaptiveScheduler::new(Duration::ZERO).with_floor(50));
        let result = run_parallel(Board::standard(), 2, workload, SeedPlan::Entropy).unwrap();
        assert_eq!(result.total_trials, 100);
    }

    #[test]
    fn timed_constructor_uses_default_floor() {
        let workload = Workload::timed(Duration::from_secs(3));
        assert_eq!(
            workload,
            Workload::Timed(AdaptiveScheduler::new(Duration::from_secs(3)))
        );
        let mut rng = worker_rng(1);
        assert_eq!(
            Workload::Games(12).run(Board::standard(), &mut rng).total_trials,
            12
        );
    }
}
