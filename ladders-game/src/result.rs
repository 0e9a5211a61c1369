//! Combinable benchmark results.
//!
//! A `ResultAggregate` is computed independently per batch or worker and
//! merged with [`combine`]. The merge is associative and commutative with
//! [`ResultAggregate::identity`] as its unit, so partial results can be
//! folded in any order or grouping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::game::Trial;
use crate::numbers::{len_to_u32, u32_to_f64, u64_to_f64};

/// Trial length mapped to the number of trials of that length.
pub type Histogram = BTreeMap<u32, u64>;

/// Statistics for a run of trials, without the trials themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultAggregate {
    /// Trial length against number of trials.
    pub histogram: Histogram,
    /// Time spent playing, summed across workers.
    pub elapsed: Duration,
    pub total_trials: u64,
    /// Full history of the shortest trial, `None` until one is recorded.
    pub shortest: Option<Trial>,
    /// As per `shortest`, for the longest trial.
    pub longest: Option<Trial>,
}

impl ResultAggregate {
    /// The unit of [`combine`]: no trials, no time.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Fold a single finished trial into the statistics.
    pub fn record(&mut self, trial: Trial) {
        let len = trial.len();
        *self.histogram.entry(len_to_u32(len)).or_insert(0) += 1;
        self.total_trials += 1;

        let is_shortest = self.shortest.as_ref().is_none_or(|s| len < s.len());
        let is_longest = self.longest.as_ref().is_none_or(|l| len > l.len());
        match (is_shortest, is_longest) {
            (true, true) => {
                self.shortest = Some(trial.clone());
                self.longest = Some(trial);
            }
            (true, false) => self.shortest = Some(trial),
            (false, true) => self.longest = Some(trial),
            (false, false) => {}
        }
    }

    #[must_use]
    pub fn shortest_len(&self) -> Option<usize> {
        self.shortest.as_ref().map(Trial::len)
    }

    #[must_use]
    pub fn longest_len(&self) -> Option<usize> {
        self.longest.as_ref().map(Trial::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_trials == 0
    }

    /// Mean trial length, `None` when nothing was played.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        let total: u64 = self.histogram.values().sum();
        if total == 0 {
            return None;
        }
        let weighted: f64 = self
            .histogram
            .iter()
            .map(|(&len, &count)| u32_to_f64(len) * u64_to_f64(count))
            .sum();
        Some(weighted / u64_to_f64(total))
    }

    /// Most frequent trial length; the shorter length wins a tie.
    #[must_use]
    pub fn mode(&self) -> Option<u32> {
        let mut best: Option<(u32, u64)> = None;
        for (&len, &count) in &self.histogram {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((len, count));
            }
        }
        best.map(|(len, _)| len)
    }

    /// Approximate wall-clock time, assuming `workers` ran concurrently.
    #[must_use]
    pub fn wall_clock(&self, workers: usize) -> Duration {
        let divisor = u32::try_from(workers.max(1)).unwrap_or(u32::MAX);
        self.elapsed / divisor
    }

    /// Trials per wall-clock second, `None` if no time was recorded.
    #[must_use]
    pub fn rate(&self, workers: usize) -> Option<f64> {
        let seconds = self.wall_clock(workers).as_secs_f64();
        (seconds > 0.0).then(|| u64_to_f64(self.total_trials) / seconds)
    }
}

/// Merge two aggregates into a new one.
///
/// Histograms add pointwise, elapsed times and totals add, and the shortest
/// and longest trials are chosen by move count. An unset shortest trial never
/// beats a real one. Among equal-length trials the left operand is kept.
#[must_use]
pub fn combine(a: ResultAggregate, b: ResultAggregate) -> ResultAggregate {
    let (mut histogram, other) = if a.histogram.len() >= b.histogram.len() {
        (a.histogram, b.histogram)
    } else {
        (b.histogram, a.histogram)
    };
    for (len, count) in other {
        *histogram.entry(len).or_insert(0) += count;
    }

    ResultAggregate {
        histogram,
        elapsed: a.elapsed.saturating_add(b.elapsed),
        total_trials: a.total_trials + b.total_trials,
        shortest: pick_shortest(a.shortest, b.shortest),
        longest: pick_longest(a.longest, b.longest),
    }
}

fn pick_shortest(a: Option<Trial>, b: Option<Trial>) -> Option<Trial> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.len() < a.len() { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn pick_longest(a: Option<Trial>, b: Option<Trial>) -> Option<Trial> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.len() > a.len() { b } else { a }),
        (a, b) => a.or(b),
    }
}

impl FromIterator<ResultAggregate> for ResultAggregate {
    fn from_iter<I: IntoIterator<Item = ResultAggregate>>(iter: I) -> Self {
        iter.into_iter().fold(Self::identity(), combine)
    }
}
