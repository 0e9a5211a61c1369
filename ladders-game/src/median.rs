//! Median of a frequency histogram without expanding it into samples.
//!
//! Uses the same "mean of middle two" convention as a sorted-sample median,
//! but walks the distinct keys once, so the cost depends on the number of
//! distinct trial lengths rather than the number of trials.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers::{u32_to_f64, u64_to_f64};
use crate::result::Histogram;

/// Which median to report when the multiset has an even size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianMode {
    /// Mean of the two middle values.
    #[default]
    MeanOfMiddle,
    /// The larger middle value; always a member of the multiset.
    High,
    /// The smaller middle value; always a member of the multiset.
    Low,
}

/// Errors raised by median requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MedianError {
    #[error("only one of the high and low median modes may be requested")]
    ConflictingModes,
    #[error("cannot calculate the median of an empty histogram")]
    Empty,
}

impl MedianMode {
    /// Resolve a pair of high/low flags into a mode.
    ///
    /// # Errors
    ///
    /// Returns `MedianError::ConflictingModes` when both flags are set.
    pub fn from_flags(high: bool, low: bool) -> Result<Self, MedianError> {
        match (high, low) {
            (true, true) => Err(MedianError::ConflictingModes),
            (true, false) => Ok(Self::High),
            (false, true) => Ok(Self::Low),
            (false, false) => Ok(Self::MeanOfMiddle),
        }
    }
}

/// Median of the multiset described by `histogram`.
///
/// # Errors
///
/// Returns `MedianError::Empty` if the histogram holds no observations.
pub fn median(histogram: &Histogram, mode: MedianMode) -> Result<f64, MedianError> {
    let total: u64 = histogram.values().sum();
    if total == 0 {
        return Err(MedianError::Empty);
    }

    // 1-based ranks of the middle element(s): equal for odd totals.
    let lower_pos = total.div_ceil(2);
    let upper_pos = total / 2 + 1;

    let mut lower_value = None;
    let mut upper_value = None;
    let mut cumulative = 0u64;
    for (&key, &count) in histogram {
        cumulative += count;
        if lower_value.is_none() && cumulative >= lower_pos {
            lower_value = Some(key);
        }
        if cumulative >= upper_pos {
            upper_value = Some(key);
            break;
        }
    }

    let (Some(lower), Some(upper)) = (lower_value, upper_value) else {
        return Err(MedianError::Empty);
    };

    if lower_pos == upper_pos {
        return Ok(u32_to_f64(lower));
    }
    Ok(match mode {
        MedianMode::High => u32_to_f64(upper),
        MedianMode::Low => u32_to_f64(lower),
        MedianMode::MeanOfMiddle => (u32_to_f64(lower) + u32_to_f64(upper)) / 2.0,
    })
}

/// Fraction of trials falling at each length, in ascending length order.
#[must_use]
pub fn frequencies(histogram: &Histogram) -> Vec<(u32, f64)> {
    let total = u64_to_f64(histogram.values().sum());
    if total <= 0.0 {
        return Vec::new();
    }
    histogram
        .iter()
        .map(|(&len, &count)| (len, u64_to_f64(count) / total))
        .collect()
}
