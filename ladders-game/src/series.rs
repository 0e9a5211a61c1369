//! Readable, roughly exponential batch sizes: 1, 2, 5, 10, 20, 50, 100, ...
//!
//! Grows a little faster than powers of two, reaching one million after 19
//! values rather than 20.

const STEPS: [u64; 3] = [1, 2, 5];

/// Lazy iterator over `{1, 2, 5} x 10^k`, optionally skipping values below a
/// floor. Ends instead of overflowing `u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySeries {
    multiplier: Option<u64>,
    index: usize,
    floor: u64,
}

impl CurrencySeries {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            multiplier: Some(1),
            index: 0,
            floor: 0,
        }
    }

    /// Start the series at the first value not below `floor`.
    #[must_use]
    pub const fn starting_at(floor: u64) -> Self {
        Self {
            multiplier: Some(1),
            index: 0,
            floor,
        }
    }

    fn next_raw(&mut self) -> Option<u64> {
        let multiplier = self.multiplier?;
        let value = STEPS[self.index].checked_mul(multiplier)?;
        self.index += 1;
        if self.index == STEPS.len() {
            self.index = 0;
            self.multiplier = multiplier.checked_mul(10);
        }
        Some(value)
    }
}

impl Default for CurrencySeries {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for CurrencySeries {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let value = self.next_raw()?;
            if value >= self.floor {
                return Some(value);
            }
        }
    }
}
