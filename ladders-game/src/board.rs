//! Board transition table: ladders advance, snakes retreat.
//!
//! A `Board` is immutable once built. The classic table is constructed once
//! per process and shared read-only; alternate boards are loaded from JSON
//! and validated before use.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{DIE_FACES, FINAL_SQUARE};

const TABLE_LEN: usize = FINAL_SQUARE as usize + 1;

/// Classic ladders (first nine) and snakes (last ten).
const STANDARD_OVERRIDES: [(u8, u8); 19] = [
    (1, 38),
    (4, 14),
    (9, 31),
    (21, 42),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
    (98, 78),
    (95, 75),
    (93, 73),
    (87, 24),
    (64, 60),
    (62, 19),
    (56, 53),
    (49, 11),
    (48, 26),
    (16, 6),
];

/// Errors raised when a board definition would break the game rules.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("override source {square} outside 1..={max}")]
    SourceOutOfRange { square: u32, max: u8 },
    #[error("override target {target} for square {square} outside 1..={max}")]
    TargetOutOfRange { square: u32, target: u32, max: u8 },
    #[error("square {square} is reachable but can never reach the final square")]
    Unwinnable { square: u8 },
    #[error("invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of a board: just the override map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    #[serde(default)]
    pub overrides: BTreeMap<u32, u32>,
}

/// Read-only lookup from landed square to remapped square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardSpec", into = "BoardSpec")]
pub struct Board {
    overrides: BTreeMap<u8, u8>,
    table: [u8; TABLE_LEN],
}

impl Board {
    /// The classic board, built on first use and shared for the process lifetime.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<Board> = OnceLock::new();
        STANDARD.get_or_init(|| Self::build(STANDARD_OVERRIDES.iter().copied().collect()))
    }

    /// A board with no ladders or snakes.
    #[must_use]
    pub fn plain() -> Self {
        Self::build(BTreeMap::new())
    }

    /// Build a board from raw overrides, rejecting out-of-range squares and
    /// boards on which some reachable square can never win.
    ///
    /// # Errors
    ///
    /// Returns a `BoardError` describing the first violated rule.
    pub fn from_overrides<I>(overrides: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut checked = BTreeMap::new();
        for (square, target) in overrides {
            let source = u8::try_from(square)
                .ok()
                .filter(|s| (1..FINAL_SQUARE).contains(s))
                .ok_or(BoardError::SourceOutOfRange {
                    square,
                    max: FINAL_SQUARE - 1,
                })?;
            let dest = u8::try_from(target)
                .ok()
                .filter(|t| (1..=FINAL_SQUARE).contains(t))
                .ok_or(BoardError::TargetOutOfRange {
                    square,
                    target,
                    max: FINAL_SQUARE,
                })?;
            checked.insert(source, dest);
        }
        let board = Self::build(checked);
        board.check_winnable()?;
        Ok(board)
    }

    /// Parse and validate a board from JSON such as `{"overrides": {"1": 38}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the board is invalid.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let spec: BoardSpec = serde_json::from_str(json)?;
        Self::try_from(spec)
    }

    fn build(overrides: BTreeMap<u8, u8>) -> Self {
        let mut table = [0u8; TABLE_LEN];
        for (square, slot) in (0u8..).zip(table.iter_mut()) {
            *slot = overrides.get(&square).copied().unwrap_or(square);
        }
        Self { overrides, table }
    }

    /// Where a piece landing on `square` actually ends up.
    #[inline]
    #[must_use]
    pub fn remap(&self, square: u8) -> u8 {
        self.table
            .get(usize::from(square))
            .copied()
            .unwrap_or(square)
    }

    /// Square reached from `position` with `roll`, applying the overshoot rule.
    #[inline]
    #[must_use]
    pub fn advance(&self, position: u8, roll: u8) -> u8 {
        let landed = position.saturating_add(roll);
        if landed > FINAL_SQUARE {
            position
        } else {
            self.remap(landed)
        }
    }

    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<u8, u8> {
        &self.overrides
    }

    /// Number of overrides that move the piece forward.
    #[must_use]
    pub fn ladder_count(&self) -> usize {
        self.overrides.iter().filter(|(from, to)| to > from).count()
    }

    /// Number of overrides that move the piece backward.
    #[must_use]
    pub fn snake_count(&self) -> usize {
        self.overrides.iter().filter(|(from, to)| to < from).count()
    }

    /// Every square reachable from the start must be able to reach the final
    /// square; otherwise a trial could wander forever.
    fn check_winnable(&self) -> Result<(), BoardError> {
        let mut reachable = [false; TABLE_LEN];
        let mut stack = vec![0u8];
        reachable[0] = true;
        while let Some(position) = stack.pop() {
            for next in self.successors(position) {
                let slot = &mut reachable[usize::from(next)];
                if !*slot {
                    *slot = true;
                    stack.push(next);
                }
            }
        }

        let mut winnable = [false; TABLE_LEN];
        winnable[usize::from(FINAL_SQUARE)] = true;
        let mut changed = true;
        while changed {
            changed = false;
            for position in 0..FINAL_SQUARE {
                let idx = usize::from(position);
                if reachable[idx]
                    && !winnable[idx]
                    && self
                        .successors(position)
                        .any(|next| winnable[usize::from(next)])
                {
                    winnable[idx] = true;
                    changed = true;
                }
            }
        }

        match (0..FINAL_SQUARE).find(|&p| reachable[usize::from(p)] && !winnable[usize::from(p)]) {
            Some(square) => Err(BoardError::Unwinnable { square }),
            None => Ok(()),
        }
    }

    fn successors(&self, position: u8) -> impl Iterator<Item = u8> + '_ {
        (1..=DIE_FACES).map(move |roll| self.advance(position, roll))
    }
}

impl TryFrom<BoardSpec> for Board {
    type Error = BoardError;

    fn try_from(spec: BoardSpec) -> Result<Self, Self::Error> {
        Self::from_overrides(spec.overrides)
    }
}

impl From<Board> for BoardSpec {
    fn from(board: Board) -> Self {
        Self {
            overrides: board
                .overrides
                .iter()
                .map(|(&from, &to)| (u32::from(from), u32::from(to)))
                .collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard().clone()
    }
}
