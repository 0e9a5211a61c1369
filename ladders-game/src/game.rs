//! Solo play-through of a single trial.
//!
//! Standard rules: the exact roll is needed to land on the final square, and
//! a roll that overshoots it leaves the piece where it is. The forfeited turn
//! is still recorded, so it counts toward the trial length.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Board;
use crate::constants::{DIE_FACES, FINAL_SQUARE};

/// Moves stored inline before a trial spills onto the heap. Most games are
/// well under this length.
const INLINE_MOVES: usize = 64;

/// One recorded turn: the die roll and the square the piece ended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Move {
    pub roll: u8,
    pub position: u8,
}

impl Move {
    #[must_use]
    pub const fn new(roll: u8, position: u8) -> Self {
        Self { roll, position }
    }
}

impl From<(u8, u8)> for Move {
    fn from((roll, position): (u8, u8)) -> Self {
        Self { roll, position }
    }
}

impl From<Move> for (u8, u8) {
    fn from(mv: Move) -> Self {
        (mv.roll, mv.position)
    }
}

/// Chronological move history of one complete game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trial {
    moves: SmallVec<[Move; INLINE_MOVES]>,
}

impl Trial {
    /// Number of turns taken.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Position after the last move, or the start square for an empty trial.
    #[must_use]
    pub fn final_position(&self) -> u8 {
        self.moves.last().map_or(0, |mv| mv.position)
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.final_position() == FINAL_SQUARE
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }
}

impl FromIterator<Move> for Trial {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

/// Draw one die roll in `1..=6`.
///
/// A plain modulo is used for speed; the bias over 64 bits is negligible.
#[inline]
pub fn roll_die<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
    // The remainder is below DIE_FACES, so the cast cannot truncate.
    (rng.next_u64() % u64::from(DIE_FACES)) as u8 + 1
}

/// Play one game to completion on `board`.
///
/// Terminates with probability 1 on any board accepted by
/// `Board::from_overrides`; callers supplying hand-built boards must uphold
/// the same no-absorbing-cycle precondition.
pub fn play<R: RngCore + ?Sized>(board: &Board, rng: &mut R) -> Trial {
    let mut moves = SmallVec::new();
    let mut position = 0u8;
    loop {
        let roll = roll_die(rng);
        position = board.advance(position, roll);
        moves.push(Move { roll, position });
        if position == FINAL_SQUARE {
            return Trial { moves };
        }
    }
}

/// Deterministic dice for tests: yields the scripted rolls in order, cycling
/// when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedDice {
    rolls: Vec<u8>,
    next: usize,
}

#[cfg(test)]
impl ScriptedDice {
    pub(crate) fn new(rolls: &[u8]) -> Self {
        assert!(!rolls.is_empty());
        assert!(rolls.iter().all(|r| (1..=DIE_FACES).contains(r)));
        Self {
            rolls: rolls.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl RngCore for ScriptedDice {
    fn next_u32(&mut self) -> u32 {
        u32::try_from(self.next_u64()).unwrap()
    }

    fn next_u64(&mut self) -> u64 {
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        u64::from(roll - 1)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
