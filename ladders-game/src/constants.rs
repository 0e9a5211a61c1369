//! Fixed rules and tuning defaults for the benchmark.
//!
//! The termination rule and die are part of the game definition and are not
//! configurable; the defaults below only seed `RunConfig` and the CLI.

use std::time::Duration;

// Board rules --------------------------------------------------------------
/// Winning square. A trial ends the instant a move lands here exactly.
pub const FINAL_SQUARE: u8 = 100;
/// Faces on the single die rolled each turn.
pub const DIE_FACES: u8 = 6;

// Scheduling ---------------------------------------------------------------
/// Smallest batch the adaptive scheduler plays before first checking the clock.
pub const DEFAULT_TIMED_FLOOR: u64 = 100;
/// Time budget used when neither a game count nor a duration is requested.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);
/// Worker count when none is configured.
pub const DEFAULT_WORKERS: usize = 1;

// Logging ------------------------------------------------------------------
/// Environment variable that forces debug logging in the bench binary.
pub const DEBUG_ENV_VAR: &str = "LADDERS_DEBUG_LOGS";
