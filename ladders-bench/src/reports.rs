use anyhow::Result;
use colored::Colorize;
use ladders_game::{Histogram, MedianMode, ResultAggregate, Trial, Workload, frequencies, median};
use serde::Serialize;
use std::io::Write;

use crate::plan::RunPlan;

/// Detailed results as handed to plotting and archival tooling.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Game length against number of games, sorted by length.
    pub counts: &'a Histogram,
    /// CPU seconds summed across workers.
    pub elapsed: f64,
    pub num_games: u64,
    pub shortest: Option<&'a Trial>,
    pub longest: Option<&'a Trial>,
    pub workers: usize,
    /// Estimated wall-clock seconds.
    pub wall_clock: f64,
    pub rate: Option<f64>,
    pub median: Option<f64>,
    pub median_mode: MedianMode,
    pub mean: Option<f64>,
    pub mode: Option<u32>,
}

impl<'a> JsonReport<'a> {
    #[must_use]
    pub fn new(result: &'a ResultAggregate, plan: &RunPlan) -> Self {
        Self {
            counts: &result.histogram,
            elapsed: result.elapsed.as_secs_f64(),
            num_games: result.total_trials,
            shortest: result.shortest.as_ref(),
            longest: result.longest.as_ref(),
            workers: plan.workers,
            wall_clock: result.wall_clock(plan.workers).as_secs_f64(),
            rate: result.rate(plan.workers),
            median: median(&result.histogram, plan.median).ok(),
            median_mode: plan.median,
            mean: result.mean(),
            mode: result.mode(),
        }
    }
}

/// Announce what is about to be played.
pub fn write_banner(out: &mut dyn Write, plan: &RunPlan) -> Result<()> {
    let what = match plan.workload {
        Workload::Games(games) => {
            format!("Playing {} games of Snakes & Ladders", group_thousands(games))
        }
        Workload::Timed(scheduler) => format!(
            "Playing Snakes & Ladders for at least {} seconds",
            format_number(scheduler.budget().as_secs_f64())
        ),
    };
    let how = if plan.workers == 1 {
        "with a single thread.".to_string()
    } else {
        format!("using {} threads.", plan.workers)
    };
    writeln!(out, "{} {}", what.bright_cyan().bold(), how)?;
    Ok(())
}

/// Human-readable summary: totals, timing, throughput and extremes.
pub fn write_summary(out: &mut dyn Write, result: &ResultAggregate, plan: &RunPlan) -> Result<()> {
    let wall = result.wall_clock(plan.workers).as_secs_f64();
    let rate = result
        .rate(plan.workers)
        .map_or_else(|| "n/a".to_string(), |r| {
            group_thousands(ladders_game::numbers::round_f64_to_u64(r))
        });
    writeln!(
        out,
        "{} games finished in {} seconds ({:.2}s CPU) = {} games per second",
        group_thousands(result.total_trials).green(),
        format!("{wall:.2}").bold(),
        result.elapsed.as_secs_f64(),
        rate.bright_yellow()
    )?;

    match median(&result.histogram, plan.median) {
        Ok(mid) => writeln!(
            out,
            "The shortest game took {} moves, the longest {}, while the median was {}.",
            result.shortest_len().unwrap_or(0),
            result.longest_len().unwrap_or(0),
            format_number(mid)
        )?,
        Err(err) => writeln!(out, "{}", format!("No median: {err}").yellow())?,
    }
    Ok(())
}

pub fn write_json_report(out: &mut dyn Write, report: &JsonReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// One row per game length, ready for charting.
pub fn write_csv_report(out: &mut dyn Write, histogram: &Histogram) -> Result<()> {
    writeln!(out, "length,count,percentage")?;
    for (len, fraction) in frequencies(histogram) {
        let count = histogram.get(&len).copied().unwrap_or(0);
        writeln!(out, "{len},{count},{:.4}", fraction * 100.0)?;
    }
    Ok(())
}

/// `1234567` -> `1,234,567`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Whole numbers without a trailing `.0`, others to one decimal place.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
