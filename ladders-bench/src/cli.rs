use clap::{Parser, ValueEnum};
use ladders_game::MedianMode;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MedianArg {
    /// Mean of the two middle values
    Mean,
    /// Larger of the two middle values
    High,
    /// Smaller of the two middle values
    Low,
}

impl From<MedianArg> for MedianMode {
    fn from(arg: MedianArg) -> Self {
        match arg {
            MedianArg::Mean => Self::MeanOfMiddle,
            MedianArg::High => Self::High,
            MedianArg::Low => Self::Low,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ladders-bench", version)]
#[command(about = "Play many, many solo games of Snakes and Ladders")]
pub struct Args {
    /// Run on multiple cores; a bare -j uses every core found
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "0"
    )]
    pub jobs: Option<usize>,

    /// Number of games to play per worker, eg. 100 or 1e6
    #[arg(short = 'n', long = "games", value_parser = parse_count, conflicts_with = "seconds")]
    pub games: Option<u64>,

    /// Approximate seconds to play for (default 10)
    #[arg(short = 's', long = "seconds", value_name = "SECONDS", value_parser = parse_seconds)]
    pub seconds: Option<f64>,

    /// Dump detailed results as JSON
    #[arg(long)]
    pub json: bool,

    /// Dump the length histogram as CSV for charting
    #[arg(long, conflicts_with = "json")]
    pub csv: bool,

    /// Write the JSON or CSV report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Alternate board definition (JSON overrides map)
    #[arg(long)]
    pub board: Option<PathBuf>,

    /// Run configuration file (JSON); flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Smallest batch for timed runs
    #[arg(long)]
    pub floor: Option<u64>,

    /// Median flavour reported in the summary
    #[arg(long, value_enum)]
    pub median: Option<MedianArg>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse a game count written as `1000`, `1_000`, `1,000` or `1e3`.
pub fn parse_count(raw: &str) -> Result<u64, String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '_' | ',')).collect();
    if let Ok(value) = cleaned.parse::<u64>() {
        return Ok(value);
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("not a game count: {raw}"))?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > 1e19 {
        return Err(format!("not a whole, positive game count: {raw}"));
    }
    Ok(ladders_game::numbers::round_f64_to_u64(value))
}

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("not a number of seconds: {raw}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("seconds must be zero or more: {raw}"))
    }
}
