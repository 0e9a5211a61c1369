//! Where structured reports end up.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

/// Buffered sink for the JSON or CSV report: stdout, or a file named by
/// `--output`.
pub enum ReportTarget {
    Stdout(BufWriter<Stdout>),
    File { path: PathBuf, out: BufWriter<File> },
}

impl ReportTarget {
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(io::stdout())));
        };
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        log::debug!("writing report to {}", path.display());
        Ok(Self::File {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        })
    }

    /// Human-readable destination for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_string(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn sink(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(out) => out,
            Self::File { out, .. } => out,
        }
    }
}

impl Write for ReportTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink().flush()
    }
}
