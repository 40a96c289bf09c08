//! Run summary output
//!
//! A run reports exactly one JSON object, `{"seconds": .., "ops/s": ..}`, to
//! exactly one sink: the configured output file, or stdout when none is set.

use crate::stats::RunSummary;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where the run summary goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySink {
    Stdout,
    File(PathBuf),
}

impl SummarySink {
    /// File sink when a path is given, stdout otherwise
    pub fn from_output(output: Option<&Path>) -> Self {
        match output {
            Some(path) => SummarySink::File(path.to_path_buf()),
            None => SummarySink::Stdout,
        }
    }
}

/// Write the summary to `writer` as a single line
pub fn write_summary<W: Write>(mut writer: W, summary: &RunSummary) -> Result<()> {
    let json = summary.to_json().context("Failed to encode run summary")?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}

/// Emit the summary to its sink
pub fn emit_summary(sink: &SummarySink, summary: &RunSummary) -> Result<()> {
    match sink {
        SummarySink::Stdout => write_summary(io::stdout().lock(), summary),
        SummarySink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_summary(file, summary)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Wrote run summary");
            Ok(())
        }
    }
}
