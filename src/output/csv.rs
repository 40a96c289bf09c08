//! Per-call CSV output
//!
//! One row per completed call, in aggregate order (worker index, then each
//! worker's completion order):
//!
//! ```text
//! name,status,start,end,duration
//! fn0,Success,2024-05-01T12:00:00.000000Z,2024-05-01T12:00:00.012000Z,0.012s
//! ```

use crate::stats::CallResult;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of the results file
pub const CSV_HEADER: &str = "name,status,start,end,duration";

/// CSV writer for call results
pub struct CsvWriter<W: Write> {
    out: W,
    rows: usize,
}

impl CsvWriter<BufWriter<File>> {
    /// Create the file at `path` and write the header row
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap a writer and write the header row
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", CSV_HEADER)?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one result row
    pub fn append(&mut self, result: &CallResult) -> Result<()> {
        writeln!(self.out, "{}", result.csv_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write every result to a new CSV file at `path`
pub fn write_results(path: &Path, results: &[CallResult]) -> Result<()> {
    let mut writer = CsvWriter::create(path)?;
    for result in results {
        writer.append(result)?;
    }
    let rows = writer.rows();
    writer
        .finish()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows, "Wrote results CSV");
    Ok(())
}
