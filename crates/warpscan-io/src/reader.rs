//! Whitespace-separated numeric row reader with full input validation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use warpscan_dtw::Vector;

use crate::IoError;

/// Reads one point per line from a plain text file.
///
/// Expected format:
/// - one row per point, `dimensions` numbers separated by spaces or tabs
/// - blank lines are skipped
/// - no header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::ReadLine`] | A line cannot be read (I/O failure, invalid UTF-8) |
/// | [`IoError::EmptyDataset`] | No data rows |
/// | [`IoError::InconsistentRowLength`] | Row holds a different number of values than `dimensions` |
/// | [`IoError::NonFiniteValue`] | Value is NaN, Inf, or unparseable |
pub struct RowReader {
    path: PathBuf,
    dimensions: usize,
}

impl RowReader {
    /// Create a reader for `path` expecting `dimensions` values per row.
    pub fn new(path: &Path, dimensions: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            dimensions,
        }
    }

    /// Read and validate every row.
    #[instrument(skip(self), fields(path = %self.path.display(), dimensions = self.dimensions))]
    pub fn read(&self) -> Result<Vec<Vector>, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        debug!("file opened");

        let mut rows = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| IoError::ReadLine {
                path: self.path.clone(),
                line: line_no,
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(self.parse_row(&line, line_no)?);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(points = rows.len(), "series loaded");
        Ok(rows)
    }

    fn parse_row(&self, line: &str, line_no: usize) -> Result<Vector, IoError> {
        let mut values = Vec::with_capacity(self.dimensions);
        for (column, raw) in line.split_whitespace().enumerate() {
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    line: line_no,
                    column,
                    raw: raw.to_string(),
                })?;
            values.push(value);
        }

        if values.len() != self.dimensions {
            return Err(IoError::InconsistentRowLength {
                path: self.path.clone(),
                line: line_no,
                expected: self.dimensions,
                got: values.len(),
            });
        }
        Ok(Vector::new(values)?)
    }
}
