//! I/O error types for warpscan-io.

use std::path::PathBuf;

use warpscan_dtw::DtwError;

/// Errors from reading series files, resampling, and writing results.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading a line fails part-way through the file.
    #[error("cannot read line {line} of {path}")]
    ReadLine {
        /// Path of the file being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the file holds no data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path of the file.
        path: PathBuf,
    },

    /// Returned when a row does not hold exactly one value per dimension.
    #[error("inconsistent row length in {path}: line {line} has {got} values, expected {expected}")]
    InconsistentRowLength {
        /// Path of the file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Configured number of dimensions.
        expected: usize,
        /// Number of values found on the line.
        got: usize,
    },

    /// Returned when a value is NaN, infinite, or not a number at all.
    #[error("non-finite value in {path}: line {line}, column {column}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path of the file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Zero-based column index.
        column: usize,
        /// The raw token that failed to parse.
        raw: String,
    },

    /// Returned when a series longer than one point is stretched to fewer than two points.
    #[error("cannot stretch {source_len} points to {new_length}")]
    InvalidStretchLength {
        /// Length of the input series.
        source_len: usize,
        /// Requested length.
        new_length: usize,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV writer fails.
    #[error("CSV error writing {path}")]
    Csv {
        /// Path of the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when parsed values are rejected by the search library.
    #[error(transparent)]
    Core(#[from] DtwError),
}
