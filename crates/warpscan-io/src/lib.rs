//! File I/O, resampling and result serialization for warpscan.

mod domain;
mod error;
mod reader;
mod resample;
mod writer;

pub use domain::{ExperimentName, SeriesKind};
pub use error::IoError;
pub use reader::RowReader;
pub use resample::stretch;
pub use writer::{ResultWriter, SearchArtifact};
