//! Exact nearest-neighbour subsequence search under Dynamic Time Warping.
//!
//! Pure math library with no I/O. Finds the window of a long, possibly multi-dimensional
//! data stream whose banded DTW distance to a z-normalized query is smallest. Each window is
//! z-normalized on the fly and has to get past a cascade of lower bounds (endpoint bound,
//! then envelope bounds in both directions) before the early-abandoning DTW runs.
//!
//! ```
//! use warpscan_dtw::{SearchConfig, SubsequenceSearch};
//!
//! let config = SearchConfig::new(1, 1.0)?;
//! let mut search = SubsequenceSearch::new(config);
//! for v in [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 5.0, 6.0, 5.0, 0.0, 0.0] {
//!     search.add_data_values(&[v])?;
//! }
//! let mut query = search.new_query();
//! for v in [0.0, 1.0, 2.0, 1.0, 0.0] {
//!     query.add_values(&[v])?;
//! }
//! let result = search.search(&mut query)?;
//! assert_eq!(result.location, Some(1));
//! # Ok::<(), warpscan_dtw::DtwError>(())
//! ```

mod calculator;
mod circular_buffer;
mod config;
mod envelope;
mod error;
mod keogh;
mod kim;
mod query;
mod result;
mod search;
mod vector;

pub use calculator::DtwCalculator;
pub use circular_buffer::CircularBuffer;
pub use config::{DEFAULT_EPOCH, SearchConfig};
pub use envelope::EnvelopeBuilder;
pub use error::DtwError;
pub use keogh::{KeoghBounds, suffix_sum};
pub use kim::KimBound;
pub use query::{PreparedQuery, Query};
pub use result::{SearchResult, SearchStats};
pub use search::SubsequenceSearch;
pub use vector::{Vector, min_by_magnitude};
