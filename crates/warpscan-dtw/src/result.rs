//! Search outcome and pruning statistics.

use std::fmt;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate windows considered.
    pub scanned: u64,
    /// Windows rejected by the endpoint bound.
    pub kim_pruned: u64,
    /// Windows rejected by the query-envelope bound.
    pub keogh_query_pruned: u64,
    /// Windows rejected by the data-envelope bound.
    pub keogh_data_pruned: u64,
    /// Windows that reached the DTW calculator.
    pub dtw_computed: u64,
}

impl SearchStats {
    /// Fraction of scanned windows that never reached the DTW calculator.
    #[must_use]
    pub fn pruning_rate(&self) -> f64 {
        if self.scanned == 0 {
            return 0.0;
        }
        (self.scanned - self.dtw_computed) as f64 / self.scanned as f64
    }
}

/// Best match of a query in a data stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// DTW distance of the best match; `+inf` when no window was scanned.
    pub distance: f64,
    /// Start offset of the best match in the data stream.
    pub location: Option<usize>,
    pub stats: SearchStats,
}

impl SearchResult {
    /// Result of a search that saw no complete window.
    #[must_use]
    pub fn no_match(stats: SearchStats) -> Self {
        Self {
            distance: f64::INFINITY,
            location: None,
            stats,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.location.is_some()
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "distance {:.6} at location {location}", self.distance),
            None => f.write_str("no match"),
        }
    }
}
