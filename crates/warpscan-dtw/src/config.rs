//! Search configuration builder.

use crate::error::DtwError;

/// Default number of data points processed per chunk.
pub const DEFAULT_EPOCH: usize = 100_000;

/// Configuration for a subsequence search.
///
/// Construct via [`SearchConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter          | Default   |
/// |--------------------|-----------|
/// | `epoch`            | 100 000   |
/// | `early_abandoning` | true      |
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub(crate) dimensions: usize,
    pub(crate) warping_window: f64,
    pub(crate) epoch: usize,
    pub(crate) early_abandoning: bool,
}

impl SearchConfig {
    /// Create a configuration for `dimensions`-component data and a warping window given
    /// as a fraction of the query length.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidDimensions`] | `dimensions` is zero |
    /// | [`DtwError::InvalidWarpingWindow`] | `warping_window` is not in `(0.0, 1.0]` (NaN included) |
    pub fn new(dimensions: usize, warping_window: f64) -> Result<Self, DtwError> {
        if dimensions == 0 {
            return Err(DtwError::InvalidDimensions { dimensions });
        }
        if !(warping_window > 0.0 && warping_window <= 1.0) {
            return Err(DtwError::InvalidWarpingWindow {
                fraction: warping_window,
            });
        }
        Ok(Self {
            dimensions,
            warping_window,
            epoch: DEFAULT_EPOCH,
            early_abandoning: true,
        })
    }

    /// Set the chunk size. Must be at least the query length when the search runs.
    #[must_use]
    pub fn with_epoch(mut self, epoch: usize) -> Self {
        self.epoch = epoch;
        self
    }

    /// Enable or disable early abandoning. With it disabled every window goes through the
    /// full bound cascade and DTW against an infinite limit; results are identical, only
    /// slower.
    #[must_use]
    pub fn with_early_abandoning(mut self, enabled: bool) -> Self {
        self.early_abandoning = enabled;
        self
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Warping window as a fraction of the query length.
    #[must_use]
    pub fn warping_window(&self) -> f64 {
        self.warping_window
    }

    #[must_use]
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    #[must_use]
    pub fn early_abandoning(&self) -> bool {
        self.early_abandoning
    }
}
