//! Streaming nearest-neighbour subsequence search.
//!
//! The data stream is scanned in chunks of `epoch` points. Each chunk starts with the last
//! `len - 1` points of the previous one so that no window straddling a chunk boundary is
//! lost, and the running sums behind the per-window mean and standard deviation are
//! restarted for every chunk to bound floating-point drift.
//!
//! Every window goes through a cascade of increasingly expensive lower bounds before the
//! banded DTW is computed:
//!
//! 1. endpoint bound ([`KimBound`]),
//! 2. candidate against the query envelope ([`KeoghBounds::query_envelope`]),
//! 3. query against the candidate envelope ([`KeoghBounds::data_envelope`]),
//! 4. early-abandoning DTW ([`DtwCalculator`]) fed with the tighter of the two envelope bounds.

use tracing::{debug, info, instrument};

use crate::calculator::DtwCalculator;
use crate::config::SearchConfig;
use crate::envelope::EnvelopeBuilder;
use crate::error::DtwError;
use crate::keogh::{KeoghBounds, suffix_sum};
use crate::kim::KimBound;
use crate::query::Query;
use crate::result::{SearchResult, SearchStats};
use crate::vector::Vector;

/// Where the scan stands between chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// The last chunk was full; more data may follow.
    Scanning,
    /// The current chunk is the last one.
    Draining,
    Done,
}

/// Exact DTW subsequence search over an append-only data stream.
#[derive(Debug, Clone)]
pub struct SubsequenceSearch {
    config: SearchConfig,
    /// Row-major points, `config.dimensions` values each.
    data: Vec<f64>,
}

impl SubsequenceSearch {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of data points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.config.dimensions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a copy of `point` to the data stream.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `point` does not have the configured dimension |
    pub fn add_data_point(&mut self, point: &Vector) -> Result<(), DtwError> {
        self.add_data_values(point.as_slice())
    }

    /// Append one point given as raw components.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `values.len()` differs from the configured dimension |
    pub fn add_data_values(&mut self, values: &[f64]) -> Result<(), DtwError> {
        if values.len() != self.config.dimensions {
            return Err(DtwError::DimensionMismatch {
                expected: self.config.dimensions,
                got: values.len(),
            });
        }
        self.data.extend_from_slice(values);
        Ok(())
    }

    /// Create an empty query with this search's dimensions and warping window.
    #[must_use]
    pub fn new_query(&self) -> Query {
        Query::new(&self.config)
    }

    fn point(&self, index: usize) -> &[f64] {
        let d = self.config.dimensions;
        &self.data[index * d..(index + 1) * d]
    }

    /// Find the data window closest to `query` under DTW.
    ///
    /// Processes the query first if needed. Having fewer data points than query points is
    /// not an error: the result then has no location and an infinite distance.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | The query was built for another dimension |
    /// | [`DtwError::EmptyQuery`] | The query has no points |
    /// | [`DtwError::ConstantQuery`] | A query dimension has zero variance |
    /// | [`DtwError::EpochTooShort`] | The configured epoch is shorter than the query |
    #[instrument(skip(self, query), fields(points = self.len(), query_len = query.len()))]
    pub fn search(&self, query: &mut Query) -> Result<SearchResult, DtwError> {
        let dims = self.config.dimensions;
        if query.dimensions() != dims {
            return Err(DtwError::DimensionMismatch {
                expected: dims,
                got: query.dimensions(),
            });
        }
        let prepared = query.process()?;
        let len = prepared.len();
        let epoch = self.config.epoch;
        if epoch < len {
            return Err(DtwError::EpochTooShort {
                epoch,
                query_len: len,
            });
        }

        let total = self.len();
        let window = prepared.window();
        let early_abandoning = self.config.early_abandoning;

        let capacity = epoch.min(total.max(len));
        let mut buffer = vec![Vector::zeros(dims); capacity];
        let mut envelope = EnvelopeBuilder::new(capacity, window, dims);
        let mut t = vec![Vector::zeros(dims); 2 * len];
        let mut tz = vec![Vector::zeros(dims); len];
        let mut cb = vec![Vector::zeros(dims); len];
        let mut cb_query = vec![Vector::zeros(dims); len];
        let mut cb_data = vec![Vector::zeros(dims); len];
        let mut kim = KimBound::new(dims);
        let mut keogh = KeoghBounds::new(dims);
        let mut calculator = DtwCalculator::new(window, dims);

        let mut ex = Vector::zeros(dims);
        let mut ex2 = Vector::zeros(dims);
        let mut square = Vector::zeros(dims);
        let mut mean = Vector::zeros(dims);
        let mut mean_sq = Vector::zeros(dims);
        let mut std = Vector::zeros(dims);
        let n = len as f64;

        let mut bsf = f64::INFINITY;
        let mut location = None;
        let mut stats = SearchStats::default();

        let mut state = ScanState::Scanning;
        let mut next = 0usize;
        let mut chunk_start = 0usize;
        let mut carry = 0usize;

        while state != ScanState::Done {
            if carry > 0 {
                buffer.rotate_left(capacity - carry);
            }
            let mut ep = carry;
            while ep < capacity && next < total {
                buffer[ep].set_slice(self.point(next));
                ep += 1;
                next += 1;
            }
            if ep < len {
                state = ScanState::Done;
                continue;
            }
            state = if ep < epoch {
                ScanState::Draining
            } else {
                ScanState::Scanning
            };
            debug!(chunk_start, points = ep, ?state, "scanning chunk");

            envelope.build(&buffer[..ep], window);
            ex.fill(0.0);
            ex2.fill(0.0);

            for (i, point) in buffer[..ep].iter().enumerate() {
                ex += point;
                square.set(point);
                square *= point;
                ex2 += &square;

                t[i % len].set(point);
                t[i % len + len].set(point);

                if i + 1 < len {
                    continue;
                }

                mean.set(&ex);
                mean /= n;
                std.set(&ex2);
                std /= n;
                mean_sq.set(&mean);
                mean_sq *= &mean;
                std -= &mean_sq;
                std.sqrt();

                let j = (i + 1) % len;
                let start = i + 1 - len;
                let candidate = &t[j..j + len];
                let limit = if early_abandoning { bsf } else { f64::INFINITY };
                stats.scanned += 1;

                let lb_kim = kim.hierarchy(candidate, &mean, &std, prepared.normalized(), limit);
                if lb_kim.all_components_below(limit) {
                    let lb_query = keogh.query_envelope(
                        prepared.order(),
                        candidate,
                        prepared.upper_ordered(),
                        prepared.lower_ordered(),
                        &mut cb_query,
                        &mean,
                        &std,
                        limit,
                    );
                    if lb_query.all_components_below(limit) {
                        for (z, raw) in tz.iter_mut().zip(candidate) {
                            z.set_normalized(raw, &mean, &std);
                        }
                        let lb_data = keogh.data_envelope(
                            prepared.order(),
                            prepared.ordered(),
                            &mut cb_data,
                            &envelope.lower()[start..start + len],
                            &envelope.upper()[start..start + len],
                            &mean,
                            &std,
                            limit,
                        );
                        if lb_data.all_components_below(limit) {
                            let tighter = if keogh.query_total().magnitude_gt(keogh.data_total()) {
                                &cb_query
                            } else {
                                &cb_data
                            };
                            suffix_sum(tighter, &mut cb);

                            stats.dtw_computed += 1;
                            let distance =
                                calculator.distance(&tz, prepared.normalized(), &cb, limit);
                            if distance < bsf {
                                bsf = distance;
                                location = Some(chunk_start + start);
                            }
                        } else {
                            stats.keogh_data_pruned += 1;
                        }
                    } else {
                        stats.keogh_query_pruned += 1;
                    }
                } else {
                    stats.kim_pruned += 1;
                }

                ex -= &t[j];
                square.set(&t[j]);
                square *= &t[j];
                ex2 -= &square;
            }

            if state == ScanState::Draining {
                state = ScanState::Done;
            } else {
                carry = len - 1;
                chunk_start += epoch - carry;
            }
        }

        let result = SearchResult {
            distance: bsf.sqrt(),
            location,
            stats,
        };
        info!(
            distance = result.distance,
            location = ?result.location,
            scanned = stats.scanned,
            dtw = stats.dtw_computed,
            "search finished"
        );
        Ok(result)
    }
}
