//! The query pattern: accumulation, z-normalization, visiting order and envelope.

use tracing::{debug, instrument};

use crate::config::SearchConfig;
use crate::envelope::EnvelopeBuilder;
use crate::error::DtwError;
use crate::vector::Vector;

/// A query pattern to search for.
///
/// Points are appended with [`Query::add_point`] or [`Query::add_values`]; then
/// [`Query::process`] derives everything the bounds need and releases the raw points.
/// A processed query is frozen: further appends fail with [`DtwError::QueryProcessed`].
#[derive(Debug, Clone)]
pub struct Query {
    dimensions: usize,
    warping_window: f64,
    points: Vec<Vector>,
    prepared: Option<PreparedQuery>,
}

/// Derived state of a processed query.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    normalized: Vec<Vector>,
    mean: Vector,
    std: Vector,
    window: usize,
    order: Vec<usize>,
    ordered: Vec<Vector>,
    upper_ordered: Vec<Vector>,
    lower_ordered: Vec<Vector>,
}

impl PreparedQuery {
    /// Z-normalized points in their original order.
    #[must_use]
    pub fn normalized(&self) -> &[Vector] {
        &self.normalized
    }

    /// Per-dimension mean of the raw points.
    #[must_use]
    pub fn mean(&self) -> &Vector {
        &self.mean
    }

    /// Per-dimension population standard deviation of the raw points.
    #[must_use]
    pub fn std(&self) -> &Vector {
        &self.std
    }

    /// Warping radius in points: `floor(fraction * len)`.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Point indices from the largest summed absolute value to the smallest.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// `normalized[order[i]]` for every `i`.
    #[must_use]
    pub fn ordered(&self) -> &[Vector] {
        &self.ordered
    }

    /// Upper envelope of the normalized query, permuted by `order`.
    #[must_use]
    pub fn upper_ordered(&self) -> &[Vector] {
        &self.upper_ordered
    }

    /// Lower envelope of the normalized query, permuted by `order`.
    #[must_use]
    pub fn lower_ordered(&self) -> &[Vector] {
        &self.lower_ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl Query {
    /// Create an empty query using the dimensions and warping window of `config`.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            dimensions: config.dimensions,
            warping_window: config.warping_window,
            points: Vec::new(),
            prepared: None,
        }
    }

    /// Append a copy of `point`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::QueryProcessed`] | The query was already processed |
    /// | [`DtwError::DimensionMismatch`] | `point` does not have the configured dimension |
    pub fn add_point(&mut self, point: &Vector) -> Result<(), DtwError> {
        self.check_append(point.dimensions())?;
        self.points.push(point.clone());
        Ok(())
    }

    /// Append one point given as raw components.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::QueryProcessed`] | The query was already processed |
    /// | [`DtwError::DimensionMismatch`] | `values.len()` differs from the configured dimension |
    pub fn add_values(&mut self, values: &[f64]) -> Result<(), DtwError> {
        self.check_append(values.len())?;
        self.points.push(Vector::new(values.to_vec())?);
        Ok(())
    }

    fn check_append(&self, dimensions: usize) -> Result<(), DtwError> {
        if self.prepared.is_some() {
            return Err(DtwError::QueryProcessed);
        }
        if dimensions != self.dimensions {
            return Err(DtwError::DimensionMismatch {
                expected: self.dimensions,
                got: dimensions,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of points, before or after processing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prepared
            .as_ref()
            .map_or(self.points.len(), PreparedQuery::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw points as appended. Empty once the query is processed.
    #[must_use]
    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    /// Derived state, if the query has been processed.
    #[must_use]
    pub fn prepared(&self) -> Option<&PreparedQuery> {
        self.prepared.as_ref()
    }

    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.prepared.is_some()
    }

    /// Z-normalize the query, build its ordered envelope and drop the raw points. A processed
    /// query is returned as is. On error the query is left unprocessed and keeps its points.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyQuery`] | No point was added |
    /// | [`DtwError::ConstantQuery`] | Some dimension has zero standard deviation |
    #[instrument(skip(self), fields(len = self.len(), dimensions = self.dimensions))]
    pub fn process(&mut self) -> Result<&PreparedQuery, DtwError> {
        let prepared = match self.prepared.take() {
            Some(prepared) => prepared,
            None => {
                let prepared = self.prepare()?;
                self.points = Vec::new();
                prepared
            }
        };
        Ok(self.prepared.insert(prepared))
    }

    fn prepare(&self) -> Result<PreparedQuery, DtwError> {
        let len = self.points.len();
        if len == 0 {
            return Err(DtwError::EmptyQuery);
        }
        let n = len as f64;

        let mut mean = Vector::zeros(self.dimensions);
        for p in &self.points {
            mean += p;
        }
        mean /= n;

        let mut std = Vector::zeros(self.dimensions);
        let mut diff = Vector::zeros(self.dimensions);
        for p in &self.points {
            diff.set(p);
            diff -= &mean;
            let squared = &diff * &diff;
            std += &squared;
        }
        std /= n;
        std.sqrt();

        if let Some(dimension) = std.as_slice().iter().position(|&s| s == 0.0) {
            return Err(DtwError::ConstantQuery { dimension });
        }

        let normalized: Vec<Vector> = self
            .points
            .iter()
            .map(|p| {
                let mut z = Vector::zeros(self.dimensions);
                z.set_normalized(p, &mean, &std);
                z
            })
            .collect();

        // Largest contributions first; stable sort keeps ties in index order.
        let weights: Vec<f64> = normalized.iter().map(Vector::abs_sum).collect();
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

        let window = (self.warping_window * n).floor() as usize;
        let mut envelope = EnvelopeBuilder::new(len, window, self.dimensions);
        envelope.build(&normalized, window);

        let ordered = order.iter().map(|&i| normalized[i].clone()).collect();
        let upper_ordered = order.iter().map(|&i| envelope.upper()[i].clone()).collect();
        let lower_ordered = order.iter().map(|&i| envelope.lower()[i].clone()).collect();

        debug!(window, "query prepared");

        Ok(PreparedQuery {
            normalized,
            mean,
            std,
            window,
            order,
            ordered,
            upper_ordered,
            lower_ordered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_1d(values: &[f64], fraction: f64) -> Query {
        let config = SearchConfig::new(1, fraction).unwrap();
        let mut query = Query::new(&config);
        for &v in values {
            query.add_values(&[v]).unwrap();
        }
        query
    }

    #[test]
    fn normalizes_to_zero_mean_unit_variance() {
        let mut query = query_1d(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.2);
        let prepared = query.process().unwrap();
        let values: Vec<f64> = prepared.normalized().iter().map(|v| v[0]).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 1e-12, "mean should be 0, got {mean}");
        assert!((var - 1.0).abs() < 1e-12, "variance should be 1, got {var}");
        assert!((prepared.mean()[0] - 3.0).abs() < 1e-12);
        assert!((prepared.std()[0] - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn processing_twice_is_a_no_op() {
        let mut query = query_1d(&[0.0, 1.0, 2.0, 1.0, 0.0], 0.4);
        let first: Vec<Vector> = query.process().unwrap().normalized().to_vec();
        let second: Vec<Vector> = query.process().unwrap().normalized().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn window_is_floor_of_fraction_times_length() {
        let mut query = query_1d(&[0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 1.0], 0.3);
        assert_eq!(query.process().unwrap().window(), 2);
        let mut query = query_1d(&[0.0, 1.0, 2.0], 1.0);
        assert_eq!(query.process().unwrap().window(), 3);
    }

    #[test]
    fn order_is_descending_by_absolute_value_with_stable_ties() {
        let mut query = query_1d(&[2.0, 0.0, 4.0, 2.0], 0.25);
        let prepared = query.process().unwrap();
        // |z| for 0.0 and 4.0 are equal and largest; 2.0 maps to 0
        assert_eq!(prepared.order(), &[1, 2, 0, 3]);
        for (i, &o) in prepared.order().iter().enumerate() {
            assert_eq!(prepared.ordered()[i], prepared.normalized()[o]);
        }
    }

    #[test]
    fn ordered_envelope_brackets_ordered_values() {
        let mut query = query_1d(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0], 0.25);
        let prepared = query.process().unwrap();
        for i in 0..prepared.len() {
            assert!(prepared.lower_ordered()[i][0] <= prepared.ordered()[i][0]);
            assert!(prepared.ordered()[i][0] <= prepared.upper_ordered()[i][0]);
        }
    }

    #[test]
    fn empty_query_fails() {
        let mut query = query_1d(&[], 0.5);
        assert!(matches!(query.process(), Err(DtwError::EmptyQuery)));
    }

    #[test]
    fn constant_dimension_fails_and_names_it() {
        let config = SearchConfig::new(2, 0.5).unwrap();
        let mut query = Query::new(&config);
        query.add_values(&[1.0, 7.0]).unwrap();
        query.add_values(&[2.0, 7.0]).unwrap();
        assert!(matches!(
            query.process(),
            Err(DtwError::ConstantQuery { dimension: 1 })
        ));
        assert!(!query.is_processed());
    }

    #[test]
    fn mismatched_point_is_rejected_without_mutation() {
        let config = SearchConfig::new(2, 0.5).unwrap();
        let mut query = Query::new(&config);
        query.add_values(&[1.0, 2.0]).unwrap();
        let err = query.add_point(&Vector::scalar(3.0)).unwrap_err();
        assert_eq!(err, DtwError::DimensionMismatch { expected: 2, got: 1 });
        assert!(query.add_values(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn processing_releases_raw_points() {
        let mut query = query_1d(&[0.0, 1.0, 2.0], 0.5);
        query.process().unwrap();
        assert!(query.points().is_empty());
        assert_eq!(query.len(), 3);
        assert!(!query.is_empty());
    }

    #[test]
    fn appending_after_processing_is_rejected() {
        let mut query = query_1d(&[0.0, 1.0, 2.0], 0.5);
        let before: Vec<Vector> = query.process().unwrap().normalized().to_vec();

        assert_eq!(query.add_values(&[5.0]), Err(DtwError::QueryProcessed));
        assert_eq!(
            query.add_point(&Vector::scalar(5.0)),
            Err(DtwError::QueryProcessed)
        );
        // a processed query reports being frozen before any dimension check
        assert_eq!(query.add_values(&[5.0, 6.0]), Err(DtwError::QueryProcessed));

        assert!(query.is_processed());
        assert_eq!(query.len(), 3);
        assert_eq!(query.process().unwrap().normalized(), before.as_slice());
    }

    #[test]
    fn failed_processing_keeps_points() {
        let mut query = query_1d(&[4.0, 4.0], 0.5);
        assert!(query.process().is_err());
        assert_eq!(query.points().len(), 2);
        query.add_values(&[5.0]).unwrap();
        assert_eq!(query.process().unwrap().len(), 3);
    }
}
