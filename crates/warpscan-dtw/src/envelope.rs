//! Sliding-window upper/lower envelopes.
//!
//! For every position `i` of a source sequence the envelope holds the elementwise maximum
//! (`upper[i]`) and minimum (`lower[i]`) of `source[i - w ..= i + w]`, clipped to the valid
//! range. Each component is computed in one pass with two monotonic deques (Lemire's
//! streaming min/max), so the cost is linear in the source length regardless of the radius.

use crate::circular_buffer::CircularBuffer;
use crate::vector::Vector;

/// Reusable envelope storage for sources of up to `capacity` points.
///
/// Storage is allocated once in [`EnvelopeBuilder::new`]; every [`EnvelopeBuilder::build`]
/// call overwrites the first `source.len()` entries and leaves the rest untouched.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    upper: Vec<Vector>,
    lower: Vec<Vector>,
    max_deque: CircularBuffer<usize>,
    min_deque: CircularBuffer<usize>,
    window: usize,
}

impl EnvelopeBuilder {
    /// Preallocate storage for `capacity` points of `dimensions` components and deques
    /// large enough for any radius up to `window`.
    #[must_use]
    pub fn new(capacity: usize, window: usize, dimensions: usize) -> Self {
        Self {
            upper: vec![Vector::zeros(dimensions); capacity],
            lower: vec![Vector::zeros(dimensions); capacity],
            max_deque: CircularBuffer::new(2 * window + 2),
            min_deque: CircularBuffer::new(2 * window + 2),
            window,
        }
    }

    /// Number of points the builder can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.upper.len()
    }

    /// Upper envelope. Only the first `source.len()` entries of the last build are meaningful.
    #[must_use]
    pub fn upper(&self) -> &[Vector] {
        &self.upper
    }

    /// Lower envelope. Only the first `source.len()` entries of the last build are meaningful.
    #[must_use]
    pub fn lower(&self) -> &[Vector] {
        &self.lower
    }

    /// Compute the envelope of `source` with radius `w`.
    ///
    /// Any radius is accepted, including one at least as long as the source (every position
    /// then sees the whole source).
    ///
    /// # Panics
    ///
    /// Panics if `source` is empty, longer than the capacity, or if `w` exceeds the window
    /// the builder was created for.
    pub fn build(&mut self, source: &[Vector], w: usize) {
        let len = source.len();
        assert!(len >= 1, "envelope source must not be empty");
        assert!(
            len <= self.capacity(),
            "envelope source of {len} points exceeds capacity {}",
            self.capacity()
        );
        assert!(w <= self.window, "radius {w} exceeds builder window {}", self.window);

        for d in 0..source[0].dimensions() {
            self.build_component(source, w, d);
        }
    }

    /// Fill component `d` of the envelope.
    fn build_component(&mut self, source: &[Vector], w: usize, d: usize) {
        let len = source.len();
        let span = 2 * w + 1;
        let Self {
            upper,
            lower,
            max_deque: du,
            min_deque: dl,
            ..
        } = self;
        du.reset();
        dl.reset();
        du.push_back(0);
        dl.push_back(0);

        for i in 1..len {
            if i > w
                && let (Some(hi), Some(lo)) = (du.front(), dl.front())
            {
                upper[i - w - 1][d] = source[hi][d];
                lower[i - w - 1][d] = source[lo][d];
            }

            // i - 1 is the back of both deques; it leaves whichever one i dominates.
            let x = source[i][d];
            if x > source[i - 1][d] {
                du.pop_back();
                while let Some(back) = du.back()
                    && x > source[back][d]
                {
                    du.pop_back();
                }
            } else {
                dl.pop_back();
                while let Some(back) = dl.back()
                    && x < source[back][d]
                {
                    dl.pop_back();
                }
            }
            du.push_back(i);
            dl.push_back(i);

            if du.front().is_some_and(|front| i == span + front) {
                du.pop_front();
            }
            if dl.front().is_some_and(|front| i == span + front) {
                dl.pop_front();
            }
        }

        // Drain: the trailing w + 1 positions see no new points.
        for i in len..len + w + 1 {
            if i > w
                && let (Some(hi), Some(lo)) = (du.front(), dl.front())
            {
                upper[i - w - 1][d] = source[hi][d];
                lower[i - w - 1][d] = source[lo][d];
            }
            if du.front().is_some_and(|front| i - front >= span) {
                du.pop_front();
            }
            if dl.front().is_some_and(|front| i - front >= span) {
                dl.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn scalars(values: &[f64]) -> Vec<Vector> {
        values.iter().map(|&v| Vector::scalar(v)).collect()
    }

    fn brute_force_1d(values: &[f64], w: usize) -> (Vec<f64>, Vec<f64>) {
        let n = values.len();
        (0..n)
            .map(|i| {
                let lo = i.saturating_sub(w);
                let hi = (i + w).min(n - 1);
                let window = &values[lo..=hi];
                let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = window.iter().copied().fold(f64::INFINITY, f64::min);
                (max, min)
            })
            .unzip()
    }

    #[test]
    fn small_known_envelope() {
        let source = scalars(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        let mut builder = EnvelopeBuilder::new(5, 1, 1);
        builder.build(&source, 1);
        let upper: Vec<f64> = builder.upper().iter().map(|v| v[0]).collect();
        let lower: Vec<f64> = builder.lower().iter().map(|v| v[0]).collect();
        assert_eq!(upper, vec![3.0, 3.0, 5.0, 5.0, 5.0]);
        assert_eq!(lower, vec![1.0, 1.0, 2.0, 2.0, 4.0]);
    }

    #[test]
    fn zero_radius_is_identity() {
        let values = [4.0, -1.0, 7.0, 7.0, 0.5];
        let mut builder = EnvelopeBuilder::new(5, 0, 1);
        builder.build(&scalars(&values), 0);
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(builder.upper()[i][0], v);
            assert_eq!(builder.lower()[i][0], v);
        }
    }

    #[test]
    fn radius_beyond_length_gives_global_extremes() {
        let values = [2.0, -3.0, 9.0];
        let mut builder = EnvelopeBuilder::new(3, 10, 1);
        builder.build(&scalars(&values), 10);
        for i in 0..3 {
            assert_eq!(builder.upper()[i][0], 9.0);
            assert_eq!(builder.lower()[i][0], -3.0);
        }
    }

    #[test]
    fn single_point_source() {
        let mut builder = EnvelopeBuilder::new(4, 2, 1);
        builder.build(&scalars(&[6.0]), 2);
        assert_eq!(builder.upper()[0][0], 6.0);
        assert_eq!(builder.lower()[0][0], 6.0);
    }

    #[test]
    fn matches_brute_force_1d() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let n = rng.gen_range(1..40);
            let w = rng.gen_range(0..12);
            // small integer values force plenty of ties
            let values: Vec<f64> = (0..n).map(|_| f64::from(rng.gen_range(-3..4))).collect();
            let mut builder = EnvelopeBuilder::new(n, w, 1);
            builder.build(&scalars(&values), w);
            let (upper, lower) = brute_force_1d(&values, w);
            for i in 0..n {
                assert_eq!(builder.upper()[i][0], upper[i], "upper at {i}, n={n}, w={w}");
                assert_eq!(builder.lower()[i][0], lower[i], "lower at {i}, n={n}, w={w}");
            }
        }
    }

    #[test]
    fn mixes_components_from_different_points() {
        let source = vec![
            Vector::new(vec![0.0, 5.0]).unwrap(),
            Vector::new(vec![4.0, 0.0]).unwrap(),
        ];
        let mut builder = EnvelopeBuilder::new(2, 1, 2);
        builder.build(&source, 1);
        for i in 0..2 {
            assert_eq!(builder.upper()[i].as_slice(), &[4.0, 5.0]);
            assert_eq!(builder.lower()[i].as_slice(), &[0.0, 0.0]);
        }
    }

    #[test]
    fn matches_brute_force_elementwise_multi_dimensional() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for dims in 2..=3 {
            for _ in 0..30 {
                let n = rng.gen_range(1..30);
                let w = rng.gen_range(0..8);
                let source: Vec<Vector> = (0..n)
                    .map(|_| {
                        Vector::new((0..dims).map(|_| f64::from(rng.gen_range(-4..5))).collect())
                            .unwrap()
                    })
                    .collect();
                let mut builder = EnvelopeBuilder::new(n, w, dims);
                builder.build(&source, w);
                for d in 0..dims {
                    let column: Vec<f64> = source.iter().map(|v| v[d]).collect();
                    let (upper, lower) = brute_force_1d(&column, w);
                    for i in 0..n {
                        assert_eq!(builder.upper()[i][d], upper[i], "upper {i}/{d}, n={n}, w={w}");
                        assert_eq!(builder.lower()[i][d], lower[i], "lower {i}/{d}, n={n}, w={w}");
                    }
                }
            }
        }
    }

    #[test]
    fn rebuild_reuses_storage() {
        let mut builder = EnvelopeBuilder::new(6, 2, 1);
        builder.build(&scalars(&[9.0, 9.0, 9.0, 9.0, 9.0, 9.0]), 2);
        builder.build(&scalars(&[1.0, 2.0, 3.0]), 1);
        let upper: Vec<f64> = builder.upper()[..3].iter().map(|v| v[0]).collect();
        assert_eq!(upper, vec![2.0, 3.0, 3.0]);
    }
}
