//! Banded, early-abandoning DTW.

use crate::vector::{Vector, min_by_magnitude};

/// DTW cost of two equal-length sequences inside a Sakoe-Chiba band of radius `window`.
///
/// Keeps two rolling rows of `2 * window + 1` cells. Row `i` stores column `j` at
/// `k = j - i + window`, so the diagonal always sits at `k = window`. Cells outside the band,
/// or before the first row/column, read as `+inf`.
#[derive(Debug, Clone)]
pub struct DtwCalculator {
    window: usize,
    prev: Vec<Vector>,
    curr: Vec<Vector>,
    infinity: Vector,
    best: Vector,
    dist: Vector,
    row_min: Vector,
    reach: Vector,
}

impl DtwCalculator {
    /// Preallocate two rows for radius `window`. Any sequence length can be compared.
    #[must_use]
    pub fn new(window: usize, dimensions: usize) -> Self {
        let width = 2 * window + 1;
        let infinity = Vector::filled(dimensions, f64::INFINITY);
        Self {
            window,
            prev: vec![infinity.clone(); width],
            curr: vec![infinity.clone(); width],
            best: infinity.clone(),
            dist: Vector::zeros(dimensions),
            row_min: infinity.clone(),
            reach: Vector::zeros(dimensions),
            infinity,
        }
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Squared DTW cost between `a` and `b`, collapsed to a scalar with [`Vector::abs_sum`].
    ///
    /// `cb[k]` must bound the cost the rows from `k` onwards can still add (all zeros for no
    /// information). `row_min` is the per-component minimum over the cells of row `i`, so no
    /// path through the row costs less in any component. After row `i`, if
    /// `row_min + cb[i + window + 1]` reaches `bsf` in every component, the computation stops
    /// and returns that sum, which is then at least `bsf`.
    pub fn distance(&mut self, a: &[Vector], b: &[Vector], cb: &[Vector], bsf: f64) -> f64 {
        let len = a.len();
        debug_assert_eq!(len, b.len());
        debug_assert!(cb.len() >= len);

        let Self {
            window,
            prev,
            curr,
            infinity,
            best,
            dist,
            row_min,
            reach,
        } = self;
        let w = *window;
        let edge = 2 * w;

        for cell in prev.iter_mut().chain(curr.iter_mut()) {
            cell.fill(f64::INFINITY);
        }

        for i in 0..len {
            row_min.fill(f64::INFINITY);
            let lo = i.saturating_sub(w);
            let hi = (i + w).min(len - 1);

            for j in lo..=hi {
                let k = j + w - i;
                if i == 0 && j == 0 {
                    curr[k].set_squared_distance(&a[0], &b[0]);
                    row_min.set(&curr[k]);
                    continue;
                }

                let up = if i == 0 || k + 1 > edge { &*infinity } else { &prev[k + 1] };
                let left = if j == 0 || k == 0 { &*infinity } else { &curr[k - 1] };
                let diag = if i == 0 || j == 0 { &*infinity } else { &prev[k] };
                best.set(min_by_magnitude(min_by_magnitude(up, left), diag));

                dist.set_squared_distance(&a[i], &b[j]);
                curr[k].set(best);
                curr[k] += &*dist;

                row_min.keep_min(&curr[k]);
            }

            if i + w + 1 < len {
                reach.set(row_min);
                *reach += &cb[i + w + 1];
                if reach.all_components_at_least(bsf) {
                    return reach.abs_sum();
                }
            }

            std::mem::swap(prev, curr);
        }

        prev[w].abs_sum()
    }
}
