//! Envelope lower bounds (LB_Keogh) with cumulative-bound output.
//!
//! Two symmetric variants:
//!
//! - [`KeoghBounds::query_envelope`] tests the normalized candidate against the query's
//!   envelope;
//! - [`KeoghBounds::data_envelope`] tests the query against the normalized envelope of the
//!   candidate.
//!
//! Both visit points in the query's `order` (largest contributions first) so the running
//! total crosses the best-so-far as early as possible, and both record each point's
//! contribution in a per-position array the DTW calculator later suffix-sums.

use crate::vector::Vector;

/// Scratch storage and running totals of the two envelope bounds.
#[derive(Debug, Clone)]
pub struct KeoghBounds {
    query_total: Vector,
    data_total: Vector,
    point: Vector,
    upper: Vector,
    lower: Vector,
}

impl KeoghBounds {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            query_total: Vector::zeros(dimensions),
            data_total: Vector::zeros(dimensions),
            point: Vector::zeros(dimensions),
            upper: Vector::zeros(dimensions),
            lower: Vector::zeros(dimensions),
        }
    }

    /// Total of the last [`KeoghBounds::query_envelope`] call.
    #[must_use]
    pub fn query_total(&self) -> &Vector {
        &self.query_total
    }

    /// Total of the last [`KeoghBounds::data_envelope`] call.
    #[must_use]
    pub fn data_total(&self) -> &Vector {
        &self.data_total
    }

    /// Bound the candidate window against the query envelope.
    ///
    /// `candidate[order[i]]` is normalized with `mean`/`std` and compared component by
    /// component with `upper[i]` and `lower[i]` (the query envelope permuted by `order`). Each
    /// component's squared distance to the side it crosses is added to the total and stored
    /// at `cb[order[i]]`.
    /// Stops once the total reaches `bsf` in every component; later entries of `cb` stay zero.
    #[allow(clippy::too_many_arguments)]
    pub fn query_envelope(
        &mut self,
        order: &[usize],
        candidate: &[Vector],
        upper: &[Vector],
        lower: &[Vector],
        cb: &mut [Vector],
        mean: &Vector,
        std: &Vector,
        bsf: f64,
    ) -> &Vector {
        for c in cb.iter_mut() {
            c.fill(0.0);
        }
        self.query_total.fill(0.0);

        for (i, &o) in order.iter().enumerate() {
            if !self.query_total.all_components_below(bsf) {
                break;
            }
            self.point.set_normalized(&candidate[o], mean, std);
            let slot = &mut cb[o];
            slot.set_band_distance(&self.point, &upper[i], &lower[i]);
            self.query_total += &*slot;
        }
        &self.query_total
    }

    /// Bound the query against the candidate's own envelope.
    ///
    /// `upper` and `lower` are the data envelope starting at the candidate's first point;
    /// entry `order[i]` is normalized and compared with `ordered_query[i]`. Contributions go to
    /// `cb[order[i]]` as in [`KeoghBounds::query_envelope`].
    #[allow(clippy::too_many_arguments)]
    pub fn data_envelope(
        &mut self,
        order: &[usize],
        ordered_query: &[Vector],
        cb: &mut [Vector],
        lower: &[Vector],
        upper: &[Vector],
        mean: &Vector,
        std: &Vector,
        bsf: f64,
    ) -> &Vector {
        for c in cb.iter_mut() {
            c.fill(0.0);
        }
        self.data_total.fill(0.0);

        for (i, &o) in order.iter().enumerate() {
            if !self.data_total.all_components_below(bsf) {
                break;
            }
            self.upper.set_normalized(&upper[o], mean, std);
            self.lower.set_normalized(&lower[o], mean, std);
            let slot = &mut cb[o];
            slot.set_band_distance(&ordered_query[i], &self.upper, &self.lower);
            self.data_total += &*slot;
        }
        &self.data_total
    }
}

/// Overwrite `cumulative` with the suffix sums of `cb`: `cumulative[k] = cb[k] + ... + cb[len-1]`.
pub fn suffix_sum(cb: &[Vector], cumulative: &mut [Vector]) {
    debug_assert_eq!(cb.len(), cumulative.len());
    let Some(last) = cb.len().checked_sub(1) else {
        return;
    };
    cumulative[last].set(&cb[last]);
    for k in (0..last).rev() {
        let (head, tail) = cumulative.split_at_mut(k + 1);
        head[k].set(&tail[0]);
        head[k] += &cb[k];
    }
}
