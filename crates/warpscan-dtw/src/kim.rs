//! Endpoint lower bound (LB_Kim hierarchy).
//!
//! Every warping path starts at cell `(0, 0)` and ends at `(len-1, len-1)`, and it must cross
//! each of the small "L"-shaped cell sets next to the corners. Summing, component by
//! component, the cheapest cell of each set gives a vector that no path cost undercuts in
//! any component, while only touching the first and last three points of the candidate. Stages are checked one at a time so that most candidates are
//! rejected after a couple of distance evaluations.

use crate::vector::Vector;

/// Cells `(candidate index, query index)` of the 2nd stage at the front.
const FRONT_2: [(usize, usize); 3] = [(1, 0), (0, 1), (1, 1)];
/// Cells of the 3rd stage at the front.
const FRONT_3: [(usize, usize); 5] = [(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)];

/// Scratch storage for the endpoint bound.
#[derive(Debug, Clone)]
pub struct KimBound {
    bound: Vector,
    point: Vector,
    dist: Vector,
    best: Vector,
}

impl KimBound {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            bound: Vector::zeros(dimensions),
            point: Vector::zeros(dimensions),
            dist: Vector::zeros(dimensions),
            best: Vector::zeros(dimensions),
        }
    }

    /// Compute the cascading endpoint bound of `candidate` (raw values, normalized on the fly
    /// with `mean` and `std`) against the normalized `query`.
    ///
    /// Returns as soon as the accumulated bound reaches `bsf` in every component. A stage
    /// runs only when its front and back cells cannot overlap: stage 2 needs at least 4
    /// points, stage 3 at least 6. A single-point query counts its one cell once.
    pub fn hierarchy(
        &mut self,
        candidate: &[Vector],
        mean: &Vector,
        std: &Vector,
        query: &[Vector],
        bsf: f64,
    ) -> &Vector {
        let len = query.len();
        debug_assert!(candidate.len() >= len, "candidate shorter than query");
        self.bound.fill(0.0);

        self.add_cheapest(candidate, mean, std, query, &[(0, 0)]);
        if len == 1 {
            return &self.bound;
        }
        self.add_cheapest(candidate, mean, std, query, &[(len - 1, len - 1)]);
        if self.bound.all_components_at_least(bsf) || len < 4 {
            return &self.bound;
        }

        self.add_cheapest(candidate, mean, std, query, &FRONT_2);
        if self.bound.all_components_at_least(bsf) {
            return &self.bound;
        }
        self.add_cheapest(candidate, mean, std, query, &mirror(FRONT_2, len));
        if self.bound.all_components_at_least(bsf) || len < 6 {
            return &self.bound;
        }

        self.add_cheapest(candidate, mean, std, query, &FRONT_3);
        if self.bound.all_components_at_least(bsf) {
            return &self.bound;
        }
        self.add_cheapest(candidate, mean, std, query, &mirror(FRONT_3, len));
        &self.bound
    }

    /// Add the per-component minimum squared distance among `cells` to the bound.
    fn add_cheapest(
        &mut self,
        candidate: &[Vector],
        mean: &Vector,
        std: &Vector,
        query: &[Vector],
        cells: &[(usize, usize)],
    ) {
        for (n, &(c, q)) in cells.iter().enumerate() {
            self.point.set_normalized(&candidate[c], mean, std);
            self.dist.set_squared_distance(&self.point, &query[q]);
            if n == 0 {
                self.best.set(&self.dist);
            } else {
                self.best.keep_min(&self.dist);
            }
        }
        self.bound += &self.best;
    }
}

/// Reflect front cells onto the back corner of a `len`-point alignment.
fn mirror<const N: usize>(cells: [(usize, usize); N], len: usize) -> [(usize, usize); N] {
    cells.map(|(c, q)| (len - 1 - c, len - 1 - q))
}
