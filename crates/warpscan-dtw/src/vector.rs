//! Fixed-dimension numeric vectors with elementwise arithmetic.
//!
//! Two ordering notions coexist and are kept apart by name:
//!
//! - **magnitude** comparisons (`magnitude_lt`, `magnitude_gt`, ...) compare two
//!   vectors by [`Vector::magnitude`];
//! - **all-components** comparisons (`all_components_below`, ...) compare every
//!   component against a scalar and hold only if the relation holds for each one.
//!
//! For a 1-dimensional vector the magnitude is the raw, signed value, so magnitude
//! comparisons behave like ordinary signed comparisons in 1-D and like unsigned norm
//! comparisons for two or more dimensions.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

use crate::error::DtwError;

/// An owned vector of `D >= 1` components.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector(Vec<f64>);

impl Vector {
    /// Create a vector from its components.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidDimensions`] | `values` is empty |
    pub fn new(values: Vec<f64>) -> Result<Self, DtwError> {
        if values.is_empty() {
            return Err(DtwError::InvalidDimensions { dimensions: 0 });
        }
        Ok(Self(values))
    }

    /// Create a 1-dimensional vector.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self(vec![value])
    }

    /// Create a vector of `dimensions` zeros. `dimensions` must be at least 1.
    #[must_use]
    pub fn zeros(dimensions: usize) -> Self {
        Self::filled(dimensions, 0.0)
    }

    /// Create a vector with every component set to `value`.
    #[must_use]
    pub fn filled(dimensions: usize, value: f64) -> Self {
        debug_assert!(dimensions >= 1, "vectors need at least one dimension");
        Self(vec![value; dimensions])
    }

    /// Return the number of components.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Borrow the components.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consume and return the components.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Return `Ok(())` if `other` has the same dimension as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] otherwise.
    pub fn check_dimensions(&self, other: &Self) -> Result<(), DtwError> {
        if self.dimensions() != other.dimensions() {
            return Err(DtwError::DimensionMismatch {
                expected: self.dimensions(),
                got: other.dimensions(),
            });
        }
        Ok(())
    }

    fn assert_same_dimensions(&self, other: &[f64]) {
        assert!(
            self.0.len() == other.len(),
            "dimension mismatch: expected {}, got {}",
            self.0.len(),
            other.len()
        );
    }

    // --- in-place setters ---

    /// Copy the components of `other` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn set(&mut self, other: &Self) {
        self.set_slice(&other.0);
    }

    /// Copy `values` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the dimension.
    pub fn set_slice(&mut self, values: &[f64]) {
        self.assert_same_dimensions(values);
        self.0.copy_from_slice(values);
    }

    /// Set every component to `value`.
    pub fn fill(&mut self, value: f64) {
        self.0.fill(value);
    }

    /// Replace every component with its square root.
    pub fn sqrt(&mut self) {
        for v in &mut self.0 {
            *v = v.sqrt();
        }
    }

    /// Set `self` to the elementwise squared difference `(a - b)^2`.
    pub fn set_squared_distance(&mut self, a: &Self, b: &Self) {
        self.assert_same_dimensions(&a.0);
        self.assert_same_dimensions(&b.0);
        for ((out, &x), &y) in self.0.iter_mut().zip(&a.0).zip(&b.0) {
            let d = x - y;
            *out = d * d;
        }
    }

    /// Set `self` to the per-component squared distance from `value` to the band
    /// `[lower, upper]`, zero for components inside it.
    pub fn set_band_distance(&mut self, value: &Self, upper: &Self, lower: &Self) {
        self.assert_same_dimensions(&value.0);
        self.assert_same_dimensions(&upper.0);
        self.assert_same_dimensions(&lower.0);
        for (((out, &v), &u), &l) in self.0.iter_mut().zip(&value.0).zip(&upper.0).zip(&lower.0) {
            let d = if v > u {
                v - u
            } else if v < l {
                v - l
            } else {
                0.0
            };
            *out = d * d;
        }
    }

    /// Lower each component of `self` to the matching component of `other` where that is
    /// smaller. A NaN component of `self` stays NaN.
    pub fn keep_min(&mut self, other: &Self) {
        self.assert_same_dimensions(&other.0);
        for (a, &b) in self.0.iter_mut().zip(&other.0) {
            if b < *a {
                *a = b;
            }
        }
    }

    /// Set `self` to the z-normalized `(value - mean) / std`.
    pub fn set_normalized(&mut self, value: &Self, mean: &Self, std: &Self) {
        self.assert_same_dimensions(&value.0);
        self.assert_same_dimensions(&mean.0);
        self.assert_same_dimensions(&std.0);
        for (((out, &v), &m), &s) in self.0.iter_mut().zip(&value.0).zip(&mean.0).zip(&std.0) {
            *out = (v - m) / s;
        }
    }

    // --- reductions ---

    /// Euclidean norm. For a 1-dimensional vector this is the raw (signed) value.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        if self.0.len() == 1 {
            return self.0[0];
        }
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sum of the absolute values of the components.
    #[must_use]
    pub fn abs_sum(&self) -> f64 {
        self.0.iter().map(|v| v.abs()).sum()
    }

    // --- magnitude ordering ---

    /// Compare magnitudes. Unordered magnitudes (NaN) compare as equal.
    #[must_use]
    pub fn magnitude_cmp(&self, other: &Self) -> Ordering {
        self.magnitude()
            .partial_cmp(&other.magnitude())
            .unwrap_or(Ordering::Equal)
    }

    /// `|self| < |other|`
    #[must_use]
    pub fn magnitude_lt(&self, other: &Self) -> bool {
        self.magnitude() < other.magnitude()
    }

    /// `|self| <= |other|`
    #[must_use]
    pub fn magnitude_le(&self, other: &Self) -> bool {
        self.magnitude() <= other.magnitude()
    }

    /// `|self| > |other|`
    #[must_use]
    pub fn magnitude_gt(&self, other: &Self) -> bool {
        self.magnitude() > other.magnitude()
    }

    /// `|self| >= |other|`
    #[must_use]
    pub fn magnitude_ge(&self, other: &Self) -> bool {
        self.magnitude() >= other.magnitude()
    }

    // --- all-components ordering against a scalar ---

    /// True if every component is strictly below `bound`.
    #[must_use]
    pub fn all_components_below(&self, bound: f64) -> bool {
        self.0.iter().all(|&v| v < bound)
    }

    /// True if every component is at most `bound`.
    #[must_use]
    pub fn all_components_at_most(&self, bound: f64) -> bool {
        self.0.iter().all(|&v| v <= bound)
    }

    /// True if every component is strictly above `bound`.
    #[must_use]
    pub fn all_components_above(&self, bound: f64) -> bool {
        self.0.iter().all(|&v| v > bound)
    }

    /// True if every component is at least `bound`.
    #[must_use]
    pub fn all_components_at_least(&self, bound: f64) -> bool {
        self.0.iter().all(|&v| v >= bound)
    }

    // --- fallible arithmetic ---

    /// Elementwise sum.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] if the dimensions differ.
    pub fn try_add(&self, other: &Self) -> Result<Self, DtwError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise difference.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] if the dimensions differ.
    pub fn try_sub(&self, other: &Self) -> Result<Self, DtwError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Elementwise product.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] if the dimensions differ.
    pub fn try_mul(&self, other: &Self) -> Result<Self, DtwError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise quotient.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] if the dimensions differ.
    pub fn try_div(&self, other: &Self) -> Result<Self, DtwError> {
        self.zip_with(other, |a, b| a / b)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, DtwError> {
        self.check_dimensions(other)?;
        Ok(Self(self.0.iter().zip(&other.0).map(|(&a, &b)| f(a, b)).collect()))
    }
}

/// Return whichever of `x` and `y` has the smaller magnitude, preferring `y` on ties.
#[must_use]
pub fn min_by_magnitude<'a>(x: &'a Vector, y: &'a Vector) -> &'a Vector {
    if x.magnitude_lt(y) { x } else { y }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Vector {
    type Error = DtwError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<f64> for Vector {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

// In-place operators panic on a dimension mismatch; they run inside the scan loop where
// every operand comes from buffers sized for the same search.

impl AddAssign<&Vector> for Vector {
    fn add_assign(&mut self, rhs: &Vector) {
        self.assert_same_dimensions(&rhs.0);
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a += b;
        }
    }
}

impl SubAssign<&Vector> for Vector {
    fn sub_assign(&mut self, rhs: &Vector) {
        self.assert_same_dimensions(&rhs.0);
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a -= b;
        }
    }
}

impl MulAssign<&Vector> for Vector {
    fn mul_assign(&mut self, rhs: &Vector) {
        self.assert_same_dimensions(&rhs.0);
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a *= b;
        }
    }
}

impl DivAssign<&Vector> for Vector {
    fn div_assign(&mut self, rhs: &Vector) {
        self.assert_same_dimensions(&rhs.0);
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a /= b;
        }
    }
}

impl DivAssign<f64> for Vector {
    fn div_assign(&mut self, rhs: f64) {
        for a in &mut self.0 {
            *a /= rhs;
        }
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl Mul<&Vector> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &Vector) -> Vector {
        let mut out = self.clone();
        out *= rhs;
        out
    }
}
