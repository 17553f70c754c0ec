//! Linear-interpolation resampling of a series to a new length.

use tracing::{debug, instrument};
use warpscan_dtw::Vector;

use crate::IoError;

/// Resample `rows` to `new_length` points by per-dimension linear interpolation.
///
/// The first and last points are kept as is; interior point `i` is read at the fractional
/// source position `i * (len - 1) / (new_length - 1)`. Equal lengths return a copy.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::InvalidStretchLength`] | `rows` is empty, or `new_length < 2` while differing from `rows.len()` |
#[instrument(skip(rows), fields(source_len = rows.len()))]
pub fn stretch(rows: &[Vector], new_length: usize) -> Result<Vec<Vector>, IoError> {
    let source_len = rows.len();
    if source_len == new_length && source_len > 0 {
        return Ok(rows.to_vec());
    }
    if source_len == 0 || new_length < 2 {
        return Err(IoError::InvalidStretchLength {
            source_len,
            new_length,
        });
    }
    if source_len == 1 {
        return Ok(vec![rows[0].clone(); new_length]);
    }

    let ratio = (source_len - 1) as f64 / (new_length - 1) as f64;
    let mut out = Vec::with_capacity(new_length);
    out.push(rows[0].clone());
    for i in 1..new_length - 1 {
        let position = i as f64 * ratio;
        let index = (position.floor() as usize).min(source_len - 2);
        let alpha = position - index as f64;
        let lo = rows[index].as_slice();
        let hi = rows[index + 1].as_slice();
        let values = lo
            .iter()
            .zip(hi)
            .map(|(&a, &b)| alpha * (b - a) + a)
            .collect();
        out.push(Vector::new(values)?);
    }
    out.push(rows[source_len - 1].clone());

    debug!(new_length, "series stretched");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalars(values: &[f64]) -> Vec<Vector> {
        values.iter().map(|&v| Vector::scalar(v)).collect()
    }

    fn values(rows: &[Vector]) -> Vec<f64> {
        rows.iter().map(|v| v[0]).collect()
    }

    #[test]
    fn equal_length_is_identity() {
        let rows = scalars(&[3.0, 1.0, 2.0]);
        assert_eq!(stretch(&rows, 3).unwrap(), rows);
    }

    #[test]
    fn doubling_interpolates_midpoints() {
        let rows = scalars(&[0.0, 2.0, 4.0]);
        let out = stretch(&rows, 5).unwrap();
        let got = values(&out);
        for (g, e) in got.iter().zip([0.0, 1.0, 2.0, 3.0, 4.0]) {
            assert!((g - e).abs() < 1e-12, "got {got:?}");
        }
    }

    #[test]
    fn shrinking_keeps_endpoints() {
        let rows = scalars(&[1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 4.0]);
        let out = stretch(&rows, 3).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0][0], 1.0);
        assert_eq!(out[2][0], 4.0);
        // middle point sits exactly on source index 3
        assert!((out[1][0] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn interpolates_each_dimension_independently() {
        let rows = vec![
            Vector::new(vec![0.0, 10.0]).unwrap(),
            Vector::new(vec![1.0, 0.0]).unwrap(),
        ];
        let out = stretch(&rows, 3).unwrap();
        assert!((out[1][0] - 0.5).abs() < 1e-12);
        assert!((out[1][1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_is_repeated() {
        let out = stretch(&scalars(&[7.0]), 4).unwrap();
        assert_eq!(values(&out), vec![7.0; 4]);
    }

    #[test]
    fn rejects_degenerate_lengths() {
        assert!(matches!(
            stretch(&scalars(&[1.0, 2.0, 3.0]), 1),
            Err(IoError::InvalidStretchLength {
                source_len: 3,
                new_length: 1
            })
        ));
        assert!(matches!(
            stretch(&[], 4),
            Err(IoError::InvalidStretchLength { source_len: 0, .. })
        ));
    }
}
