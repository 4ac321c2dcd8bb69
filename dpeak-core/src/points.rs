//! Built-in dense point set with Euclidean distances.
//!
//! [`PointSet`] validates its rows once at construction (consistent
//! dimension, finite coordinates) so distance evaluation never has to
//! re-check individual coordinates.

use crate::{datasource::DataSource, error::DataSourceError};

/// An ordered, immutable set of D-dimensional points compared with the
/// Euclidean metric.
///
/// # Examples
/// ```
/// use dpeak_core::{DataSource, PointSet};
///
/// let points = PointSet::new("demo", vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.dimension(), 2);
/// assert!((points.distance(0, 1)? - 5.0).abs() < 1e-6);
/// # Ok::<(), dpeak_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    coords: Vec<f32>,
    dimension: usize,
    name: String,
}

impl PointSet {
    /// Creates a point set from row vectors.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] when `rows` is empty,
    /// [`DataSourceError::ZeroDimension`] when the first row is empty,
    /// [`DataSourceError::DimensionMismatch`] when a row's width disagrees
    /// with the first row, and [`DataSourceError::NonFinite`] when any
    /// coordinate is NaN or infinite.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<f32>>) -> Result<Self, DataSourceError> {
        let Some(first) = rows.first() else {
            return Err(DataSourceError::EmptyData);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(DataSourceError::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(rows.len() * dimension);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != dimension {
                return Err(DataSourceError::DimensionMismatch {
                    row,
                    got: values.len(),
                    expected: dimension,
                });
            }
            for (column, &value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(DataSourceError::NonFinite { row, column, value });
                }
                coords.push(value);
            }
        }

        Ok(Self {
            coords,
            dimension,
            name: name.into(),
        })
    }

    /// Returns the dimensionality shared by every point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the coordinates of point `index`, if it exists.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        self.coords.get(start..start + self.dimension)
    }
}

impl DataSource for PointSet {
    fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let left = self
            .row(i)
            .ok_or(DataSourceError::OutOfBounds { index: i })?;
        let right = self
            .row(j)
            .ok_or(DataSourceError::OutOfBounds { index: j })?;
        Ok(euclidean(left, right))
    }
}

/// Squared differences accumulate in `f64` to limit rounding drift before the
/// final square root narrows back to `f32`.
fn euclidean(left: &[f32], right: &[f32]) -> f32 {
    let sum: f64 = left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| {
            let diff = f64::from(l) - f64::from(r);
            diff * diff
        })
        .sum();
    sum.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rejects_empty_rows() {
        let err = PointSet::new("empty", vec![]).expect_err("empty rows must fail");
        assert_eq!(err, DataSourceError::EmptyData);
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = PointSet::new("flat", vec![vec![]]).expect_err("zero dimension must fail");
        assert_eq!(err, DataSourceError::ZeroDimension);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = PointSet::new("ragged", vec![vec![1.0, 2.0], vec![3.0]])
            .expect_err("ragged rows must fail");
        assert_eq!(
            err,
            DataSourceError::DimensionMismatch {
                row: 1,
                got: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let err = PointSet::new("nan", vec![vec![0.0, f32::NAN]])
            .expect_err("non-finite coordinate must fail");
        assert!(matches!(
            err,
            DataSourceError::NonFinite {
                row: 0,
                column: 1,
                ..
            }
        ));
    }

    #[rstest]
    #[case(vec![0.0, 0.0], vec![3.0, 4.0], 5.0)]
    #[case(vec![1.0, 1.0], vec![1.0, 1.0], 0.0)]
    #[case(vec![-2.0, 0.0], vec![2.0, 0.0], 4.0)]
    fn euclidean_distances(#[case] a: Vec<f32>, #[case] b: Vec<f32>, #[case] expected: f32) {
        let points = PointSet::new("pairs", vec![a, b]).expect("rows are well-formed");
        let distance = points.distance(0, 1).expect("indices are valid");
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_rejects_out_of_bounds() {
        let points = PointSet::new("short", vec![vec![0.0], vec![1.0]]).expect("valid rows");
        let err = points.distance(0, 2).expect_err("index 2 is out of bounds");
        assert_eq!(err, DataSourceError::OutOfBounds { index: 2 });
    }
}
