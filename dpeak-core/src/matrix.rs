//! Pairwise distance matrix construction.
//!
//! The matrix is dense, symmetric, and has a zero diagonal. Construction
//! evaluates each unordered pair once: rows of the upper triangle are filled
//! independently (in parallel when the `parallel` feature is enabled, one
//! worker per disjoint row slice) and the lower triangle is mirrored
//! afterwards.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{datasource::DataSource, error::DataSourceError};

/// Dense symmetric matrix of pairwise distances.
///
/// # Examples
/// ```
/// use dpeak_core::{DistanceMatrix, PointSet};
///
/// let points = PointSet::new("demo", vec![vec![0.0], vec![1.0], vec![3.0]])?;
/// let matrix = DistanceMatrix::build(&points)?;
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix.get(0, 2), matrix.get(2, 0));
/// assert_eq!(matrix.get(1, 1), 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    cells: Vec<f32>,
    items: usize,
}

impl DistanceMatrix {
    /// Builds the full pairwise matrix from a [`DataSource`].
    ///
    /// # Errors
    /// Propagates any [`DataSourceError`] raised while evaluating distances.
    pub fn build<D: DataSource + Sync>(source: &D) -> Result<Self, DataSourceError> {
        let items = source.len();
        let mut cells = vec![0.0_f32; items * items];

        fill_upper_triangle(source, &mut cells, items)?;

        // Mirror the upper triangle; sources are required to be symmetric.
        for i in 0..items {
            for j in (i + 1)..items {
                cells[j * items + i] = cells[i * items + j];
            }
        }

        Ok(Self { cells, items })
    }

    /// Returns the number of items the matrix covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
    }

    /// Returns whether the matrix covers no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Returns the distance between items `i` and `j`.
    ///
    /// # Panics
    /// Panics when either index is out of bounds, like slice indexing.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.items && j < self.items, "index out of bounds");
        self.cells[i * self.items + j]
    }

    /// Returns the row of distances from item `i` to every item.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.cells[i * self.items..(i + 1) * self.items]
    }

    /// Collects the condensed upper-triangular distances (`i < j`).
    ///
    /// The result has `n * (n - 1) / 2` entries in row-major pair order.
    #[must_use]
    pub fn condensed(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.items * self.items.saturating_sub(1) / 2);
        for i in 0..self.items {
            out.extend_from_slice(&self.row(i)[i + 1..]);
        }
        out
    }
}

#[cfg(feature = "parallel")]
fn fill_upper_triangle<D: DataSource + Sync>(
    source: &D,
    cells: &mut [f32],
    items: usize,
) -> Result<(), DataSourceError> {
    cells
        .par_chunks_mut(items.max(1))
        .enumerate()
        .try_for_each(|(i, row)| {
            for j in (i + 1)..items {
                row[j] = source.distance(i, j)?;
            }
            Ok(())
        })
}

#[cfg(not(feature = "parallel"))]
fn fill_upper_triangle<D: DataSource + Sync>(
    source: &D,
    cells: &mut [f32],
    items: usize,
) -> Result<(), DataSourceError> {
    for i in 0..items {
        for j in (i + 1)..items {
            cells[i * items + j] = source.distance(i, j)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingSource, LineSource};

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let source = LineSource::new("line", vec![0.0, 1.0, 4.0, 9.0]);
        let matrix = DistanceMatrix::build(&source).expect("build must succeed");

        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        assert_eq!(matrix.get(0, 3), 9.0);
        assert_eq!(matrix.get(2, 1), 3.0);
    }

    #[test]
    fn condensed_covers_every_unordered_pair() {
        let source = LineSource::new("line", vec![0.0, 1.0, 3.0]);
        let matrix = DistanceMatrix::build(&source).expect("build must succeed");

        assert_eq!(matrix.condensed(), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn build_propagates_source_errors() {
        let source = FailingSource::new("broken", 3);
        let err = DistanceMatrix::build(&source).expect_err("broken source must fail");
        assert!(matches!(err, DataSourceError::OutOfBounds { .. }));
    }
}
