//! Data source abstractions for the dpeak core runtime.

use crate::error::DataSourceError;

/// Abstraction over a collection of items that can yield pairwise distances.
///
/// Implementations must be symmetric (`distance(i, j) == distance(j, i)`),
/// non-negative, and zero on the diagonal; the distance matrix builder relies
/// on those properties when it mirrors the upper triangle.
///
/// # Examples
/// ```
/// use dpeak_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f32>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let src = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(src.len(), 3);
/// assert_eq!(src.name(), "line");
/// assert_eq!(src.distance(0, 2)?, 3.0);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns number of items in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no items.
    ///
    /// # Examples
    /// ```
    /// use dpeak_core::{DataSource, DataSourceError};
    /// struct Empty;
    /// impl DataSource for Empty {
    ///     fn len(&self) -> usize { 0 }
    ///     fn name(&self) -> &str { "empty" }
    ///     fn distance(&self, _: usize, _: usize) -> Result<f32, DataSourceError> { Ok(0.0) }
    /// }
    /// let src = Empty;
    /// assert!(src.is_empty());
    /// ```
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Computes the distance between two items.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] for invalid indices.
    /// Implementations must not yield non-finite distances.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;
}
