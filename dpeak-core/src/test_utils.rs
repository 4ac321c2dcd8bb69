//! Shared test utilities for `dpeak-core`.

use crate::{datasource::DataSource, error::DataSourceError, matrix::DistanceMatrix};

/// One-dimensional [`DataSource`] over scalar positions, compared by absolute
/// difference. Small enough to reason about distance distributions by hand.
pub(crate) struct LineSource {
    values: Vec<f32>,
    name: &'static str,
}

impl LineSource {
    pub(crate) fn new(name: &'static str, values: Vec<f32>) -> Self {
        Self { values, name }
    }
}

impl DataSource for LineSource {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let a = self
            .values
            .get(i)
            .ok_or(DataSourceError::OutOfBounds { index: i })?;
        let b = self
            .values
            .get(j)
            .ok_or(DataSourceError::OutOfBounds { index: j })?;
        Ok((a - b).abs())
    }
}

/// A source that reports a length but fails every distance evaluation, for
/// exercising error propagation through the pipeline.
pub(crate) struct FailingSource {
    name: &'static str,
    items: usize,
}

impl FailingSource {
    pub(crate) fn new(name: &'static str, items: usize) -> Self {
        Self { name, items }
    }
}

impl DataSource for FailingSource {
    fn len(&self) -> usize {
        self.items
    }

    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, i: usize, _j: usize) -> Result<f32, DataSourceError> {
        Err(DataSourceError::OutOfBounds { index: i })
    }
}

/// Builds a distance matrix over scalar positions.
pub(crate) fn build_matrix(values: &[f32]) -> DistanceMatrix {
    let source = LineSource::new("fixture", values.to_vec());
    DistanceMatrix::build(&source).expect("fixture matrix must build")
}
