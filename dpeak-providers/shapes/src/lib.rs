//! Shape-file provider: whitespace-delimited point datasets.
//!
//! Parses the classic clustering benchmark format where every line holds
//! either `x y` or `x y label`, with blank lines and `#` comments skipped.
//! The coordinates become a [`PointSet`]; the optional third column becomes a
//! ground-truth labelling for external evaluation.

use std::io::{self, BufRead};

use dpeak_core::{DataSourceError, PointSet};
use thiserror::Error;

/// Errors raised while loading a shape dataset.
#[derive(Debug, Error)]
pub enum ShapeDatasetError {
    /// Reading from the underlying source failed.
    #[error("failed to read input: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The input contained no data rows.
    #[error("input contains no data rows")]
    EmptyInput,
    /// A row had a column count other than 2 or 3.
    #[error("line {line} has {got} columns; expected 2 (x y) or 3 (x y label)")]
    UnsupportedColumnCount {
        /// One-based line number of the offending row.
        line: usize,
        /// Number of whitespace-separated columns found.
        got: usize,
    },
    /// A row's column count disagreed with the first data row.
    #[error("line {line} has {got} columns but the first data row has {expected}")]
    InconsistentColumns {
        /// One-based line number of the offending row.
        line: usize,
        /// Number of columns found.
        got: usize,
        /// Number of columns established by the first data row.
        expected: usize,
    },
    /// A coordinate failed to parse as a float.
    #[error("line {line}, column {column}: `{value}` is not a valid coordinate")]
    InvalidCoordinate {
        /// One-based line number of the offending row.
        line: usize,
        /// One-based column of the offending value.
        column: usize,
        /// The raw token that failed to parse.
        value: String,
    },
    /// A ground-truth label was not a non-negative integer.
    #[error("line {line}: `{value}` is not a valid ground-truth label")]
    InvalidLabel {
        /// One-based line number of the offending row.
        line: usize,
        /// The raw token that failed to parse.
        value: String,
    },
    /// The parsed coordinates violated a [`PointSet`] invariant.
    #[error(transparent)]
    Points(#[from] DataSourceError),
}

/// A parsed shape dataset: points plus optional ground-truth labels.
///
/// # Examples
/// ```
/// use dpeak_providers_shapes::ShapeDataset;
///
/// let input = "0.0 0.0 1\n0.0 1.0 1\n9.0 9.0 2\n";
/// let dataset = ShapeDataset::try_from_reader("demo", input.as_bytes())?;
/// assert_eq!(dpeak_core::DataSource::len(dataset.points()), 3);
/// assert_eq!(dataset.ground_truth(), Some(&[1, 1, 2][..]));
/// # Ok::<(), dpeak_providers_shapes::ShapeDatasetError>(())
/// ```
#[derive(Debug)]
pub struct ShapeDataset {
    points: PointSet,
    ground_truth: Option<Vec<usize>>,
}

impl ShapeDataset {
    /// Parses a dataset from a buffered reader.
    ///
    /// The first data row fixes the column count; every later row must match
    /// it. Rows of width 3 carry an integral, non-negative ground-truth label
    /// in the third column.
    ///
    /// # Errors
    /// Returns [`ShapeDatasetError`] when reading fails, the input is empty
    /// or ragged, or a token does not parse.
    pub fn try_from_reader(
        name: impl Into<String>,
        reader: impl BufRead,
    ) -> Result<Self, ShapeDatasetError> {
        let mut rows: Vec<Vec<f32>> = Vec::new();
        let mut labels: Vec<usize> = Vec::new();
        let mut expected_columns: Option<usize> = None;

        for (index, read) in reader.lines().enumerate() {
            let line = index + 1;
            let text = read.map_err(|source| ShapeDatasetError::Read { source })?;
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            let columns = tokens.len();
            match expected_columns {
                None => {
                    if columns != 2 && columns != 3 {
                        return Err(ShapeDatasetError::UnsupportedColumnCount {
                            line,
                            got: columns,
                        });
                    }
                    expected_columns = Some(columns);
                }
                Some(expected) if columns != expected => {
                    return Err(ShapeDatasetError::InconsistentColumns {
                        line,
                        got: columns,
                        expected,
                    });
                }
                Some(_) => {}
            }

            let x = parse_coordinate(tokens[0], line, 1)?;
            let y = parse_coordinate(tokens[1], line, 2)?;
            rows.push(vec![x, y]);

            if let Some(&token) = tokens.get(2) {
                labels.push(parse_label(token, line)?);
            }
        }

        if rows.is_empty() {
            return Err(ShapeDatasetError::EmptyInput);
        }

        let ground_truth = (!labels.is_empty()).then_some(labels);
        let points = PointSet::new(name, rows)?;
        Ok(Self {
            points,
            ground_truth,
        })
    }

    /// Returns the parsed point set.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Returns the ground-truth labels when the file carried a third column.
    #[must_use]
    pub fn ground_truth(&self) -> Option<&[usize]> {
        self.ground_truth.as_deref()
    }

    /// Splits the dataset into its point set and optional labels.
    #[must_use]
    pub fn into_parts(self) -> (PointSet, Option<Vec<usize>>) {
        (self.points, self.ground_truth)
    }
}

fn parse_coordinate(token: &str, line: usize, column: usize) -> Result<f32, ShapeDatasetError> {
    token
        .parse::<f32>()
        .map_err(|_| ShapeDatasetError::InvalidCoordinate {
            line,
            column,
            value: token.to_owned(),
        })
}

/// Labels are stored as floats in several published shape files, so accept
/// any non-negative integral float.
fn parse_label(token: &str, line: usize) -> Result<usize, ShapeDatasetError> {
    let invalid = || ShapeDatasetError::InvalidLabel {
        line,
        value: token.to_owned(),
    };
    let value = token.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(invalid());
    }
    Ok(value as usize)
}
