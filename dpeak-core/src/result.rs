//! Result types for density-peak clustering runs.
//!
//! Bundles the cluster labels with the per-point diagnostics (density, delta,
//! nearest denser neighbour) a decision-graph consumer needs, and validates
//! the labelling invariants before a result can exist.

use std::collections::HashSet;
use thiserror::Error;

/// Identifier assigned to a cluster. Valid ids start at `1`.
///
/// # Examples
/// ```
/// use dpeak_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// Error returned when a labelling violates the pipeline's invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LabelingViolation {
    /// A label fell outside the valid `1..=cluster_count` range.
    #[error("label {label} at point {point} is outside 1..={cluster_count}")]
    OutOfRange {
        /// Point carrying the offending label.
        point: usize,
        /// The offending label value.
        label: usize,
        /// Number of clusters the labelling must cover.
        cluster_count: usize,
    },
    /// Some cluster id in `1..=cluster_count` was never assigned.
    #[error("cluster {cluster} has no member points")]
    MissingCluster {
        /// The unassigned cluster id.
        cluster: usize,
    },
    /// Diagnostic vectors disagreed on the number of points.
    #[error("diagnostic vectors disagree on length: labels={labels}, {field}={got}")]
    LengthMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Name of the disagreeing field.
        field: &'static str,
        /// Length of the disagreeing field.
        got: usize,
    },
}

/// Output of a [`Dpc::run`](crate::Dpc::run) invocation.
///
/// # Examples
/// ```
/// use dpeak_core::{DpcBuilder, PointSet};
///
/// let points = PointSet::new("demo", vec![vec![0.0], vec![3.0]])?;
/// let dpc = DpcBuilder::new().with_cluster_count(1).build()?;
/// let result = dpc.run(&points)?;
/// assert_eq!(result.labels().len(), 2);
/// assert_eq!(result.cluster_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DpcResult {
    labels: Vec<ClusterId>,
    density: Vec<usize>,
    delta: Vec<f32>,
    nearest_denser: Vec<Option<usize>>,
    centers: Vec<usize>,
    cutoff_radius: f32,
    cluster_count: usize,
}

impl DpcResult {
    /// Attempts to build a result, checking the labelling invariants: every
    /// label lies in `1..=centers.len()`, every cluster id is used, and the
    /// diagnostic vectors cover the same points as the labels.
    ///
    /// # Errors
    /// Returns the first [`LabelingViolation`] encountered.
    pub fn try_from_parts(
        labels: Vec<ClusterId>,
        density: Vec<usize>,
        delta: Vec<f32>,
        nearest_denser: Vec<Option<usize>>,
        centers: Vec<usize>,
        cutoff_radius: f32,
    ) -> Result<Self, LabelingViolation> {
        let items = labels.len();
        check_length(items, "density", density.len())?;
        check_length(items, "delta", delta.len())?;
        check_length(items, "nearest_denser", nearest_denser.len())?;

        let cluster_count = centers.len();
        let mut seen = HashSet::with_capacity(cluster_count);
        for (point, label) in labels.iter().enumerate() {
            let value = label.get();
            if value == 0 || value > cluster_count {
                return Err(LabelingViolation::OutOfRange {
                    point,
                    label: value,
                    cluster_count,
                });
            }
            seen.insert(value);
        }
        for cluster in 1..=cluster_count {
            if !seen.contains(&cluster) {
                return Err(LabelingViolation::MissingCluster { cluster });
            }
        }

        Ok(Self {
            labels,
            density,
            delta,
            nearest_denser,
            centers,
            cutoff_radius,
            cluster_count,
        })
    }

    /// Returns the per-point cluster labels, ids in `1..=cluster_count`.
    #[must_use]
    pub fn labels(&self) -> &[ClusterId] {
        &self.labels
    }

    /// Returns the per-point local densities.
    #[must_use]
    pub fn density(&self) -> &[usize] {
        &self.density
    }

    /// Returns the per-point distances to the nearest denser point.
    #[must_use]
    pub fn delta(&self) -> &[f32] {
        &self.delta
    }

    /// Returns, per point, the index realizing its delta. `None` only for the
    /// globally densest point.
    #[must_use]
    pub fn nearest_denser(&self) -> &[Option<usize>] {
        &self.nearest_denser
    }

    /// Returns the selected centre indices in gamma-rank order.
    #[must_use]
    pub fn centers(&self) -> &[usize] {
        &self.centers
    }

    /// Returns the cutoff radius derived from the distance distribution.
    #[must_use]
    pub fn cutoff_radius(&self) -> f32 {
        self.cutoff_radius
    }

    /// Returns the number of clusters in the labelling.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns whether the density estimate degenerated to all zeros.
    ///
    /// Degenerate runs still produce a valid labelling; callers decide how
    /// much to trust it.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.density.iter().all(|&d| d == 0)
    }
}

fn check_length(labels: usize, field: &'static str, got: usize) -> Result<(), LabelingViolation> {
    if labels == got {
        Ok(())
    } else {
        Err(LabelingViolation::LengthMismatch { labels, field, got })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ids: &[usize]) -> Vec<ClusterId> {
        ids.iter().map(|&id| ClusterId::new(id)).collect()
    }

    fn try_result(ids: &[usize], centers: Vec<usize>) -> Result<DpcResult, LabelingViolation> {
        let items = ids.len();
        DpcResult::try_from_parts(
            labels(ids),
            vec![0; items],
            vec![0.0; items],
            vec![None; items],
            centers,
            1.0,
        )
    }

    #[test]
    fn accepts_a_complete_labelling() {
        let result = try_result(&[1, 2, 1, 2], vec![0, 1]).expect("labelling is valid");
        assert_eq!(result.cluster_count(), 2);
        assert!(result.is_degenerate());
    }

    #[test]
    fn rejects_labels_outside_the_cluster_range() {
        let err = try_result(&[1, 3], vec![0, 1]).expect_err("label 3 exceeds k=2");
        assert_eq!(
            err,
            LabelingViolation::OutOfRange {
                point: 1,
                label: 3,
                cluster_count: 2
            }
        );
    }

    #[test]
    fn rejects_zero_labels() {
        let err = try_result(&[0, 1], vec![0]).expect_err("label 0 is reserved");
        assert!(matches!(err, LabelingViolation::OutOfRange { label: 0, .. }));
    }

    #[test]
    fn rejects_unused_cluster_ids() {
        let err = try_result(&[1, 1], vec![0, 1]).expect_err("cluster 2 has no members");
        assert_eq!(err, LabelingViolation::MissingCluster { cluster: 2 });
    }

    #[test]
    fn rejects_mismatched_diagnostics() {
        let err = DpcResult::try_from_parts(
            labels(&[1]),
            vec![0, 0],
            vec![0.0],
            vec![None],
            vec![0],
            1.0,
        )
        .expect_err("density length disagrees");
        assert!(matches!(
            err,
            LabelingViolation::LengthMismatch {
                field: "density",
                ..
            }
        ));
    }
}
