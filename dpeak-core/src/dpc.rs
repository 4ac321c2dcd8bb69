//! Core clustering orchestration for the dpeak library.
//!
//! Provides the [`Dpc`] runtime entry point that chains the pipeline stages:
//! distance matrix, cutoff-kernel density, delta/nearest-denser computation,
//! gamma-ranked centre selection, and label propagation.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::{
    Result,
    builder::TieBreak,
    centers::select_centers,
    datasource::DataSource,
    delta::{delta_from_order, density_order},
    density::{cutoff_radius, local_density},
    error::{DataSourceError, DpcError},
    labels::propagate_labels,
    matrix::DistanceMatrix,
    result::DpcResult,
};

/// Entry point for running the density-peak clustering pipeline.
///
/// # Examples
/// ```
/// use dpeak_core::{DpcBuilder, PointSet};
///
/// let points = PointSet::new(
///     "demo",
///     vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![10.0]],
/// )?;
/// let dpc = DpcBuilder::new()
///     .with_cluster_count(2)
///     .with_cutoff_quantile(0.6)
///     .build()?;
/// let result = dpc.run(&points)?;
/// let labels: Vec<usize> = result.labels().iter().map(|id| id.get()).collect();
/// assert_eq!(labels, vec![1, 1, 2, 2, 2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dpc {
    cluster_count: usize,
    cutoff_quantile: f64,
    tie_break: TieBreak,
}

impl Dpc {
    pub(crate) const fn new(
        cluster_count: usize,
        cutoff_quantile: f64,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            cluster_count,
            cutoff_quantile,
            tie_break,
        }
    }

    /// Returns the number of clusters this instance extracts.
    #[must_use]
    pub const fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the configured cutoff quantile.
    #[must_use]
    pub const fn cutoff_quantile(&self) -> f64 {
        self.cutoff_quantile
    }

    /// Returns the configured gamma tie-break policy.
    #[must_use]
    pub const fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Executes the clustering pipeline against the provided [`DataSource`].
    ///
    /// The computation is a pure function of the source and the configured
    /// parameters: re-running over the same input yields bit-identical
    /// labels, densities, and deltas.
    ///
    /// # Errors
    /// Returns [`DpcError::EmptySource`] when the source is empty,
    /// [`DpcError::InsufficientItems`] when it holds fewer than two items,
    /// [`DpcError::ClusterCountExceedsItems`] when more clusters were
    /// requested than items exist, and [`DpcError::DataSource`] when the
    /// source fails while distances are evaluated.
    pub fn run<D: DataSource + Sync>(&self, source: &D) -> Result<DpcResult> {
        let items = source.len();
        self.run_with_len(source, items)
    }

    #[instrument(
        name = "dpc.run",
        err,
        skip(self, source),
        fields(
            data_source = %source.name(),
            items = items,
            cluster_count = self.cluster_count,
            cutoff_quantile = self.cutoff_quantile,
            tie_break = ?self.tie_break,
        ),
    )]
    fn run_with_len<D: DataSource + Sync>(&self, source: &D, items: usize) -> Result<DpcResult> {
        if items == 0 {
            return Err(DpcError::EmptySource {
                data_source: Arc::from(source.name()),
            });
        }
        if items < 2 {
            return Err(DpcError::InsufficientItems {
                data_source: Arc::from(source.name()),
                items,
                required: 2,
            });
        }
        if self.cluster_count > items {
            return Err(DpcError::ClusterCountExceedsItems {
                data_source: Arc::from(source.name()),
                items,
                cluster_count: self.cluster_count,
            });
        }

        let matrix = DistanceMatrix::build(source)
            .map_err(|error| self.wrap_datasource_error(source, error))?;

        let radius = cutoff_radius(&matrix, self.cutoff_quantile);
        let density = local_density(&matrix, radius);
        if density.iter().all(|&d| d == 0) {
            warn!(
                data_source = source.name(),
                radius, "density degenerated to all zeros; labelling will be low-quality"
            );
        }

        let order = density_order(&density);
        let (delta, nearest_denser) = delta_from_order(&matrix, &order);
        let centers = select_centers(&density, &delta, self.cluster_count, self.tie_break);
        let labels = propagate_labels(&order, &centers, &nearest_denser)?;

        DpcResult::try_from_parts(labels, density, delta, nearest_denser, centers, radius)
            .map_err(|_| DpcError::InvariantViolation {
                context: "validating the propagated labelling",
            })
    }

    fn wrap_datasource_error<D: DataSource>(&self, source: &D, error: DataSourceError) -> DpcError {
        DpcError::DataSource {
            data_source: Arc::from(source.name()),
            error,
        }
    }
}
