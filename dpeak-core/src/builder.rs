//! Builder utilities for configuring density-peak clustering runs.
//!
//! Exposes the tie-break policy surface and builder validation used before
//! constructing [`Dpc`] instances.

use crate::{Result, dpc::Dpc, error::DpcError};

/// Default cutoff quantile: the 2% quantile of the pairwise distances.
pub(crate) const DEFAULT_CUTOFF_QUANTILE: f64 = 0.02;

/// Policy for resolving equal gamma scores during centre selection.
///
/// Different languages' sort-stability guarantees vary, so the rule is
/// explicit rather than implied by the sort. Both policies are deterministic
/// and both keep the globally densest point at the top of the ranking.
///
/// # Examples
/// ```
/// use dpeak_core::TieBreak;
///
/// assert_eq!(TieBreak::default(), TieBreak::LowerIndex);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// On equal gamma, the lower original index wins.
    #[default]
    LowerIndex,
    /// On equal gamma, the higher density wins; remaining ties fall back to
    /// the lower original index.
    HigherDensity,
}

/// Configures and constructs [`Dpc`] instances.
///
/// # Examples
/// ```
/// use dpeak_core::{DpcBuilder, TieBreak};
///
/// let dpc = DpcBuilder::new()
///     .with_cluster_count(3)
///     .with_cutoff_quantile(0.05)
///     .with_tie_break(TieBreak::HigherDensity)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(dpc.cluster_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DpcBuilder {
    cluster_count: usize,
    cutoff_quantile: f64,
    tie_break: TieBreak,
}

impl Default for DpcBuilder {
    fn default() -> Self {
        Self {
            cluster_count: 1,
            cutoff_quantile: DEFAULT_CUTOFF_QUANTILE,
            tie_break: TieBreak::default(),
        }
    }
}

impl DpcBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use dpeak_core::{DpcBuilder, TieBreak};
    ///
    /// let builder = DpcBuilder::new();
    /// assert_eq!(builder.cluster_count(), 1);
    /// assert_eq!(builder.cutoff_quantile(), 0.02);
    /// assert_eq!(builder.tie_break(), TieBreak::LowerIndex);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of clusters to extract.
    #[must_use]
    pub fn with_cluster_count(mut self, cluster_count: usize) -> Self {
        self.cluster_count = cluster_count;
        self
    }

    /// Returns the configured cluster count.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Overrides the cutoff quantile used to derive the density radius.
    #[must_use]
    pub fn with_cutoff_quantile(mut self, cutoff_quantile: f64) -> Self {
        self.cutoff_quantile = cutoff_quantile;
        self
    }

    /// Returns the configured cutoff quantile.
    #[must_use]
    pub fn cutoff_quantile(&self) -> f64 {
        self.cutoff_quantile
    }

    /// Overrides the gamma tie-break policy.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Returns the configured tie-break policy.
    #[must_use]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Validates the configuration and constructs a [`Dpc`] instance.
    ///
    /// # Errors
    /// Returns [`DpcError::InvalidClusterCount`] when the cluster count is
    /// zero and [`DpcError::InvalidCutoffQuantile`] when the quantile falls
    /// outside `[0, 1)`.
    ///
    /// # Examples
    /// ```
    /// use dpeak_core::DpcBuilder;
    ///
    /// let err = DpcBuilder::new().with_cluster_count(0).build().unwrap_err();
    /// assert_eq!(err.code().as_str(), "DPC_INVALID_CLUSTER_COUNT");
    /// ```
    pub fn build(self) -> Result<Dpc> {
        if self.cluster_count == 0 {
            return Err(DpcError::InvalidClusterCount {
                got: self.cluster_count,
            });
        }
        if !(0.0..1.0).contains(&self.cutoff_quantile) {
            return Err(DpcError::InvalidCutoffQuantile {
                got: self.cutoff_quantile,
            });
        }

        Ok(Dpc::new(
            self.cluster_count,
            self.cutoff_quantile,
            self.tie_break,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0)]
    #[case(1.5)]
    #[case(-0.1)]
    #[case(f64::NAN)]
    fn build_rejects_out_of_range_quantiles(#[case] quantile: f64) {
        let err = DpcBuilder::new()
            .with_cutoff_quantile(quantile)
            .build()
            .expect_err("quantile outside [0, 1) must fail");
        assert!(matches!(err, DpcError::InvalidCutoffQuantile { .. }));
    }

    #[test]
    fn build_rejects_zero_cluster_count() {
        let err = DpcBuilder::new()
            .with_cluster_count(0)
            .build()
            .expect_err("zero clusters must fail");
        assert_eq!(err, DpcError::InvalidClusterCount { got: 0 });
    }

    #[test]
    fn build_accepts_the_quantile_boundaries() {
        assert!(DpcBuilder::new().with_cutoff_quantile(0.0).build().is_ok());
        assert!(DpcBuilder::new().with_cutoff_quantile(0.999).build().is_ok());
    }
}
