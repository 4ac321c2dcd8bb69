//! Cutoff-kernel density estimation.
//!
//! The cutoff radius is a low quantile of the condensed pairwise distances;
//! a point's density is the number of other points strictly inside that
//! radius. Counting proceeds per row so parallel workers never share a
//! counter.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::matrix::DistanceMatrix;

/// Derives the cutoff radius from the `quantile` of the sorted condensed
/// distances.
///
/// The selected index is `round(count * quantile) - 1`, clamped into the
/// valid range; with very small quantiles this lands on the smallest
/// distance, which yields an all-zero (degenerate) density under the strict
/// comparison below.
pub(crate) fn cutoff_radius(matrix: &DistanceMatrix, quantile: f64) -> f32 {
    let mut condensed = matrix.condensed();
    sort_distances(&mut condensed);

    let count = condensed.len();
    if count == 0 {
        return 0.0;
    }

    let position = (count as f64 * quantile).round() as i64 - 1;
    let index = position.clamp(0, count as i64 - 1) as usize;
    condensed[index]
}

/// Counts, per point, how many other points fall strictly inside `radius`.
pub(crate) fn local_density(matrix: &DistanceMatrix, radius: f32) -> Vec<usize> {
    let items = matrix.len();
    map_rows(items, |i| {
        matrix
            .row(i)
            .iter()
            .enumerate()
            .filter(|&(j, &d)| j != i && d < radius)
            .count()
    })
}

#[cfg(feature = "parallel")]
fn sort_distances(distances: &mut [f32]) {
    distances.par_sort_unstable_by(f32::total_cmp);
}

#[cfg(not(feature = "parallel"))]
fn sort_distances(distances: &mut [f32]) {
    distances.sort_unstable_by(f32::total_cmp);
}

#[cfg(feature = "parallel")]
fn map_rows(items: usize, per_row: impl Fn(usize) -> usize + Send + Sync) -> Vec<usize> {
    (0..items).into_par_iter().map(per_row).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_rows(items: usize, per_row: impl Fn(usize) -> usize + Send + Sync) -> Vec<usize> {
    (0..items).map(per_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{LineSource, build_matrix};

    #[test]
    fn cutoff_radius_selects_quantile_entry() {
        // Condensed distances: [1, 2, 3, 1, 2, 1] -> sorted [1, 1, 1, 2, 2, 3].
        let matrix = build_matrix(&[0.0, 1.0, 2.0, 3.0]);
        let radius = cutoff_radius(&matrix, 0.5);
        assert_eq!(radius, 1.0);
        let radius = cutoff_radius(&matrix, 0.99);
        assert_eq!(radius, 3.0);
    }

    #[test]
    fn cutoff_radius_clamps_tiny_quantiles_to_smallest_distance() {
        let matrix = build_matrix(&[0.0, 3.0]);
        assert_eq!(cutoff_radius(&matrix, 0.02), 3.0);
        assert_eq!(cutoff_radius(&matrix, 0.0), 3.0);
    }

    #[test]
    fn density_counts_strictly_closer_points() {
        let matrix = build_matrix(&[0.0, 1.0, 2.0, 3.0, 10.0]);
        let density = local_density(&matrix, 3.0);
        assert_eq!(density, vec![2, 3, 3, 2, 0]);
    }

    #[test]
    fn density_matches_independent_pairwise_recount() {
        let values = [0.0_f32, 0.5, 0.9, 4.0, 4.2, 9.0];
        let matrix = build_matrix(&values);
        let radius = cutoff_radius(&matrix, 0.3);
        let density = local_density(&matrix, radius);

        let source = LineSource::new("recount", values.to_vec());
        let mut expected = vec![0_usize; values.len()];
        for i in 0..values.len() {
            for j in (i + 1)..values.len() {
                let d = crate::DataSource::distance(&source, i, j).expect("valid indices");
                if d < radius {
                    expected[i] += 1;
                    expected[j] += 1;
                }
            }
        }
        assert_eq!(density, expected);
    }

    #[test]
    fn equal_distances_degenerate_to_zero_density() {
        // Two points have a single pairwise distance; the radius equals it and
        // the strict comparison leaves every density at zero.
        let matrix = build_matrix(&[0.0, 5.0]);
        let radius = cutoff_radius(&matrix, 0.02);
        assert_eq!(local_density(&matrix, radius), vec![0, 0]);
    }
}
