//! Cluster centre selection by gamma ranking.
//!
//! Gamma is `density * delta`; the k highest-gamma points become centres.
//! Ties are resolved by an explicit [`TieBreak`](crate::TieBreak) policy so
//! results never depend on sort-stability accidents.

use crate::builder::TieBreak;

/// Selects the `cluster_count` highest-gamma points as centres, in rank order.
///
/// Under either tie-break policy the globally densest point always ranks
/// first: its delta is the maximum delta by convention, so its gamma bounds
/// every other gamma, and a tie at that bound forces equal density and delta,
/// which the index tie-break resolves in favour of the densest point's
/// (lowest) index. Label propagation relies on this.
pub(crate) fn select_centers(
    density: &[usize],
    delta: &[f32],
    cluster_count: usize,
    tie_break: TieBreak,
) -> Vec<usize> {
    let gamma = |i: usize| density[i] as f64 * f64::from(delta[i]);

    let mut ranked: Vec<usize> = (0..density.len()).collect();
    ranked.sort_by(|&a, &b| {
        gamma(b).total_cmp(&gamma(a)).then_with(|| match tie_break {
            TieBreak::LowerIndex => a.cmp(&b),
            TieBreak::HigherDensity => density[b].cmp(&density[a]).then_with(|| a.cmp(&b)),
        })
    });

    ranked.truncate(cluster_count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn picks_the_top_gamma_points() {
        let density = [2, 3, 3, 2, 0];
        let delta = [1.0, 7.0, 1.0, 1.0, 7.0];
        let centers = select_centers(&density, &delta, 2, TieBreak::LowerIndex);
        assert_eq!(centers, vec![1, 2]);
    }

    #[rstest]
    #[case(TieBreak::LowerIndex, vec![0, 2])]
    #[case(TieBreak::HigherDensity, vec![2, 0])]
    fn tie_break_policies_are_deterministic(
        #[case] tie_break: TieBreak,
        #[case] expected: Vec<usize>,
    ) {
        // Points 0 and 2 tie on gamma (4 * 3 == 6 * 2); the policies disagree
        // on which ranks first.
        let density = [4, 1, 6, 1];
        let delta = [3.0, 0.5, 2.0, 0.5];
        let centers = select_centers(&density, &delta, 2, tie_break);
        assert_eq!(centers, expected);
    }

    #[test]
    fn degenerate_density_still_selects_k_centers() {
        let density = [0, 0, 0];
        let delta = [2.0, 2.0, 2.0];
        let centers = select_centers(&density, &delta, 2, TieBreak::LowerIndex);
        assert_eq!(centers, vec![0, 1]);
    }
}
