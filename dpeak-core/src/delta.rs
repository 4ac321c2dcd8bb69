//! Distance-to-nearest-denser-point computation.
//!
//! Points are visited in density-descending order (ties broken by ascending
//! original index so results are reproducible); each point's delta is its
//! minimum distance to any earlier-visited point. Each rank depends on every
//! earlier rank, so the scan is intentionally sequential.

use crate::matrix::DistanceMatrix;

/// Orders point indices by density descending, ascending index on ties.
pub(crate) fn density_order(density: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..density.len()).collect();
    order.sort_by(|&a, &b| density[b].cmp(&density[a]).then_with(|| a.cmp(&b)));
    order
}

/// Computes delta and the nearest-denser neighbour for every point.
///
/// `order` must be the permutation produced by [`density_order`]. The first
/// entry is the globally densest point: its neighbour is `None` and its delta
/// is the maximum of all other deltas, by convention. On equidistant
/// candidates the earliest-ordered one is recorded as the neighbour.
pub(crate) fn delta_from_order(
    matrix: &DistanceMatrix,
    order: &[usize],
) -> (Vec<f32>, Vec<Option<usize>>) {
    let items = matrix.len();
    let mut delta = vec![0.0_f32; items];
    let mut neighbour: Vec<Option<usize>> = vec![None; items];

    for rank in 1..order.len() {
        let point = order[rank];
        let mut best = f32::INFINITY;
        let mut best_neighbour = order[0];
        for &earlier in &order[..rank] {
            let d = matrix.get(point, earlier);
            if d < best {
                best = d;
                best_neighbour = earlier;
            }
        }
        delta[point] = best;
        neighbour[point] = Some(best_neighbour);
    }

    let densest = order[0];
    delta[densest] = delta
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != densest)
        .map(|(_, &d)| d)
        .fold(0.0_f32, f32::max);

    (delta, neighbour)
}
