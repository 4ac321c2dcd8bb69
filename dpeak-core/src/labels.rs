//! Label propagation from centres through the density order.
//!
//! Centres take fresh cluster ids (1..k) in the order they are encountered
//! during the density-descending sweep; every other point adopts the label of
//! its nearest denser neighbour, which is guaranteed to have been labelled on
//! an earlier iteration.

use crate::{
    error::{DpcError, Result},
    result::ClusterId,
};

/// Propagates cluster labels along the density-descending `order`.
///
/// # Errors
/// Returns [`DpcError::InvariantViolation`] when a non-centre point has no
/// denser neighbour or its neighbour is still unlabelled. Neither can occur
/// for orders and centre sets produced by this crate: the densest point
/// always wins centre selection, and neighbours precede their dependants in
/// the sweep.
pub(crate) fn propagate_labels(
    order: &[usize],
    centers: &[usize],
    neighbour: &[Option<usize>],
) -> Result<Vec<ClusterId>> {
    let items = order.len();
    let mut is_center = vec![false; items];
    for &center in centers {
        is_center[center] = true;
    }

    let mut labels: Vec<Option<ClusterId>> = vec![None; items];
    let mut next_id = 1_usize;

    for &point in order {
        if is_center[point] {
            labels[point] = Some(ClusterId::new(next_id));
            next_id += 1;
        } else {
            let denser = neighbour[point].ok_or(DpcError::InvariantViolation {
                context: "assigning a non-centre point without a denser neighbour",
            })?;
            let inherited = labels[denser].ok_or(DpcError::InvariantViolation {
                context: "inheriting a label from a still-unlabelled neighbour",
            })?;
            labels[point] = Some(inherited);
        }
    }

    labels
        .into_iter()
        .map(|label| {
            label.ok_or(DpcError::InvariantViolation {
                context: "collecting labels after the propagation sweep",
            })
        })
        .collect()
}
