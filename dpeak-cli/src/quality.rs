//! Agreement metrics between predicted and ground-truth labellings.
//!
//! Implements the Adjusted Rand Index (ARI) and Normalized Mutual Information
//! (NMI) over a shared contingency table. These scores sit outside the
//! clustering core: they compare an externally supplied ground truth against
//! a prediction and never influence the pipeline itself.

use std::collections::HashMap;

use thiserror::Error;

/// ARI and NMI values computed from two labellings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgreementScore {
    /// Adjusted Rand Index in `[-1.0, 1.0]`.
    pub ari: f64,
    /// Normalized Mutual Information in `[0.0, 1.0]`.
    pub nmi: f64,
}

/// Errors raised while computing agreement metrics.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum AgreementError {
    /// Ground-truth and predicted labels had different lengths.
    #[error("label length mismatch: ground_truth={ground_truth_len}, predicted={predicted_len}")]
    LabelLengthMismatch {
        /// Number of ground-truth labels.
        ground_truth_len: usize,
        /// Number of predicted labels.
        predicted_len: usize,
    },
}

struct Contingency {
    items: usize,
    truth_counts: HashMap<usize, usize>,
    predicted_counts: HashMap<usize, usize>,
    joint_counts: HashMap<(usize, usize), usize>,
}

impl Contingency {
    fn build(ground_truth: &[usize], predicted: &[usize]) -> Result<Self, AgreementError> {
        if ground_truth.len() != predicted.len() {
            return Err(AgreementError::LabelLengthMismatch {
                ground_truth_len: ground_truth.len(),
                predicted_len: predicted.len(),
            });
        }

        let mut truth_counts = HashMap::new();
        let mut predicted_counts = HashMap::new();
        let mut joint_counts = HashMap::new();
        for (&truth, &prediction) in ground_truth.iter().zip(predicted) {
            *truth_counts.entry(truth).or_insert(0) += 1;
            *predicted_counts.entry(prediction).or_insert(0) += 1;
            *joint_counts.entry((truth, prediction)).or_insert(0) += 1;
        }

        Ok(Self {
            items: ground_truth.len(),
            truth_counts,
            predicted_counts,
            joint_counts,
        })
    }

    fn adjusted_rand_index(&self) -> f64 {
        let total = comb2(self.items);
        if total == 0.0 {
            return 1.0;
        }

        let joint: f64 = self.joint_counts.values().copied().map(comb2).sum();
        let truth: f64 = self.truth_counts.values().copied().map(comb2).sum();
        let predicted: f64 = self.predicted_counts.values().copied().map(comb2).sum();

        let expected = truth * predicted / total;
        let max_index = 0.5 * (truth + predicted);
        let denominator = max_index - expected;
        if denominator == 0.0 {
            1.0
        } else {
            (joint - expected) / denominator
        }
    }

    fn normalized_mutual_information(&self) -> f64 {
        if self.items == 0 {
            return 1.0;
        }

        let truth_entropy = entropy(&self.truth_counts, self.items);
        let predicted_entropy = entropy(&self.predicted_counts, self.items);
        if truth_entropy == 0.0 && predicted_entropy == 0.0 {
            return 1.0;
        }
        if truth_entropy == 0.0 || predicted_entropy == 0.0 {
            return 0.0;
        }

        let items = self.items as f64;
        let mut mutual_information = 0.0_f64;
        for (&(truth, prediction), &count) in &self.joint_counts {
            let truth_count = self.truth_counts[&truth] as f64;
            let predicted_count = self.predicted_counts[&prediction] as f64;
            let count = count as f64;
            mutual_information +=
                (count / items) * ((count * items) / (truth_count * predicted_count)).ln();
        }

        mutual_information / (truth_entropy * predicted_entropy).sqrt()
    }
}

fn comb2(value: usize) -> f64 {
    let value = value as f64;
    value * (value - 1.0) / 2.0
}

fn entropy(counts: &HashMap<usize, usize>, items: usize) -> f64 {
    let items = items as f64;
    counts
        .values()
        .map(|&count| {
            let probability = count as f64 / items;
            -probability * probability.ln()
        })
        .sum()
}

/// Computes ARI and NMI for a predicted labelling against ground truth.
///
/// Both scores are invariant under relabelling, so the core's `1..=k` ids can
/// be compared directly against whatever ids the ground truth uses.
///
/// # Errors
/// Returns [`AgreementError::LabelLengthMismatch`] when the label vectors
/// have different lengths.
///
/// # Examples
/// ```
/// use dpeak_cli::quality::agreement_score;
///
/// let score = agreement_score(&[1, 1, 2, 2], &[2, 2, 1, 1])?;
/// assert!((score.ari - 1.0).abs() < 1e-12);
/// assert!((score.nmi - 1.0).abs() < 1e-12);
/// # Ok::<(), dpeak_cli::quality::AgreementError>(())
/// ```
pub fn agreement_score(
    ground_truth: &[usize],
    predicted: &[usize],
) -> Result<AgreementScore, AgreementError> {
    let contingency = Contingency::build(ground_truth, predicted)?;
    Ok(AgreementScore {
        ari: contingency.adjusted_rand_index(),
        nmi: contingency.normalized_mutual_information(),
    })
}
