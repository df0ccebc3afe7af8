use crate::core::matrix::Matrix;
use crate::models::Match;
use serde::Serialize;

/// Aggregate figures describing one matching run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSummary {
    pub total_items: usize,
    pub total_matches: usize,
    pub matched_items: usize,
    pub coverage_percentage: f64,
    /// Mean raw score over finite off-diagonal pairs, taken before exclusions
    /// are masked; 0 if there are none
    pub mean_cost: f64,
    /// Mean over strictly positive matching-matrix entries; 0 if there are none
    pub mean_probability: f64,
    pub matrix_sum: f64,
    pub nonzero_entries: usize,
}

impl MatchingSummary {
    /// `scores` is the unmasked scorer output, `matrix` the matching matrix
    pub fn compute(scores: &Matrix, matrix: &Matrix, matches: &[Match]) -> Self {
        let total_items = matrix.nrows();
        let matched_items = matches.len() * 2;

        let n = scores.nrows();
        let finite_scores: Vec<f64> = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| scores[(i, j)])
            .filter(|c| c.is_finite())
            .collect();

        let positive: Vec<f64> = matrix.iter().copied().filter(|&p| p > 0.0).collect();

        Self {
            total_items,
            total_matches: matches.len(),
            matched_items,
            coverage_percentage: if total_items > 0 {
                matched_items as f64 / total_items as f64 * 100.0
            } else {
                0.0
            },
            mean_cost: mean(&finite_scores),
            mean_probability: mean(&positive),
            matrix_sum: matrix.sum(),
            nonzero_entries: positive.len(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
