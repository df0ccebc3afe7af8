use crate::core::matrix::Matrix;
use crate::core::scoring::PairScorer;
use crate::error::{MatchingError, Result};
use crate::models::Item;
use serde::{Deserialize, Serialize};

/// How directed costs are combined before the kernel is built
///
/// `score` is not required to be symmetric, so C[i][j] and C[j][i] may differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostSymmetry {
    /// Use C as given; the kernel is directed
    #[default]
    Directed,
    /// Replace both directions with their mean; an infinite side wins
    Average,
}

/// Build the n×n cost matrix for an ordered item list
///
/// Entry (i, j) is `scorer.score(items[i], items[j])` and the diagonal is
/// `+inf`. The scorer is never called for i == j. NaN or negative scores break
/// the scorer contract and are rejected; `+inf` is kept as an impossible pair.
pub fn build_cost_matrix<S>(items: &[Item], scorer: &S) -> Result<Matrix>
where
    S: PairScorer + ?Sized,
{
    let n = items.len();
    let mut costs = Matrix::from_element(n, n, f64::INFINITY);

    for (i, a) in items.iter().enumerate() {
        for (j, b) in items.iter().enumerate() {
            if i == j {
                continue;
            }
            let value = scorer.score(a, b);
            if value.is_nan() || value < 0.0 {
                return Err(MatchingError::InvalidCost { row: i, col: j, value });
            }
            costs[(i, j)] = value;
        }
    }

    tracing::trace!("Built {}x{} cost matrix", n, n);
    Ok(costs)
}

/// Apply a symmetry policy to a (masked) cost matrix
///
/// Under `Average` an infinite entry on either side makes both sides infinite.
pub fn symmetrize(costs: Matrix, symmetry: CostSymmetry) -> Matrix {
    match symmetry {
        CostSymmetry::Directed => costs,
        CostSymmetry::Average => (&costs + costs.transpose()) * 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::{from_rows, to_rows};
    use crate::core::scoring::ConstantScorer;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id)).collect()
    }

    #[test]
    fn test_diagonal_is_infinite() {
        let costs = build_cost_matrix(&items(&["a", "b", "c"]), &ConstantScorer(2.0)).unwrap();
        for i in 0..3 {
            assert_eq!(costs[(i, i)], f64::INFINITY);
            for j in 0..3 {
                if i != j {
                    assert_eq!(costs[(i, j)], 2.0);
                }
            }
        }
    }

    #[test]
    fn test_single_item() {
        let costs = build_cost_matrix(&items(&["solo"]), &ConstantScorer(0.0)).unwrap();
        assert_eq!(to_rows(&costs), vec![vec![f64::INFINITY]]);
    }

    #[test]
    fn test_empty_items() {
        let costs = build_cost_matrix(&[], &ConstantScorer(0.0)).unwrap();
        assert!(costs.is_empty());
    }

    #[test]
    fn test_asymmetric_scorer_is_preserved() {
        let scorer = |a: &Item, b: &Item| if a.id < b.id { 1.0 } else { 3.0 };
        let costs = build_cost_matrix(&items(&["a", "b"]), &scorer).unwrap();
        assert_eq!(costs[(0, 1)], 1.0);
        assert_eq!(costs[(1, 0)], 3.0);
    }

    #[test]
    fn test_scorer_not_called_on_diagonal() {
        let scorer = |a: &Item, b: &Item| {
            assert_ne!(a.id, b.id);
            1.0
        };
        build_cost_matrix(&items(&["a", "b", "c"]), &scorer).unwrap();
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let err = build_cost_matrix(&items(&["a", "b"]), &ConstantScorer(-1.0)).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidCost { row: 0, col: 1, .. }));

        let err = build_cost_matrix(&items(&["a", "b"]), &ConstantScorer(f64::NAN)).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidCost { .. }));
    }

    #[test]
    fn test_average_symmetry() {
        let costs = from_rows(&[
            vec![f64::INFINITY, 1.0, 2.0],
            vec![3.0, f64::INFINITY, f64::INFINITY],
            vec![4.0, 5.0, f64::INFINITY],
        ])
        .unwrap();

        let avg = symmetrize(costs.clone(), CostSymmetry::Average);
        assert_eq!(avg[(0, 1)], 2.0);
        assert_eq!(avg[(1, 0)], 2.0);
        assert_eq!(avg[(0, 2)], 3.0);
        assert_eq!(avg[(1, 2)], f64::INFINITY);
        assert_eq!(avg[(2, 1)], f64::INFINITY);
        assert_eq!(avg[(1, 1)], f64::INFINITY);

        assert_eq!(symmetrize(costs.clone(), CostSymmetry::Directed), costs);
    }

    #[test]
    fn test_symmetry_deserialize() {
        let s: CostSymmetry = serde_json::from_str("\"average\"").unwrap();
        assert_eq!(s, CostSymmetry::Average);
        assert_eq!(CostSymmetry::default(), CostSymmetry::Directed);
    }
}
