use crate::core::matrix::Matrix;
use crate::error::{MatchingError, Result};
use crate::models::Item;
use std::collections::HashMap;

/// Check whether two items may never be paired
///
/// Exclusion is symmetric: it holds if either side declared the other.
#[inline]
pub fn is_excluded_pair(a: &Item, b: &Item) -> bool {
    a.excludes(&b.id) || b.excludes(&a.id)
}

/// Return a copy of `costs` with every excluded pair forced to `+inf`
///
/// The caller's matrix is left untouched.
pub fn apply_exclusions(costs: &Matrix, items: &[Item]) -> Result<Matrix> {
    let mut masked = costs.clone();
    apply_exclusions_in_place(&mut masked, items)?;
    Ok(masked)
}

/// Force every excluded pair of `costs` to `+inf` in place
///
/// Both (i, j) and (j, i) are set, whichever side declared the exclusion.
/// Excluded ids that are not part of `items` are ignored. Idempotent.
pub fn apply_exclusions_in_place(costs: &mut Matrix, items: &[Item]) -> Result<()> {
    let n = items.len();
    if costs.nrows() != n || costs.ncols() != n {
        return Err(MatchingError::DimensionMismatch {
            expected: n,
            rows: costs.nrows(),
            cols: costs.ncols(),
        });
    }

    let positions: HashMap<&str, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.as_str(), i))
        .collect();

    let mut masked = 0usize;
    for (i, item) in items.iter().enumerate() {
        for excluded in &item.excluded_ids {
            let Some(&j) = positions.get(excluded.as_str()) else {
                continue;
            };
            costs[(i, j)] = f64::INFINITY;
            costs[(j, i)] = f64::INFINITY;
            masked += 1;
        }
    }

    tracing::trace!("Masked {} declared exclusions across {} items", masked, n);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(n: usize) -> Matrix {
        Matrix::from_fn(n, n, |i, j| if i == j { f64::INFINITY } else { 1.0 })
    }

    #[test]
    fn test_one_directional_exclusion_is_symmetric() {
        let items = vec![Item::new("e").excluding(["f"]), Item::new("f"), Item::new("g")];
        let masked = apply_exclusions(&finite(3), &items).unwrap();

        assert_eq!(masked[(0, 1)], f64::INFINITY);
        assert_eq!(masked[(1, 0)], f64::INFINITY);
        assert_eq!(masked[(0, 2)], 1.0);
        assert_eq!(masked[(2, 1)], 1.0);
        assert!(is_excluded_pair(&items[1], &items[0]));
    }

    #[test]
    fn test_original_matrix_untouched() {
        let items = vec![Item::new("a").excluding(["b"]), Item::new("b")];
        let original = finite(2);
        let masked = apply_exclusions(&original, &items).unwrap();
        assert_eq!(original[(0, 1)], 1.0);
        assert_eq!(masked[(0, 1)], f64::INFINITY);
    }

    #[test]
    fn test_idempotent() {
        let items = vec![
            Item::new("a").excluding(["c"]),
            Item::new("b").excluding(["a"]),
            Item::new("c"),
        ];
        let once = apply_exclusions(&finite(3), &items).unwrap();
        let twice = apply_exclusions(&once, &items).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let items = vec![Item::new("a").excluding(["nobody"]), Item::new("b")];
        let masked = apply_exclusions(&finite(2), &items).unwrap();
        assert_eq!(masked, finite(2));
    }

    #[test]
    fn test_dimension_mismatch() {
        let items = vec![Item::new("a")];
        let err = apply_exclusions(&finite(2), &items).unwrap_err();
        assert!(matches!(err, MatchingError::DimensionMismatch { expected: 1, .. }));
    }
}
