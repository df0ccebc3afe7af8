use crate::core::matrix::Matrix;
use crate::error::{MatchingError, Result};
use crate::models::{Item, Match};

/// A candidate entry of the matching matrix
#[derive(Debug, Clone, Copy)]
struct Candidate {
    i: usize,
    j: usize,
    probability: f64,
}

/// Greedily collapse a matching matrix into disjoint pairs
///
/// Every off-diagonal entry with P[i][j] > 0 is a candidate. Candidates are
/// visited by descending probability, ties broken by ascending (i, j), and a
/// candidate is accepted only if neither index was consumed earlier. The
/// reciprocal entry of an accepted pair is therefore skipped, and each pair is
/// emitted once. At most floor(n / 2) pairs are returned; items left over are
/// simply unmatched.
///
/// The matrix must be n×n for n items, otherwise `DimensionMismatch` is
/// returned. The result is a greedy approximation, not an optimal assignment.
pub fn extract_matches(matrix: &Matrix, items: &[Item]) -> Result<Vec<Match>> {
    let n = items.len();
    if matrix.nrows() != n || matrix.ncols() != n {
        return Err(MatchingError::DimensionMismatch {
            expected: n,
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }

    let mut candidates: Vec<Candidate> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| i != j)
        .filter_map(|(i, j)| {
            let probability = matrix[(i, j)];
            (probability > 0.0).then_some(Candidate { i, j, probability })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| (a.i, a.j).cmp(&(b.i, b.j)))
    });

    let mut consumed = vec![false; n];
    let mut matches = Vec::with_capacity(n / 2);

    for Candidate { i, j, probability } in candidates {
        if consumed[i] || consumed[j] {
            continue;
        }
        consumed[i] = true;
        consumed[j] = true;
        matches.push(Match {
            first_id: items[i].id.clone(),
            second_id: items[j].id.clone(),
            probability,
            first_index: i,
            second_index: j,
        });
        if matches.len() == n / 2 {
            break;
        }
    }

    tracing::debug!(
        "Extracted {} pairs covering {}/{} items",
        matches.len(),
        matches.len() * 2,
        n
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::from_rows;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id)).collect()
    }

    #[test]
    fn test_picks_highest_first() {
        let p = from_rows(&[
            vec![0.0, 0.9, 0.1, 0.0],
            vec![0.8, 0.0, 0.0, 0.2],
            vec![0.1, 0.0, 0.0, 0.7],
            vec![0.0, 0.2, 0.6, 0.0],
        ])
        .unwrap();
        let matches = extract_matches(&p, &items(&["a", "b", "c", "d"])).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].first_id.as_str(), matches[0].second_id.as_str()), ("a", "b"));
        assert_eq!(matches[0].probability, 0.9);
        assert_eq!((matches[1].first_id.as_str(), matches[1].second_id.as_str()), ("c", "d"));
    }

    #[test]
    fn test_reciprocal_entry_skipped() {
        let p = from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let matches = extract_matches(&p, &items(&["x", "y"])).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].first_index, 0);
        assert_eq!(matches[0].second_index, 1);
    }

    #[test]
    fn test_ties_break_by_index() {
        // Every off-diagonal entry equal: (0,1) wins, then (2,3)
        let p = Matrix::from_fn(4, 4, |i, j| if i == j { 0.0 } else { 1.0 / 3.0 });
        let matches = extract_matches(&p, &items(&["a", "b", "c", "d"])).unwrap();
        let pairs: Vec<_> = matches.iter().map(|m| (m.first_index, m.second_index)).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_zero_entries_never_proposed() {
        let p = from_rows(&[
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        let matches = extract_matches(&p, &items(&["lonely", "b", "c"])).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].contains("lonely"));
    }

    #[test]
    fn test_odd_population_leaves_one_unmatched() {
        let p = Matrix::from_fn(5, 5, |i, j| if i == j { 0.0 } else { 0.25 });
        let matches = extract_matches(&p, &items(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let p = from_rows(&[
            vec![0.0, 0.3, 0.3, 0.4],
            vec![0.3, 0.0, 0.4, 0.3],
            vec![0.3, 0.4, 0.0, 0.3],
            vec![0.4, 0.3, 0.3, 0.0],
        ])
        .unwrap();
        let items = items(&["a", "b", "c", "d"]);
        let first = extract_matches(&p, &items);
        for _ in 0..10 {
            assert_eq!(extract_matches(&p, &items), first);
        }
    }

    #[test]
    fn test_empty_and_single() {
        assert!(extract_matches(&Matrix::zeros(0, 0), &[]).unwrap().is_empty());
        assert!(extract_matches(&Matrix::zeros(1, 1), &items(&["a"])).unwrap().is_empty());
    }

    #[test]
    fn test_size_disagreeing_with_items_is_rejected() {
        let p = from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let err = extract_matches(&p, &items(&["a", "b", "c"])).unwrap_err();
        assert_eq!(err, MatchingError::DimensionMismatch { expected: 3, rows: 2, cols: 2 });

        let err = extract_matches(&p, &items(&["a"])).unwrap_err();
        assert!(matches!(err, MatchingError::DimensionMismatch { expected: 1, .. }));
    }
}
