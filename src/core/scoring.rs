use crate::error::{MatchingError, Result};
use crate::models::Item;
use std::collections::HashMap;

/// Pairwise compatibility cost between two items (lower is better)
///
/// Implementations must be pure, total and deterministic, and return a
/// non-negative value. `f64::INFINITY` is allowed and marks an impossible
/// pair. The solver interprets nothing beyond the ordering of the values.
pub trait PairScorer {
    fn score(&self, a: &Item, b: &Item) -> f64;
}

impl<F> PairScorer for F
where
    F: Fn(&Item, &Item) -> f64,
{
    #[inline]
    fn score(&self, a: &Item, b: &Item) -> f64 {
        self(a, b)
    }
}

/// Scorer returning the same cost for every pair
///
/// With a constant cost the relaxation degenerates to a uniform matching, and
/// the extractor's index tie-break decides the pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantScorer(pub f64);

impl Default for ConstantScorer {
    fn default() -> Self {
        Self(0.0)
    }
}

impl PairScorer for ConstantScorer {
    #[inline]
    fn score(&self, _a: &Item, _b: &Item) -> f64 {
        self.0
    }
}

/// Scorer backed by a precomputed cost table indexed by item position
///
/// `None` entries mean "impossible" and score as `f64::INFINITY`. Lookups for
/// ids the table was not built from score as NaN, which the cost builder
/// rejects.
#[derive(Debug, Clone)]
pub struct CostTable {
    index: HashMap<String, usize>,
    costs: Vec<Vec<Option<f64>>>,
}

impl CostTable {
    pub fn new(items: &[Item], costs: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let n = items.len();
        let cols = costs
            .iter()
            .map(Vec::len)
            .find(|&len| len != n)
            .unwrap_or(n);
        if costs.len() != n || cols != n {
            return Err(MatchingError::DimensionMismatch {
                expected: n,
                rows: costs.len(),
                cols,
            });
        }

        let mut index = HashMap::with_capacity(n);
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), i).is_some() {
                return Err(MatchingError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self { index, costs })
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl PairScorer for CostTable {
    fn score(&self, a: &Item, b: &Item) -> f64 {
        match (self.index.get(&a.id), self.index.get(&b.id)) {
            (Some(&i), Some(&j)) => self.costs[i][j].unwrap_or(f64::INFINITY),
            _ => f64::NAN,
        }
    }
}
