//! Sinkhorn Match - pairwise population matching via entropy-regularized optimal transport
//!
//! Given a cost for every ordered pair of items, the library builds a masked
//! cost matrix, scales its Gibbs kernel into a near doubly-stochastic
//! matching-probability matrix, and greedily collapses that matrix into a
//! disjoint one-to-one pairing.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    extract_matches, run_matching, ConstantScorer, CostSymmetry, CostTable, Matcher, Matrix,
    MatrixRows, PairScorer, SinkhornParams, SinkhornReport,
};
pub use error::{MatchingError, Result};
pub use models::{Item, Match};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let items = vec![Item::new("a"), Item::new("b")];
        let outcome = run_matching(&items, &ConstantScorer(1.0), &SinkhornParams::default()).unwrap();
        let matches = extract_matches(&outcome.matrix, &items).unwrap();
        assert_eq!(matches.len(), 1);
    }
}
