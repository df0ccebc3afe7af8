// Core algorithm exports
pub mod cost;
pub mod extract;
pub mod mask;
pub mod matcher;
pub mod matrix;
pub mod scoring;
pub mod sinkhorn;
pub mod stats;

pub use cost::{build_cost_matrix, symmetrize, CostSymmetry};
pub use extract::extract_matches;
pub use mask::{apply_exclusions, apply_exclusions_in_place, is_excluded_pair};
pub use matcher::{run_matching, MatchResult, Matcher, MatchingOutcome};
pub use matrix::{Matrix, MatrixRows};
pub use scoring::{ConstantScorer, CostTable, PairScorer};
pub use sinkhorn::{build_kernel, ScalingDeltas, SinkhornParams, SinkhornReport, SinkhornSolution, SinkhornSolver};
pub use stats::MatchingSummary;
