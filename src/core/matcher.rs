use crate::core::{
    cost::{build_cost_matrix, symmetrize, CostSymmetry},
    extract::extract_matches,
    mask::apply_exclusions_in_place,
    matrix::Matrix,
    scoring::PairScorer,
    sinkhorn::{SinkhornParams, SinkhornReport, SinkhornSolver},
    stats::MatchingSummary,
};
use crate::error::{MatchingError, Result};
use crate::models::{Item, Match};
use std::collections::HashSet;

/// Matching matrix and convergence metadata of one run
#[derive(Debug, Clone)]
pub struct MatchingOutcome {
    /// Scorer output with the diagonal at +inf, before any masking
    pub scores: Matrix,
    /// Masked, symmetrized cost matrix the kernel was built from
    pub costs: Matrix,
    pub matrix: Matrix,
    pub report: SinkhornReport,
}

/// Outcome of a full run including the discrete pairing
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchingOutcome,
    pub matches: Vec<Match>,
    pub summary: MatchingSummary,
}

/// Build, mask and solve: items + scorer -> matching matrix
///
/// Costs are used as directed. See [`Matcher`] to pick another symmetry policy.
pub fn run_matching<S>(items: &[Item], scorer: &S, params: &SinkhornParams) -> Result<MatchingOutcome>
where
    S: PairScorer + ?Sized,
{
    Matcher::new(*params, CostSymmetry::Directed)?.run(items, scorer)
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Cost matrix from the injected scorer (diagonal forced to +inf)
/// 2. Exclusion mask
/// 3. Symmetry policy
/// 4. Sinkhorn scaling
/// 5. Greedy extraction (`match_items` only)
#[derive(Debug, Clone)]
pub struct Matcher {
    solver: SinkhornSolver,
    symmetry: CostSymmetry,
}

impl Matcher {
    pub fn new(params: SinkhornParams, symmetry: CostSymmetry) -> Result<Self> {
        Ok(Self {
            solver: SinkhornSolver::new(params)?,
            symmetry,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            solver: SinkhornSolver::default(),
            symmetry: CostSymmetry::default(),
        }
    }

    pub fn params(&self) -> &SinkhornParams {
        self.solver.params()
    }

    pub fn symmetry(&self) -> CostSymmetry {
        self.symmetry
    }

    /// Compute the matching matrix for `items`
    pub fn run<S>(&self, items: &[Item], scorer: &S) -> Result<MatchingOutcome>
    where
        S: PairScorer + ?Sized,
    {
        if items.is_empty() {
            return Err(MatchingError::EmptyInput);
        }
        ensure_unique_ids(items)?;

        let scores = build_cost_matrix(items, scorer)?;
        let mut costs = scores.clone();
        apply_exclusions_in_place(&mut costs, items)?;
        let costs = symmetrize(costs, self.symmetry);

        tracing::debug!(
            "Running Sinkhorn over {} items (lambda={}, max_iterations={}, tolerance={:e}, symmetry={:?})",
            items.len(),
            self.params().lambda,
            self.params().max_iterations,
            self.params().tolerance,
            self.symmetry
        );

        let solution = self.solver.solve(&costs);

        Ok(MatchingOutcome {
            scores,
            costs,
            matrix: solution.matrix,
            report: solution.report,
        })
    }

    /// Compute the matching matrix, collapse it into pairs and summarize
    pub fn match_items<S>(&self, items: &[Item], scorer: &S) -> Result<MatchResult>
    where
        S: PairScorer + ?Sized,
    {
        let outcome = self.run(items, scorer)?;
        let matches = extract_matches(&outcome.matrix, items)?;
        let summary = MatchingSummary::compute(&outcome.scores, &outcome.matrix, &matches);

        Ok(MatchResult {
            outcome,
            matches,
            summary,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn ensure_unique_ids(items: &[Item]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    match items.iter().find(|item| !seen.insert(item.id.as_str())) {
        Some(dup) => Err(MatchingError::DuplicateId(dup.id.clone())),
        None => Ok(()),
    }
}
