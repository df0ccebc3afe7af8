use crate::core::matrix::Matrix;
use crate::error::{MatchingError, Result};
use nalgebra::DVector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Positive floor added to every row/column reduction before inversion
///
/// Keeps the scaling vectors finite for items excluded from every partner.
pub const SCALING_FLOOR: f64 = 1e-16;

/// Item count at which row/column reductions move onto the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Hyperparameters of one Sinkhorn run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkhornParams {
    /// Regularization weight λ in K = exp(-λ·C); larger is sharper
    pub lambda: f64,
    pub max_iterations: usize,
    /// Bound on both the scaling-vector change and the marginal error
    pub tolerance: f64,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for SinkhornParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            max_iterations: 1000,
            tolerance: 1e-6,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SinkhornParams {
    pub fn new(lambda: f64, max_iterations: usize, tolerance: f64) -> Result<Self> {
        let params = Self {
            lambda,
            max_iterations,
            tolerance,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Fail fast on parameters outside their domain
    pub fn validate(&self) -> Result<()> {
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Err(MatchingError::InvalidParameter(format!(
                "lambda must be a positive finite number, got {}",
                self.lambda
            )));
        }
        if self.max_iterations == 0 {
            return Err(MatchingError::InvalidParameter(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MatchingError::InvalidParameter(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Max-norm change of the scaling vectors over the last iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScalingDeltas {
    pub u: f64,
    pub v: f64,
}

/// Convergence metadata returned next to the matching matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkhornReport {
    pub iterations_used: usize,
    pub converged: bool,
    pub final_deltas: ScalingDeltas,
    /// Largest |sum - 1| over rows and columns that are not fully excluded
    pub marginal_error: f64,
}

/// Output of a solver run: the matching matrix plus how it was reached
#[derive(Debug, Clone, PartialEq)]
pub struct SinkhornSolution {
    pub matrix: Matrix,
    pub report: SinkhornReport,
}

/// Entropy-regularized optimal transport by alternating row/column scaling
///
/// Produces P = diag(u)·K·diag(v) with K = exp(-λ·C). A run is `converged`
/// only when both scaling vectors move less than the tolerance AND every row
/// and column with at least one admissible partner sums to 1 within the
/// tolerance. Kernel entries that are positive but tiny next to the scaling
/// floor pin u and v at 1/δ without meeting the marginals; the solver stops
/// there and reports `converged == false`. Hitting the iteration cap is not
/// an error either: the last iterate is returned with `converged == false`.
#[derive(Debug, Clone)]
pub struct SinkhornSolver {
    params: SinkhornParams,
}

impl SinkhornSolver {
    pub fn new(params: SinkhornParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SinkhornParams {
        &self.params
    }

    /// Run the scaling iteration on a masked cost matrix
    pub fn solve(&self, costs: &Matrix) -> SinkhornSolution {
        let n = costs.nrows();
        if n == 0 {
            return SinkhornSolution {
                matrix: Matrix::zeros(0, 0),
                report: SinkhornReport {
                    iterations_used: 0,
                    converged: true,
                    final_deltas: ScalingDeltas::default(),
                    marginal_error: 0.0,
                },
            };
        }

        let tolerance = self.params.tolerance;
        let kernel = build_kernel(costs, self.params.lambda);
        // Column i of Kᵀ is row i of K, so both products reduce to column dots
        let kernel_t = kernel.transpose();
        let parallel = n >= self.params.parallel_threshold;
        let dead_rows = empty_columns(&kernel_t);
        let dead_cols = empty_columns(&kernel);

        let mut u = DVector::from_element(n, 1.0);
        let mut v = DVector::from_element(n, 1.0);
        let mut kv = column_dots(&kernel_t, &v, parallel);
        let mut deltas = ScalingDeltas::default();
        let mut iterations_used = 0;
        let mut converged = false;
        let mut stalled = false;

        for iteration in 1..=self.params.max_iterations {
            let u_next = invert(&kv);
            let ktu = column_dots(&kernel, &u_next, parallel);
            let v_next = invert(&ktu);
            kv = column_dots(&kernel_t, &v_next, parallel);

            deltas = ScalingDeltas {
                u: (&u_next - &u).amax(),
                v: (&v_next - &v).amax(),
            };
            u = u_next;
            v = v_next;
            iterations_used = iteration;

            tracing::trace!(
                "Sinkhorn iteration {}: du={:e}, dv={:e}",
                iteration,
                deltas.u,
                deltas.v
            );

            if deltas.u < tolerance && deltas.v < tolerance {
                let error = iterate_marginal_error(&u, &kv, &v, &ktu, &dead_rows, &dead_cols);
                if error <= tolerance {
                    converged = true;
                    break;
                }
                // A fixed point that misses the marginals never moves again
                if deltas.u == 0.0 && deltas.v == 0.0 {
                    stalled = true;
                    break;
                }
            }
        }

        let mut matrix = kernel;
        for (j, mut column) in matrix.column_iter_mut().enumerate() {
            column.component_mul_assign(&u);
            column *= v[j];
        }
        clamp_unmatchable(&mut matrix, &dead_rows, &dead_cols);
        let marginal_error = marginal_error(&matrix, &dead_rows, &dead_cols);

        if converged {
            tracing::debug!(
                "Sinkhorn converged after {} iterations (n={}, lambda={}, marginal error {:e})",
                iterations_used,
                n,
                self.params.lambda,
                marginal_error
            );
        } else if stalled {
            tracing::warn!(
                "Sinkhorn stalled after {} iterations with marginal error {:e}; kernel entries underflow the scaling floor (lambda={})",
                iterations_used,
                marginal_error,
                self.params.lambda
            );
        } else {
            tracing::warn!(
                "Sinkhorn hit the iteration cap of {} without converging (du={:e}, dv={:e}, marginal error {:e}, tolerance={:e})",
                self.params.max_iterations,
                deltas.u,
                deltas.v,
                marginal_error,
                tolerance
            );
        }

        SinkhornSolution {
            matrix,
            report: SinkhornReport {
                iterations_used,
                converged,
                final_deltas: deltas,
                marginal_error,
            },
        }
    }
}

impl Default for SinkhornSolver {
    fn default() -> Self {
        Self {
            params: SinkhornParams::default(),
        }
    }
}

/// Kernel K = exp(-λ·C) with infinite costs mapped to exactly zero
///
/// Infinite costs are tested explicitly instead of relying on exp underflow,
/// and any NaN produced along the way is replaced by zero.
pub fn build_kernel(costs: &Matrix, lambda: f64) -> Matrix {
    costs.map(|c| {
        if c.is_infinite() {
            return 0.0;
        }
        let k = (-lambda * c).exp();
        if k.is_nan() {
            0.0
        } else {
            k
        }
    })
}

/// Dot product of every column of `columns` with `x`
///
/// Both paths evaluate the same per-column dot, so their results are bit-identical.
fn column_dots(columns: &Matrix, x: &DVector<f64>, parallel: bool) -> DVector<f64> {
    let n = columns.ncols();
    let sums: Vec<f64> = if parallel {
        (0..n)
            .into_par_iter()
            .map(|j| columns.column(j).dot(x))
            .collect()
    } else {
        (0..n).map(|j| columns.column(j).dot(x)).collect()
    };
    DVector::from_vec(sums)
}

#[inline]
fn invert(sums: &DVector<f64>) -> DVector<f64> {
    sums.map(|s| 1.0 / (s + SCALING_FLOOR))
}

fn empty_columns(matrix: &Matrix) -> Vec<bool> {
    matrix
        .column_iter()
        .map(|column| column.iter().all(|&k| k == 0.0))
        .collect()
}

/// Marginal error of diag(u)·K·diag(v) from the reductions already at hand
///
/// Row i sums to u_i·(K·v)_i and column j to v_j·(Kᵀ·u)_j.
fn iterate_marginal_error(
    u: &DVector<f64>,
    kv: &DVector<f64>,
    v: &DVector<f64>,
    ktu: &DVector<f64>,
    dead_rows: &[bool],
    dead_cols: &[bool],
) -> f64 {
    let rows = (0..u.len())
        .filter(|&i| !dead_rows[i])
        .map(|i| (u[i] * kv[i] - 1.0).abs());
    let cols = (0..v.len())
        .filter(|&j| !dead_cols[j])
        .map(|j| (v[j] * ktu[j] - 1.0).abs());
    rows.chain(cols).fold(0.0, f64::max)
}

/// Zero every row/column whose kernel row/column is identically zero
fn clamp_unmatchable(matrix: &mut Matrix, dead_rows: &[bool], dead_cols: &[bool]) {
    let n = matrix.nrows();
    for j in 0..n {
        for i in 0..n {
            let value = &mut matrix[(i, j)];
            if dead_rows[i] || dead_cols[j] || !value.is_finite() {
                *value = 0.0;
            }
        }
    }

    let clamped = dead_rows.iter().filter(|&&d| d).count();
    if clamped > 0 {
        tracing::debug!("Clamped {} items with no admissible partner to zero", clamped);
    }
}

fn marginal_error(matrix: &Matrix, dead_rows: &[bool], dead_cols: &[bool]) -> f64 {
    let rows = (0..matrix.nrows())
        .filter(|&i| !dead_rows[i])
        .map(|i| (matrix.row(i).sum() - 1.0).abs());
    let cols = (0..matrix.ncols())
        .filter(|&j| !dead_cols[j])
        .map(|j| (matrix.column(j).sum() - 1.0).abs());
    rows.chain(cols).fold(0.0, f64::max)
}
