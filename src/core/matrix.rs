use nalgebra::DMatrix;
use serde::ser::{Serialize, Serializer};

/// Dense square matrix used for the cost, kernel and matching matrices
///
/// Infinite entries are the explicit "impossible pair" sentinel.
pub type Matrix = DMatrix<f64>;

/// Build a square matrix from nested rows; `None` if the rows are ragged or not square
pub fn from_rows(rows: &[Vec<f64>]) -> Option<Matrix> {
    let n = rows.len();
    if rows.iter().any(|row| row.len() != n) {
        return None;
    }
    Some(Matrix::from_fn(n, n, |i, j| rows[i][j]))
}

pub fn to_rows(matrix: &Matrix) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Wire form of a matrix: an array of row arrays
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRows(pub Matrix);

impl Serialize for MatrixRows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.0
                .row_iter()
                .map(|row| row.iter().copied().collect::<Vec<f64>>()),
        )
    }
}
