// src/calibration/matrix.rs
use crate::core::QdotError;
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Row-normalised gate-to-dot sensitivity matrix.
///
/// Entry `(i, j)` is how strongly gate `j` moves dot `i`, relative to dot
/// `i`'s own plunger; the diagonal is exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTalkMatrix {
    matrix: DMatrix<f64>,
}

impl CrossTalkMatrix {
    /// Normalises every row of a raw sensitivity matrix by its diagonal entry.
    ///
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if the matrix is not square or a
    ///   diagonal entry is zero or non-finite.
    pub fn from_sensitivities(mut raw: DMatrix<f64>) -> Result<Self, QdotError> {
        if !raw.is_square() {
            return Err(QdotError::invalid_argument(format!(
                "cross-talk matrix must be square, got {}x{}",
                raw.nrows(),
                raw.ncols()
            )));
        }
        for i in 0..raw.nrows() {
            let diagonal = raw[(i, i)];
            if !diagonal.is_finite() || diagonal == 0.0 {
                return Err(QdotError::invalid_argument(format!(
                    "row {} cannot be normalised by diagonal entry {}",
                    i, diagonal
                )));
            }
            for j in 0..raw.ncols() {
                raw[(i, j)] /= diagonal;
            }
        }
        Ok(Self { matrix: raw })
    }

    /// Builds a matrix from rows whose diagonal is already 1.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, QdotError> {
        let n = rows.len();
        if rows.iter().any(|row| row.len() != n) {
            return Err(QdotError::invalid_argument("cross-talk rows must form a square matrix"));
        }
        Self::from_sensitivities(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Nominal triple-dot cross-talk: 10% between neighbours, 1% between the
    /// outer dots. Useful before any calibration has been run.
    pub fn reference_triple_dot() -> Self {
        Self {
            matrix: DMatrix::from_row_slice(3, 3, &[
                1.00, 0.10, 0.01,
                0.10, 1.00, 0.10,
                0.01, 0.10, 1.00,
            ]),
        }
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn get(&self, dot: usize, gate: usize) -> Option<f64> {
        self.matrix.get((dot, gate)).copied()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Inverts the matrix into the virtual-gate transform.
    ///
    /// # Returns
    /// * `Err(QdotError::SingularMatrix)` if the matrix has no inverse.
    pub fn virtual_gates(&self) -> Result<VirtualGates, QdotError> {
        let inverse = self.matrix.clone().try_inverse().ok_or_else(|| QdotError::SingularMatrix {
            message: format!("{}x{} cross-talk matrix is not invertible", self.dim(), self.dim()),
        })?;
        Ok(VirtualGates { inverse })
    }
}

impl fmt::Display for CrossTalkMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.matrix.row_iter() {
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                write!(f, "{}{:.3}", if j > 0 { ", " } else { "" }, value)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/// Cached inverse of a [`CrossTalkMatrix`].
///
/// Virtual gate `k` is the combination of physical gates that moves dot `k`
/// alone; `to_physical` converts a step along the virtual axes into the
/// physical voltage step that realises it.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualGates {
    inverse: DMatrix<f64>,
}

impl VirtualGates {
    pub fn dim(&self) -> usize {
        self.inverse.nrows()
    }

    /// The virtual-to-physical matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inverse
    }

    /// Physical voltage deltas for a step of `virtual_deltas` along the virtual axes.
    pub fn to_physical(&self, virtual_deltas: &[f64]) -> Result<Vec<f64>, QdotError> {
        if virtual_deltas.len() != self.dim() {
            return Err(QdotError::DimensionMismatch { expected: self.dim(), found: virtual_deltas.len() });
        }
        let physical = &self.inverse * DVector::from_column_slice(virtual_deltas);
        Ok(physical.iter().copied().collect())
    }
}
