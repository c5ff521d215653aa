//! Batched tridiagonal solve over every horizontal mode.
//!
//! After the horizontal transforms, each mode `(i, j)` leaves one vertical
//! system of `Nz` unknowns:
//!
//! ```text
//! c[k-1]·φ[k-1] + D[i,j,k]·φ[k] + c[k]·φ[k+1] = f[k]
//! ```
//!
//! with a symmetric off-diagonal `c` shared by all columns and a diagonal that
//! depends on the mode. Columns are stored contiguously (`col·Nz + k`) and
//! solved independently by the Thomas algorithm.

use faer::c64;

use crate::architecture::Architecture;
use crate::grid::Grid;

/// Tridiagonal coefficients for every horizontal mode, assembled once.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchedTridiagonalSolver {
    nz: usize,
    columns: usize,
    /// Shared sub/super-diagonal, `c[k] = 1 / ΔzC[k+2]` (0-based), length `Nz - 1`.
    off_diagonal: Vec<f64>,
    /// Column-contiguous diagonal, length `columns · Nz`.
    diagonal: Vec<f64>,
    /// Columns whose horizontal eigenvalues sum to zero (pure Neumann).
    singular: Vec<usize>,
}

impl BatchedTridiagonalSolver {
    /// Assemble coefficients from the vertical metrics of `grid` and the
    /// horizontal eigenvalues.
    ///
    /// With `λ = λx[i] + λy[j]`, rows are scaled by the layer thickness:
    ///
    /// ```text
    /// D[i,j,k] = -(k > 1  ? 1/ΔzC[k]   : 0)
    ///            -(k < Nz ? 1/ΔzC[k+1] : 0)
    ///            - ΔzF[k]·λ
    /// ```
    pub fn new(
        architecture: Architecture,
        grid: &Grid,
        lambda_x: &[f64],
        lambda_y: &[f64],
    ) -> Self {
        let nx = lambda_x.len();
        let nz = grid.size().nz();
        let columns = nx * lambda_y.len();

        let off_diagonal: Vec<f64> = (1..nz as isize)
            .map(|k| 1.0 / grid.delta_zc(k + 1))
            .collect();

        let eigenvalue = |col: usize| lambda_x[col % nx] + lambda_y[col / nx];

        let mut diagonal = vec![0.0; columns * nz];
        architecture.fill_indexed(&mut diagonal, |n| {
            let (col, k0) = (n / nz, n % nz);
            let k = k0 as isize + 1;
            let below = if k0 > 0 { off_diagonal[k0 - 1] } else { 0.0 };
            let above = if k0 + 1 < nz { off_diagonal[k0] } else { 0.0 };
            -below - above - grid.delta_zf(k) * eigenvalue(col)
        });

        let singular: Vec<usize> = (0..columns).filter(|&col| eigenvalue(col) == 0.0).collect();

        Self {
            nz,
            columns,
            off_diagonal,
            diagonal,
            singular,
        }
    }

    /// Number of vertical unknowns per column.
    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Number of horizontal modes.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Shared off-diagonal coefficients.
    pub fn off_diagonal(&self) -> &[f64] {
        &self.off_diagonal
    }

    /// Diagonal of column `col`.
    pub fn diagonal(&self, col: usize) -> &[f64] {
        &self.diagonal[col * self.nz..(col + 1) * self.nz]
    }

    /// Columns pinned instead of solved directly.
    pub fn singular_columns(&self) -> &[usize] {
        &self.singular
    }

    /// Solve every column of column-contiguous `values` in place.
    pub fn solve(&self, architecture: Architecture, values: &mut [c64]) {
        debug_assert_eq!(values.len(), self.columns * self.nz);
        architecture.for_each_chunk_mut(self.nz, values, self.nz, |col, f, c_prime| {
            self.solve_column(col, f, c_prime)
        });
    }

    /// Thomas algorithm on one column.
    ///
    /// Coefficients are real, so the modified super-diagonal `c_prime` is
    /// real as well. A singular column replaces its last equation by
    /// `φ[Nz] = 0`.
    fn solve_column(&self, col: usize, f: &mut [c64], c_prime: &mut [f64]) {
        let nz = self.nz;
        let d = self.diagonal(col);
        let c = &self.off_diagonal;
        let pinned = self.singular.binary_search(&col).is_ok();
        let last = nz - 1;

        if pinned {
            f[last] = c64::new(0.0, 0.0);
        }
        let pivot = |k: usize| if pinned && k == last { 1.0 } else { d[k] };
        let sub = |k: usize| if pinned && k == last { 0.0 } else { c[k - 1] };

        // Forward sweep
        let den = pivot(0);
        if nz > 1 {
            c_prime[0] = c[0] / den;
        }
        f[0] /= den;
        for k in 1..nz {
            let a = sub(k);
            let den = pivot(k) - a * c_prime[k - 1];
            if k < last {
                c_prime[k] = c[k] / den;
            }
            f[k] = (f[k] - f[k - 1] * a) / den;
        }

        // Back substitution
        for k in (0..last).rev() {
            let next = f[k + 1];
            f[k] -= next * c_prime[k];
        }
    }
}
