//! Complex storage for spectral-space fields.

use faer::c64;

use crate::types::Resolution3D;

/// Complex field of shape `Nx × Ny × Nz`.
///
/// Linear index `i + Nx·(j + Ny·k)` (0-based, x-fastest) in physical layout.
/// The solver temporarily reorders values column-contiguous
/// (`(i + Nx·j)·Nz + k`) during the vertical solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralStorage {
    size: Resolution3D,
    values: Vec<c64>,
}

impl SpectralStorage {
    /// Zeroed storage for a field of shape `size`.
    pub fn zeros(size: Resolution3D) -> Self {
        Self {
            size,
            values: vec![c64::new(0.0, 0.0); size.total_cells()],
        }
    }

    /// Field shape.
    #[inline]
    pub fn size(&self) -> Resolution3D {
        self.size
    }

    /// Number of complex values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the storage holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Linear index of 0-based cell `(i, j, k)` in physical layout.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let (nx, ny, _) = self.size.as_tuple();
        i + nx * (j + ny * k)
    }

    #[inline]
    pub fn values(&self) -> &[c64] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [c64] {
        &mut self.values
    }

    /// Real parts in linear order.
    pub fn real_parts(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|v| v.re)
    }

    /// Largest imaginary magnitude.
    pub fn max_imag(&self) -> f64 {
        self.values.iter().fold(0.0, |m, v| m.max(v.im.abs()))
    }

    pub fn fill_zero(&mut self) {
        self.values.fill(c64::new(0.0, 0.0));
    }

    /// Drop the imaginary parts.
    pub fn clear_imag(&mut self) {
        self.values.iter_mut().for_each(|v| v.im = 0.0);
    }
}
