//! 3D grid resolution and halo widths.

use std::fmt;

use crate::error::{ConfigError, Result};
use crate::types::Axis;

/// 3D grid resolution (number of cells along each axis).
///
/// # Example
///
/// ```
/// use poisson_rs::types::Resolution3D;
///
/// let res = Resolution3D::new(16, 8, 4).unwrap();
/// assert_eq!(res.nx(), 16);
/// assert_eq!(res.total_cells(), 512);
/// assert!(Resolution3D::new(0, 8, 4).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution3D {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl Resolution3D {
    /// Create a new resolution, rejecting empty axes.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        for (axis, n) in [(Axis::X, nx), (Axis::Y, ny), (Axis::Z, nz)] {
            if n == 0 {
                return Err(ConfigError::ZeroSize { axis });
            }
        }
        Ok(Self { nx, ny, nz })
    }

    /// Cube resolution (same on all axes).
    pub fn cube(n: usize) -> Result<Self> {
        Self::new(n, n, n)
    }

    /// Number of cells in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of cells in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of cell layers in z.
    #[inline]
    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Number of cells along `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
            Axis::Z => self.nz,
        }
    }

    /// Number of horizontal columns (Nx·Ny).
    #[inline]
    pub fn columns(&self) -> usize {
        self.nx * self.ny
    }

    /// Total number of interior cells.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Return as tuple (nx, ny, nz).
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }
}

impl fmt::Display for Resolution3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}×{}", self.nx, self.ny, self.nz)
    }
}

impl TryFrom<(usize, usize, usize)> for Resolution3D {
    type Error = ConfigError;

    fn try_from((nx, ny, nz): (usize, usize, usize)) -> Result<Self> {
        Self::new(nx, ny, nz)
    }
}

/// Ghost-cell widths on each side of each axis.
///
/// Widths are unsigned, so a negative halo cannot be expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Halo3D {
    /// Halo width in x.
    pub hx: usize,
    /// Halo width in y.
    pub hy: usize,
    /// Halo width in z.
    pub hz: usize,
}

impl Halo3D {
    /// Create halo widths.
    pub fn new(hx: usize, hy: usize, hz: usize) -> Self {
        Self { hx, hy, hz }
    }

    /// Same width on every axis.
    pub fn uniform(h: usize) -> Self {
        Self::new(h, h, h)
    }

    /// Halo width along `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.hx,
            Axis::Y => self.hy,
            Axis::Z => self.hz,
        }
    }
}

impl Default for Resolution3D {
    fn default() -> Self {
        Self { nx: 1, ny: 1, nz: 1 }
    }
}

impl fmt::Display for Halo3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.hx, self.hy, self.hz)
    }
}

impl From<(usize, usize, usize)> for Halo3D {
    fn from((hx, hy, hz): (usize, usize, usize)) -> Self {
        Self::new(hx, hy, hz)
    }
}
