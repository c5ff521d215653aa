//! Cell-centred fields with halo regions.
//!
//! A [`CenterField`] stores one value per cell center of a [`Grid`],
//! including halo cells, x-fastest. Halo cells are written by a
//! [`FillHalo`] implementation; [`TopologyHalo`] provides the periodic wrap
//! and nearest-interior copy implied by the grid topology.
//!
//! # Example
//!
//! ```
//! use poisson_rs::field::{CenterField, FillHalo, TopologyHalo};
//! use poisson_rs::grid::GridBuilder;
//!
//! let grid = GridBuilder::new(4, 4, 2).build().unwrap();
//! let mut c = CenterField::from_fn(&grid, |x, _, z| x + z);
//! TopologyHalo::new(grid.topology()).fill_halo_regions(&mut c);
//!
//! // Periodic x: halo cell 0 mirrors cell 4
//! assert_eq!(c.get(0, 1, 1), c.get(4, 1, 1));
//! // Bounded z: halo cell 3 copies cell 2
//! assert_eq!(c.get(1, 1, 3), c.get(1, 1, 2));
//! ```

use std::fmt;

use crate::error::{ConfigError, Result};
use crate::grid::Grid;
use crate::types::{Axis, Halo3D, Location, Resolution3D, Topology, Topology3D};

/// Values at the cell centers of a grid, halos included.
#[derive(Clone, PartialEq)]
pub struct CenterField {
    size: Resolution3D,
    halo: Halo3D,
    data: Vec<f64>,
}

impl CenterField {
    /// Zero field shaped like `grid`.
    pub fn zeros(grid: &Grid) -> Self {
        Self::with_shape(grid.size(), grid.halo())
    }

    /// Zero field of explicit shape.
    pub fn with_shape(size: Resolution3D, halo: Halo3D) -> Self {
        let len = padded(size.nx(), halo.hx) * padded(size.ny(), halo.hy) * padded(size.nz(), halo.hz);
        Self {
            size,
            halo,
            data: vec![0.0; len],
        }
    }

    /// Evaluate `f(x, y, z)` at every interior center; halos stay zero.
    pub fn from_fn<F>(grid: &Grid, f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        let mut field = Self::zeros(grid);
        for (i, j, k) in field.interior_indices() {
            let value = f(
                grid.x_node(Location::Center, i),
                grid.y_node(Location::Center, j),
                grid.z_node(Location::Center, k),
            );
            field.set(i, j, k, value);
        }
        field
    }

    /// Field with interior values from an x-fastest slice of length `Nx·Ny·Nz`.
    pub fn from_interior(grid: &Grid, values: &[f64]) -> Result<Self> {
        let mut field = Self::zeros(grid);
        if values.len() != field.size.total_cells() {
            return Err(ConfigError::field_shape(
                format!("{} interior values", field.size.total_cells()),
                format!("{} values", values.len()),
            ));
        }
        for ((i, j, k), &v) in field.interior_indices().zip(values) {
            field.set(i, j, k, v);
        }
        Ok(field)
    }

    /// Interior resolution.
    pub fn size(&self) -> Resolution3D {
        self.size
    }

    /// Halo widths.
    pub fn halo(&self) -> Halo3D {
        self.halo
    }

    /// Raw storage, halos included, x-fastest.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// True if `(i, j, k)` lies in the interior or the halo.
    #[inline]
    pub fn contains(&self, i: isize, j: isize, k: isize) -> bool {
        self.linear(i, j, k).is_some()
    }

    /// Checked lookup.
    #[inline]
    pub fn try_get(&self, i: isize, j: isize, k: isize) -> Option<f64> {
        self.linear(i, j, k).map(|n| self.data[n])
    }

    /// Value at center `(i, j, k)` (1-based, halo offset).
    ///
    /// # Panics
    ///
    /// Panics if any index is outside the interior plus halo.
    #[inline]
    pub fn get(&self, i: isize, j: isize, k: isize) -> f64 {
        self.data[self.position(i, j, k)]
    }

    /// Set the value at center `(i, j, k)`.
    ///
    /// # Panics
    ///
    /// Panics if any index is outside the interior plus halo.
    #[inline]
    pub fn set(&mut self, i: isize, j: isize, k: isize, value: f64) {
        let n = self.position(i, j, k);
        self.data[n] = value;
    }

    /// Interior indices in x-fastest order.
    pub fn interior_indices(&self) -> impl Iterator<Item = (isize, isize, isize)> + use<> {
        let (nx, ny, nz) = self.size.as_tuple();
        let (nx, ny, nz) = (nx as isize, ny as isize, nz as isize);
        (1..=nz).flat_map(move |k| (1..=ny).flat_map(move |j| (1..=nx).map(move |i| (i, j, k))))
    }

    /// Interior values as an x-fastest vector.
    pub fn interior_to_vec(&self) -> Vec<f64> {
        self.interior_indices()
            .map(|(i, j, k)| self.get(i, j, k))
            .collect()
    }

    /// Arithmetic mean over interior cells.
    pub fn interior_mean(&self) -> f64 {
        let sum: f64 = self.interior_indices().map(|(i, j, k)| self.get(i, j, k)).sum();
        sum / self.size.total_cells() as f64
    }

    /// Largest absolute interior difference to `other`.
    pub fn max_abs_diff(&self, other: &CenterField) -> f64 {
        self.interior_indices()
            .map(|(i, j, k)| (self.get(i, j, k) - other.get(i, j, k)).abs())
            .fold(0.0, f64::max)
    }

    /// Check that the field is shaped like `grid`.
    pub fn check_shape(&self, grid: &Grid) -> Result<()> {
        if self.size != grid.size() || self.halo != grid.halo() {
            return Err(ConfigError::field_shape(
                format!("{} with halo {}", grid.size(), grid.halo()),
                format!("{} with halo {}", self.size, self.halo),
            ));
        }
        Ok(())
    }

    #[inline]
    fn linear(&self, i: isize, j: isize, k: isize) -> Option<usize> {
        let oi = offset(i, self.size.nx(), self.halo.hx)?;
        let oj = offset(j, self.size.ny(), self.halo.hy)?;
        let ok = offset(k, self.size.nz(), self.halo.hz)?;
        let lx = padded(self.size.nx(), self.halo.hx);
        let ly = padded(self.size.ny(), self.halo.hy);
        Some(oi + lx * (oj + ly * ok))
    }

    #[inline]
    fn position(&self, i: isize, j: isize, k: isize) -> usize {
        match self.linear(i, j, k) {
            Some(n) => n,
            None => panic!(
                "index ({}, {}, {}) outside field {} with halo {}",
                i, j, k, self.size, self.halo
            ),
        }
    }
}

impl fmt::Debug for CenterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CenterField")
            .field("size", &self.size)
            .field("halo", &self.halo)
            .field("len", &self.data.len())
            .finish()
    }
}

#[inline]
fn padded(n: usize, halo: usize) -> usize {
    n + 2 * halo
}

/// 0-based storage offset of index `i`, if it lies within `1-halo..=n+halo`.
#[inline]
fn offset(i: isize, n: usize, halo: usize) -> Option<usize> {
    let o = i + halo as isize - 1;
    (0..padded(n, halo) as isize).contains(&o).then_some(o as usize)
}

/// Writes halo cells of a field.
///
/// The solver never fills halos itself; callers that need them (diagnostics,
/// finite-difference operators) supply an implementation.
pub trait FillHalo {
    /// Overwrite every halo cell of `field`.
    fn fill_halo_regions(&self, field: &mut CenterField);
}

/// Halo filling implied by the grid topology.
///
/// - Periodic: halo cells take the value of the interior cell one period away
/// - Bounded: halo cells copy the nearest interior cell (zero normal gradient)
/// - Flat: no halo
///
/// Axes are filled in order x, y, z over the already-filled ranges of the
/// previous axes, so edges and corners are consistent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopologyHalo {
    topology: Topology3D,
}

impl TopologyHalo {
    /// Halo filler for the given topology.
    pub fn new(topology: Topology3D) -> Self {
        Self { topology }
    }
}

impl FillHalo for TopologyHalo {
    fn fill_halo_regions(&self, field: &mut CenterField) {
        for axis in Axis::ALL {
            fill_axis(field, axis, *self.topology.get(axis));
        }
    }
}

/// Interior index supplying halo index `i` on an axis of `n` cells.
fn source_index(topology: Topology, n: isize, i: isize) -> isize {
    match topology {
        Topology::Periodic => (i - 1).rem_euclid(n) + 1,
        Topology::Bounded | Topology::Flat => i.clamp(1, n),
    }
}

fn fill_axis(field: &mut CenterField, axis: Axis, topology: Topology) {
    let h = field.halo.along(axis) as isize;
    if h == 0 {
        return;
    }
    let n = field.size.along(axis) as isize;
    let range = |a: Axis| {
        let h = field.halo.along(a) as isize;
        (1 - h)..=(field.size.along(a) as isize + h)
    };
    let (ri, rj, rk) = (range(Axis::X), range(Axis::Y), range(Axis::Z));

    for k in rk {
        for j in rj.clone() {
            for i in ri.clone() {
                let along = match axis {
                    Axis::X => i,
                    Axis::Y => j,
                    Axis::Z => k,
                };
                if (1..=n).contains(&along) {
                    continue;
                }
                let src = source_index(topology, n, along);
                let value = match axis {
                    Axis::X => field.get(src, j, k),
                    Axis::Y => field.get(i, src, k),
                    Axis::Z => field.get(i, j, src),
                };
                field.set(i, j, k, value);
            }
        }
    }
}
