//! Fourier-tridiagonal Poisson solver on vertically stretched grids.
//!
//! Solves the discrete Poisson equation
//!
//! ```text
//! ∇²_h φ + ∂z(∂z φ) = R
//! ```
//!
//! with homogeneous Neumann conditions at the top and bottom walls. The
//! horizontal Laplacian is diagonalised by per-axis transforms, leaving one
//! tridiagonal system per horizontal mode.
//!
//! # Algorithm
//!
//! 1. Forward transforms `[x, y]` (storage ⇄ buffer swap per axis)
//! 2. Transpose to column-contiguous layout, Thomas solve per column,
//!    transpose back
//! 3. Backward transforms `[y, x]`
//! 4. Drop the imaginary part and subtract the mean
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use poisson_rs::architecture::Architecture;
//! use poisson_rs::field::CenterField;
//! use poisson_rs::grid::GridBuilder;
//! use poisson_rs::solver::FourierTridiagonalPoissonSolver;
//! use poisson_rs::spectral::PlannerFlag;
//! use poisson_rs::vertical::GeometricStretching;
//!
//! let grid = Arc::new(
//!     GridBuilder::new(8, 8, 6)
//!         .with_z_faces(GeometricStretching::new(-1.0, 0.1, 1.2))
//!         .build()
//!         .unwrap(),
//! );
//! let mut solver =
//!     FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid.clone(), PlannerFlag::Estimate)
//!         .unwrap();
//!
//! let rhs = CenterField::from_fn(&grid, |x, y, _| (6.0 * x).sin() * (6.0 * y).cos());
//! let mut phi = CenterField::zeros(&grid);
//! solver.solve_into(&mut phi, &rhs).unwrap();
//!
//! assert!(phi.interior_mean().abs() < 1e-12);
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use faer::c64;

use super::storage::SpectralStorage;
use super::tridiagonal::BatchedTridiagonalSolver;
use crate::architecture::Architecture;
use crate::error::{ConfigError, Result};
use crate::field::CenterField;
use crate::grid::Grid;
use crate::spectral::{AxisTransform, PlannerFlag, TransformPipeline, poisson_eigenvalues};
use crate::types::{Axis, Resolution3D, Topology};

/// Poisson solver for grids with uniform horizontal and stretched vertical
/// spacing.
///
/// Owns its storage: write the (thickness-scaled) right-hand side with
/// [`set_source_term`](Self::set_source_term) or
/// [`storage_mut`](Self::storage_mut), call [`solve`](Self::solve), then
/// read [`solution`](Self::solution).
pub struct FourierTridiagonalPoissonSolver {
    architecture: Architecture,
    grid: Arc<Grid>,
    size: Resolution3D,
    lambda_x: Vec<f64>,
    lambda_y: Vec<f64>,
    transforms: TransformPipeline,
    tridiagonal: BatchedTridiagonalSolver,
    storage: SpectralStorage,
    buffer: SpectralStorage,
    solution: Vec<f64>,
}

impl FourierTridiagonalPoissonSolver {
    /// Plan transforms and assemble the tridiagonal coefficients.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedVerticalTopology`] unless the grid is
    /// Bounded in z.
    pub fn new(architecture: Architecture, grid: Arc<Grid>, flag: PlannerFlag) -> Result<Self> {
        let topology = grid.topology();
        if topology.z != Topology::Bounded {
            return Err(ConfigError::UnsupportedVerticalTopology(topology.z));
        }

        let architecture = architecture.resolve();
        if architecture != grid.architecture() {
            log::debug!(
                "Solver on {} uses a grid built for {}",
                architecture,
                grid.architecture()
            );
        }

        let size = grid.size();
        let lambda_x = poisson_eigenvalues(size.nx(), grid.lx(), topology.x);
        let lambda_y = poisson_eigenvalues(size.ny(), grid.ly(), topology.y);

        let transforms = TransformPipeline::plan(topology.x, topology.y, size, flag, architecture);
        for t in transforms.forward() {
            log::debug!(
                "{} transform along {} (N={}) uses {:?} kernel",
                t.topology(),
                t.axis(),
                t.len(),
                t.kernel()
            );
        }

        let tridiagonal = BatchedTridiagonalSolver::new(architecture, &grid, &lambda_x, &lambda_y);

        log::info!(
            "FourierTridiagonalPoissonSolver: {} on {}, topology {}, planner {:?}",
            size,
            architecture,
            topology,
            flag
        );

        Ok(Self {
            architecture,
            grid,
            size,
            lambda_x,
            lambda_y,
            transforms,
            tridiagonal,
            storage: SpectralStorage::zeros(size),
            buffer: SpectralStorage::zeros(size),
            solution: vec![0.0; size.total_cells()],
        })
    }

    /// Grid the solver was built for.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Execution target.
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Horizontal eigenvalues along `axis` (empty for z).
    pub fn eigenvalues(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.lambda_x,
            Axis::Y => &self.lambda_y,
            Axis::Z => &[],
        }
    }

    /// Planned transforms.
    pub fn transforms(&self) -> &TransformPipeline {
        &self.transforms
    }

    /// Assembled vertical coefficients.
    pub fn tridiagonal(&self) -> &BatchedTridiagonalSolver {
        &self.tridiagonal
    }

    /// Right-hand side before [`solve`](Self::solve), solution after.
    pub fn storage(&self) -> &SpectralStorage {
        &self.storage
    }

    /// Mutable storage for writing a right-hand side already multiplied by
    /// the layer thickness `ΔzF[k]`.
    pub fn storage_mut(&mut self) -> &mut SpectralStorage {
        &mut self.storage
    }

    /// Load `ΔzF[k]·R[i, j, k]` into storage from the interior of `rhs`.
    pub fn set_source_term(&mut self, rhs: &CenterField) -> Result<()> {
        rhs.check_shape(&self.grid)?;

        let grid = &self.grid;
        let (nx, ny, _) = self.size.as_tuple();
        let slab = nx * ny;
        self.architecture.fill_indexed(self.storage.values_mut(), |n| {
            let i = (n % nx) as isize + 1;
            let j = ((n % slab) / nx) as isize + 1;
            let k = (n / slab) as isize + 1;
            c64::new(grid.delta_zf(k) * rhs.get(i, j, k), 0.0)
        });
        Ok(())
    }

    /// Solve in place: storage holds the right-hand side on entry and the
    /// zero-mean solution (imaginary parts cleared) on exit.
    pub fn solve(&mut self) {
        let arch = self.architecture;
        let size = self.size;

        self.transform(Pass::Forward);

        let cols = size.columns();
        let nz = size.nz();

        // Physical layout -> column-contiguous
        let src = self.storage.values();
        arch.for_each_chunk_mut(nz, self.buffer.values_mut(), 0, |col, column, _| {
            for (k, v) in column.iter_mut().enumerate() {
                *v = src[col + cols * k];
            }
        });

        self.tridiagonal.solve(arch, self.buffer.values_mut());

        // Column-contiguous -> physical layout
        let src = self.buffer.values();
        arch.for_each_chunk_mut(cols, self.storage.values_mut(), 0, |k, level, _| {
            for (col, v) in level.iter_mut().enumerate() {
                *v = src[col * nz + k];
            }
        });

        self.transform(Pass::Backward);

        let values = self.storage.values();
        arch.fill_indexed(&mut self.solution, |n| values[n].re);
        let mean = arch.sum(&self.solution) / size.total_cells() as f64;
        arch.shift(&mut self.solution, -mean);

        let solution = &self.solution;
        arch.fill_indexed(self.storage.values_mut(), |n| c64::new(solution[n], 0.0));

        log::trace!("Poisson solve on {} done, removed mean {:e}", size, mean);
    }

    /// Solution of the last [`solve`](Self::solve) in x-fastest interior
    /// layout.
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Copy the solution into the interior of `x`; halos are untouched.
    pub fn copy_solution_into(&self, x: &mut CenterField) -> Result<()> {
        x.check_shape(&self.grid)?;
        for ((i, j, k), &v) in x.interior_indices().zip(&self.solution) {
            x.set(i, j, k, v);
        }
        Ok(())
    }

    /// Solve `∇²x = b` and write the zero-mean solution into `x`.
    pub fn solve_into(&mut self, x: &mut CenterField, b: &CenterField) -> Result<()> {
        x.check_shape(&self.grid)?;
        self.set_source_term(b)?;
        self.solve();
        self.copy_solution_into(x)
    }

    fn transform(&mut self, pass: Pass) {
        let transforms: &[AxisTransform] = match pass {
            Pass::Forward => self.transforms.forward(),
            Pass::Backward => self.transforms.backward(),
        };
        for t in transforms {
            t.apply(
                self.architecture,
                self.size,
                self.storage.values(),
                self.buffer.values_mut(),
            );
            mem::swap(&mut self.storage, &mut self.buffer);
        }
    }
}

#[derive(Clone, Copy)]
enum Pass {
    Forward,
    Backward,
}

impl fmt::Debug for FourierTridiagonalPoissonSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FourierTridiagonalPoissonSolver")
            .field("architecture", &self.architecture)
            .field("size", &self.size)
            .field("topology", &self.grid.topology())
            .field("transforms", &self.transforms)
            .finish()
    }
}
