//! # poisson-rs
//!
//! Pressure Poisson solver for grids with uniform horizontal and stretched
//! vertical spacing.
//!
//! This crate provides:
//! - Vertically stretched rectilinear grids with halo regions
//! - Halo-extended vertical metrics from arbitrary face coordinates
//! - Spectral diagonalisation of the horizontal Laplacian (DFT / DCT)
//! - A batched tridiagonal solve over every horizontal mode
//! - Serial or rayon-parallel execution of every phase
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use poisson_rs::{
//!     Architecture, CenterField, FourierTridiagonalPoissonSolver, GeometricStretching,
//!     GridBuilder, Interval, PlannerFlag,
//! };
//!
//! let grid = GridBuilder::new(16, 16, 8)
//!     .with_x(Interval::new(0.0, 1.0))
//!     .with_y(Interval::new(0.0, 1.0))
//!     .with_z_faces(GeometricStretching::new(-1.0, 0.05, 1.15))
//!     .build()
//!     .unwrap();
//! let grid = Arc::new(grid);
//!
//! let mut solver = FourierTridiagonalPoissonSolver::new(
//!     Architecture::Multicore,
//!     grid.clone(),
//!     PlannerFlag::Estimate,
//! )
//! .unwrap();
//!
//! let rhs = CenterField::from_fn(&grid, |x, _, z| (2.0 * std::f64::consts::PI * x).cos() * z);
//! let mut phi = CenterField::zeros(&grid);
//! solver.solve_into(&mut phi, &rhs).unwrap();
//! ```

pub mod architecture;
pub mod error;
pub mod field;
pub mod grid;
pub mod solver;
pub mod spectral;
pub mod types;
pub mod vertical;

pub use architecture::Architecture;
pub use faer::c64;
pub use error::{ConfigError, Result};
pub use field::{CenterField, FillHalo, TopologyHalo};
pub use grid::{Grid, GridBuilder};
pub use solver::{BatchedTridiagonalSolver, FourierTridiagonalPoissonSolver, SpectralStorage};
pub use spectral::{AxisTransform, Direction, PlannerFlag, TransformKernel, poisson_eigenvalues};
pub use types::{
    Axis, Halo3D, Interval, Location, OffsetVec, PerAxis, Resolution3D, Topology, Topology3D,
    UniformRange,
};
pub use vertical::{
    ExplicitFaces, FaceCoordinates, FaceFn, GeometricStretching, SongHaidvogelFaces,
    UniformSpacing, VerticalMetrics, generate_vertical_metrics,
};
