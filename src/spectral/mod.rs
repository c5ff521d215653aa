//! Spectral diagonalisation of the horizontal Laplacian.
//!
//! On a uniform horizontal grid the second-difference operator along each
//! axis is diagonalised by a fixed basis:
//!
//! - Periodic axes: complex exponentials (discrete Fourier transform)
//! - Bounded axes with Neumann walls: cosines (DCT-II / DCT-III pair)
//! - Flat axes: the single constant mode
//!
//! [`poisson_eigenvalues`] gives the eigenvalue of every mode and
//! [`AxisTransform`] moves fields between physical and spectral space.
//!
//! # Example
//!
//! ```
//! use faer::c64;
//! use poisson_rs::architecture::Architecture;
//! use poisson_rs::spectral::{AxisTransform, Direction};
//! use poisson_rs::types::{Axis, Resolution3D, Topology};
//!
//! let size = Resolution3D::new(8, 1, 1).unwrap();
//! let fwd = AxisTransform::plan(Axis::X, Topology::Periodic, 8, Direction::Forward);
//! let bwd = AxisTransform::plan(Axis::X, Topology::Periodic, 8, Direction::Backward);
//!
//! let field: Vec<c64> = (0..8).map(|n| c64::new(n as f64, 0.0)).collect();
//! let mut hat = vec![c64::new(0.0, 0.0); 8];
//! fwd.apply(Architecture::Cpu, size, &field, &mut hat);
//!
//! let mut back = vec![c64::new(0.0, 0.0); 8];
//! bwd.apply(Architecture::Cpu, size, &hat, &mut back);
//! assert!((back[5].re - 5.0).abs() < 1e-12);
//! ```

mod eigenvalues;
mod transform;

pub use eigenvalues::poisson_eigenvalues;
pub use transform::{
    AxisTransform, Direction, GEMM_THRESHOLD, PlannerFlag, TransformKernel, TransformPipeline,
};
