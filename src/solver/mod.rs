//! Elliptic solvers.
//!
//! # Submodules
//!
//! - [`FourierTridiagonalPoissonSolver`]: spectral in x and y, tridiagonal in z
//! - [`BatchedTridiagonalSolver`]: per-column vertical systems for every mode
//! - [`SpectralStorage`]: complex (`c64`) field storage

mod poisson;
mod storage;
mod tridiagonal;

pub use poisson::FourierTridiagonalPoissonSolver;
pub use storage::SpectralStorage;
pub use tridiagonal::BatchedTridiagonalSolver;
