//! Configuration errors raised while building grids and solvers.
//!
//! Every variant is a construction-time failure. Numerical degradation
//! (non-monotonic coordinates, near-singular spacing, transform round-off)
//! is never reported here.

use thiserror::Error;

use crate::types::{Axis, Halo3D, Topology};

/// Errors that can occur while configuring a grid, field or solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An axis was given zero cells.
    #[error("Resolution along {axis} must be positive, got 0")]
    ZeroSize { axis: Axis },

    /// A horizontal interval has zero or negative length.
    #[error("Domain length along {axis} must be positive, got {length}")]
    NonPositiveExtent { axis: Axis, length: f64 },

    /// A Flat axis must hold exactly one cell.
    #[error("Flat axis {axis} must have exactly one cell, got {size}")]
    FlatAxisSize { axis: Axis, size: usize },

    /// An explicit face array does not match the vertical resolution.
    #[error("Expected {expected} vertical face coordinates (Nz + 1), got {actual}")]
    FaceCount { expected: usize, actual: usize },

    /// A coordinate or extent evaluated to NaN or infinity.
    #[error("Non-finite value in {what}")]
    NonFinite { what: String },

    /// The tridiagonal closure only supports walls at the top and bottom.
    #[error("Fourier-tridiagonal solver requires a Bounded z topology, got {0}")]
    UnsupportedVerticalTopology(Topology),

    /// A built stretched grid cannot be re-haloed without its face source.
    #[error(
        "Cannot change halo from {current} to {requested} on a built grid; rebuild it from its original configuration"
    )]
    HaloResize { current: Halo3D, requested: Halo3D },

    /// A field does not match the shape expected by its consumer.
    #[error("Field shape mismatch: expected {expected}, got {actual}")]
    FieldShape { expected: String, actual: String },
}

impl ConfigError {
    /// Create a non-finite value error.
    pub fn non_finite(what: impl Into<String>) -> Self {
        Self::NonFinite { what: what.into() }
    }

    /// Create a field shape mismatch error.
    pub fn field_shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::FieldShape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result alias for configuration-time operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
