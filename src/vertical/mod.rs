//! Stretched vertical coordinates.
//!
//! The vertical axis of a grid is described by a face-coordinate source
//! (any [`FaceCoordinates`] implementation) and expanded into halo-extended
//! metrics by [`generate_vertical_metrics`].
//!
//! # Face Sources
//!
//! - [`ExplicitFaces`]: heights given as an array of `Nz + 1` values
//! - [`FaceFn`]: heights from a closure of the 1-based face index
//! - [`UniformSpacing`]: equal layers (for testing)
//! - [`GeometricStretching`]: layers growing by a constant ratio
//! - [`SongHaidvogelFaces`]: ROMS-style surface/bottom clustering over a depth
//!
//! # Example
//!
//! ```
//! use poisson_rs::types::Topology;
//! use poisson_rs::vertical::{SongHaidvogelFaces, generate_vertical_metrics};
//!
//! // 40 layers in a 500 m deep fjord, refined near the surface
//! let faces = SongHaidvogelFaces::new(500.0, 7.0, 0.5);
//! let metrics = generate_vertical_metrics(Topology::Bounded, 40, 1, &faces);
//!
//! assert!((metrics.lz - 500.0).abs() < 1e-9);
//! assert!(metrics.dz_faces[40] < metrics.dz_faces[20]);
//! ```

mod coordinates;
mod metrics;

pub use coordinates::{
    ExplicitFaces, FaceCoordinates, FaceFn, GeometricStretching, SongHaidvogelFaces,
    UniformSpacing,
};
pub use metrics::{VerticalMetrics, generate_vertical_metrics};
