//! Builder pattern for stretched grid construction.
//!
//! Provides a fluent API for configuring the resolution, extents, vertical
//! face source and topology of a [`Grid`], with validation deferred to
//! [`GridBuilder::build`].
//!
//! # Example
//!
//! ```
//! use poisson_rs::grid::GridBuilder;
//! use poisson_rs::types::{Halo3D, Interval};
//! use poisson_rs::vertical::GeometricStretching;
//!
//! // Doubly periodic box with layers refined towards the bottom
//! let grid = GridBuilder::new(32, 32, 16)
//!     .with_x(Interval::new(0.0, 1e3))
//!     .with_y(Interval::new(0.0, 1e3))
//!     .with_z_faces(GeometricStretching::new(-200.0, 2.0, 1.1))
//!     .with_halo(Halo3D::uniform(2))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grid.dx(), 1e3 / 32.0);
//! assert!(grid.delta_zf(16) > grid.delta_zf(1));
//!
//! // Wall-bounded channel
//! let channel = GridBuilder::new(64, 8, 8)
//!     .with_x(Interval::new(0.0, 10.0))
//!     .bounded_xy()
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use super::rectilinear::{Grid, flat_free_halo};
use crate::architecture::Architecture;
use crate::error::{ConfigError, Result};
use crate::types::{
    Axis, Halo3D, Interval, Location, Resolution3D, Topology, Topology3D, UniformRange,
    total_length,
};
use crate::vertical::{FaceCoordinates, UniformSpacing, generate_vertical_metrics};

/// Extra `ΔzC` ring carried beyond the configured vertical halo.
const DZ_CENTER_EXTRA_HALO: usize = 2;

/// Builder for [`Grid`].
///
/// Cloneable, so a caller that may later need different halos can keep the
/// builder and rebuild.
#[derive(Clone)]
pub struct GridBuilder {
    size: (usize, usize, usize),
    halo: Halo3D,
    x: Interval,
    y: Interval,
    z: Interval,
    z_faces: Option<Arc<dyn FaceCoordinates>>,
    topology: Topology3D,
    architecture: Architecture,
}

impl GridBuilder {
    /// Create a builder for `nx × ny × nz` cells.
    ///
    /// Defaults: unit extents on every axis, uniform vertical layers, halo
    /// `(1, 1, 1)`, topology `(Periodic, Periodic, Bounded)`, [`Architecture::Cpu`].
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            size: (nx, ny, nz),
            halo: Halo3D::uniform(1),
            x: Interval::default(),
            y: Interval::default(),
            z: Interval::default(),
            z_faces: None,
            topology: Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded),
            architecture: Architecture::Cpu,
        }
    }

    /// Create a builder from a typed resolution.
    pub fn from_resolution(size: Resolution3D) -> Self {
        let (nx, ny, nz) = size.as_tuple();
        Self::new(nx, ny, nz)
    }

    /// Set halo widths.
    pub fn with_halo(mut self, halo: Halo3D) -> Self {
        self.halo = halo;
        self
    }

    /// Set the x interval `[x0, x1]`.
    pub fn with_x(mut self, x: Interval) -> Self {
        self.x = x;
        self
    }

    /// Set the y interval `[y0, y1]`.
    pub fn with_y(mut self, y: Interval) -> Self {
        self.y = y;
        self
    }

    /// Use uniform vertical layers spanning `z`.
    pub fn with_z(mut self, z: Interval) -> Self {
        self.z = z;
        self.z_faces = None;
        self
    }

    /// Use a stretched vertical face source.
    pub fn with_z_faces<S>(mut self, source: S) -> Self
    where
        S: FaceCoordinates + 'static,
    {
        self.z_faces = Some(Arc::new(source));
        self
    }

    /// Use a shared vertical face source.
    pub fn with_shared_z_faces(mut self, source: Arc<dyn FaceCoordinates>) -> Self {
        self.z_faces = Some(source);
        self
    }

    /// Set the topology of all axes.
    pub fn with_topology(mut self, topology: Topology3D) -> Self {
        self.topology = topology;
        self
    }

    /// Walls on both horizontal axes, keeping the vertical topology.
    pub fn bounded_xy(mut self) -> Self {
        self.topology.x = Topology::Bounded;
        self.topology.y = Topology::Bounded;
        self
    }

    /// Set the execution target.
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Validate the configuration and build the grid.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroSize`] if any axis has no cells
    /// - [`ConfigError::FlatAxisSize`] if a Flat axis has more than one cell
    /// - [`ConfigError::NonFinite`] / [`ConfigError::NonPositiveExtent`] for bad
    ///   horizontal intervals
    /// - [`ConfigError::FaceCount`] if an explicit face array does not hold
    ///   `Nz + 1` values
    /// - [`ConfigError::NonFinite`] if the face source yields NaN or infinity
    pub fn build(&self) -> Result<Grid> {
        let (nx, ny, nz) = self.size;
        let size = Resolution3D::new(nx, ny, nz)?;

        for (axis, &topology) in self.topology.iter() {
            let n = size.along(axis);
            if topology == Topology::Flat && n != 1 {
                return Err(ConfigError::FlatAxisSize { axis, size: n });
            }
        }

        let halo = flat_free_halo(self.halo, &self.topology);

        let (x_centers, x_faces) =
            horizontal_nodes(Axis::X, self.x, nx, halo.hx, self.topology.x)?;
        let (y_centers, y_faces) =
            horizontal_nodes(Axis::Y, self.y, ny, halo.hy, self.topology.y)?;

        let source: Arc<dyn FaceCoordinates> = match &self.z_faces {
            Some(source) => Arc::clone(source),
            None => {
                check_interval(Axis::Z, self.z)?;
                Arc::new(UniformSpacing::spanning(self.z.start, self.z.end, nz))
            }
        };
        if let Some(actual) = source.face_count() {
            if actual != nz + 1 {
                return Err(ConfigError::FaceCount {
                    expected: nz + 1,
                    actual,
                });
            }
        }

        // Generated one ring wider than needed so ΔzC can carry its extra halo
        let hz = halo.hz;
        let metrics = generate_vertical_metrics(
            self.topology.z,
            nz,
            hz + DZ_CENTER_EXTRA_HALO,
            source.as_ref(),
        );
        if !metrics.lz.is_finite() || metrics.z_faces.as_slice().iter().any(|z| !z.is_finite()) {
            return Err(ConfigError::non_finite(format!(
                "vertical faces from {}",
                source.description()
            )));
        }

        let first = 1 - hz as isize;
        let last_center = (nz + hz) as isize;
        let last_face = first + total_length(Location::Face, self.topology.z, nz, hz) as isize - 1;
        // Flat columns keep both bounding faces
        let last_face = last_face.max(first + 1);

        let mut dz_centers = metrics.dz_centers;
        if nz >= 2 {
            let k = nz as isize;
            dz_centers[k] = dz_centers[k - 1];
        }

        let grid = Grid {
            architecture: Architecture::Cpu,
            size,
            halo,
            topology: self.topology,
            x_extent: self.x,
            y_extent: self.y,
            lz: metrics.lz,
            x_centers,
            x_faces,
            y_centers,
            y_faces,
            z_faces: metrics.z_faces.restrict(first..=last_face),
            z_centers: metrics.z_centers.restrict(first..=last_center),
            dz_faces: metrics.dz_faces.restrict(first..=last_center),
            dz_centers,
        }
        .on_architecture(self.architecture);

        log::info!("Built {} (z faces: {})", grid, source.description());
        Ok(grid)
    }
}

impl fmt::Debug for GridBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridBuilder")
            .field("size", &self.size)
            .field("halo", &self.halo)
            .field("x", &self.x)
            .field("y", &self.y)
            .field(
                "z",
                &self
                    .z_faces
                    .as_ref()
                    .map(|s| s.description())
                    .unwrap_or_else(|| format!("uniform over {}", self.z)),
            )
            .field("topology", &self.topology)
            .field("architecture", &self.architecture)
            .finish()
    }
}

fn check_interval(axis: Axis, interval: Interval) -> Result<()> {
    if !interval.start.is_finite() || !interval.end.is_finite() {
        return Err(ConfigError::non_finite(format!("{} interval", axis)));
    }
    let length = interval.length();
    if length <= 0.0 {
        return Err(ConfigError::NonPositiveExtent { axis, length });
    }
    Ok(())
}

/// Center and face ranges of a uniform horizontal axis.
fn horizontal_nodes(
    axis: Axis,
    interval: Interval,
    n: usize,
    halo: usize,
    topology: Topology,
) -> Result<(UniformRange, UniformRange)> {
    check_interval(axis, interval)?;

    let step = interval.length() / n as f64;
    let first = 1 - halo as isize;
    let last = |location| first + total_length(location, topology, n, halo) as isize - 1;

    let centers = UniformRange::new(
        interval.start + 0.5 * step,
        step,
        first..=last(Location::Center),
    );
    let faces = UniformRange::new(interval.start, step, first..=last(Location::Face));
    Ok((centers, faces))
}
