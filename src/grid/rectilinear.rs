//! Rectilinear grid with uniform horizontal and stretched vertical spacing.
//!
//! Vertical spacings are named after the nodes they are differences of, not
//! where they live:
//!
//! | Name                     | Difference of | Located at | Meaning                  |
//! |--------------------------|---------------|------------|--------------------------|
//! | `ΔzF` (`dz_faces`)       | faces         | centers    | thickness of layer `k`   |
//! | `ΔzC` (`dz_centers`)     | centers       | faces      | gap between layers `k-1`, `k` |
//!
//! The tridiagonal solver couples layers `k` and `k+1` through `1/ΔzC[k+1]`
//! and weights horizontal eigenvalues and sources by `ΔzF[k]`.

use std::fmt;

use crate::architecture::Architecture;
use crate::error::{ConfigError, Result};
use crate::types::{
    Axis, Halo3D, Interval, Location, OffsetVec, Resolution3D, Topology, Topology3D,
    UniformRange,
};

/// Immutable grid geometry, shared read-only by solvers and fields.
///
/// All coordinate and spacing lookups use the 1-based halo-offset index
/// convention: index `1` is the first interior cell or face, `0` and below
/// address the lower halo.
///
/// Built by [`GridBuilder`](super::GridBuilder).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub(super) architecture: Architecture,
    pub(super) size: Resolution3D,
    pub(super) halo: Halo3D,
    pub(super) topology: Topology3D,

    pub(super) x_extent: Interval,
    pub(super) y_extent: Interval,
    pub(super) lz: f64,

    pub(super) x_centers: UniformRange,
    pub(super) x_faces: UniformRange,
    pub(super) y_centers: UniformRange,
    pub(super) y_faces: UniformRange,

    pub(super) z_faces: OffsetVec,
    pub(super) z_centers: OffsetVec,
    /// Layer thickness at centers, `ΔzF[k] = zF[k+1] - zF[k]`.
    pub(super) dz_faces: OffsetVec,
    /// Center-to-center spacing at faces, one ring wider than the halo.
    pub(super) dz_centers: OffsetVec,
}

impl Grid {
    // =========================================================================
    // Configuration
    // =========================================================================

    /// Execution target the grid was adapted to.
    #[inline]
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Interior resolution.
    #[inline]
    pub fn size(&self) -> Resolution3D {
        self.size
    }

    /// Halo widths (zero on Flat axes).
    #[inline]
    pub fn halo(&self) -> Halo3D {
        self.halo
    }

    /// Topology of each axis.
    #[inline]
    pub fn topology(&self) -> Topology3D {
        self.topology
    }

    // =========================================================================
    // Extents and uniform spacing
    // =========================================================================

    /// Domain interval along x.
    pub fn x_extent(&self) -> Interval {
        self.x_extent
    }

    /// Domain interval along y.
    pub fn y_extent(&self) -> Interval {
        self.y_extent
    }

    /// Domain length along x.
    #[inline]
    pub fn lx(&self) -> f64 {
        self.x_extent.length()
    }

    /// Domain length along y.
    #[inline]
    pub fn ly(&self) -> f64 {
        self.y_extent.length()
    }

    /// Interior column height, `zF[Nz+1] - zF[1]`.
    #[inline]
    pub fn lz(&self) -> f64 {
        self.lz
    }

    /// Uniform spacing along x.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.x_faces.step()
    }

    /// Uniform spacing along y.
    #[inline]
    pub fn dy(&self) -> f64 {
        self.y_faces.step()
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Horizontal coordinates along x at the given location.
    pub fn x_nodes(&self, location: Location) -> &UniformRange {
        match location {
            Location::Center => &self.x_centers,
            Location::Face => &self.x_faces,
        }
    }

    /// Horizontal coordinates along y at the given location.
    pub fn y_nodes(&self, location: Location) -> &UniformRange {
        match location {
            Location::Center => &self.y_centers,
            Location::Face => &self.y_faces,
        }
    }

    /// Vertical coordinates at the given location.
    pub fn z_nodes(&self, location: Location) -> &OffsetVec {
        match location {
            Location::Center => &self.z_centers,
            Location::Face => &self.z_faces,
        }
    }

    /// x-coordinate of center or face `i`.
    #[inline]
    pub fn x_node(&self, location: Location, i: isize) -> f64 {
        self.x_nodes(location).value(i)
    }

    /// y-coordinate of center or face `j`.
    #[inline]
    pub fn y_node(&self, location: Location, j: isize) -> f64 {
        self.y_nodes(location).value(j)
    }

    /// z-coordinate of center or face `k`.
    #[inline]
    pub fn z_node(&self, location: Location, k: isize) -> f64 {
        self.z_nodes(location)[k]
    }

    // =========================================================================
    // Vertical spacing
    // =========================================================================

    /// Layer thickness `ΔzF` over its full range.
    pub fn dz_faces(&self) -> &OffsetVec {
        &self.dz_faces
    }

    /// Center-to-center spacing `ΔzC` over its full range.
    pub fn dz_centers(&self) -> &OffsetVec {
        &self.dz_centers
    }

    /// Thickness of layer `k`.
    #[inline]
    pub fn delta_zf(&self, k: isize) -> f64 {
        self.dz_faces[k]
    }

    /// Distance between centers `k - 1` and `k`, located at face `k`.
    #[inline]
    pub fn delta_zc(&self, k: isize) -> f64 {
        self.dz_centers[k]
    }

    /// Thinnest interior layer.
    pub fn min_dz(&self) -> f64 {
        self.interior_dz().fold(f64::INFINITY, f64::min)
    }

    /// Thickest interior layer.
    pub fn max_dz(&self) -> f64 {
        self.interior_dz().fold(f64::NEG_INFINITY, f64::max)
    }

    fn interior_dz(&self) -> impl Iterator<Item = f64> + '_ {
        self.dz_faces
            .slice(1..=self.size.nz() as isize)
            .iter()
            .copied()
    }

    /// Spacing along `axis` at a point of the given location.
    ///
    /// Horizontal spacing is uniform. Along z, centers report the layer
    /// thickness `ΔzF[k]` and faces the center-to-center distance `ΔzC[k]`.
    ///
    /// ```
    /// use poisson_rs::grid::GridBuilder;
    /// use poisson_rs::types::{Axis, Interval, Location};
    /// use poisson_rs::vertical::ExplicitFaces;
    ///
    /// let grid = GridBuilder::new(4, 4, 2)
    ///     .with_x(Interval::new(0.0, 2.0))
    ///     .with_z_faces(ExplicitFaces(vec![0.0, 1.0, 3.0]))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(grid.spacing(Axis::X, Location::Center, 1, 1, 1), 0.5);
    /// assert_eq!(grid.spacing(Axis::Z, Location::Center, 1, 1, 2), 2.0);
    /// ```
    pub fn spacing(&self, axis: Axis, location: Location, _i: isize, _j: isize, k: isize) -> f64 {
        match (axis, location) {
            (Axis::X, _) => self.dx(),
            (Axis::Y, _) => self.dy(),
            (Axis::Z, Location::Center) => self.dz_faces[k],
            (Axis::Z, Location::Face) => self.dz_centers[k],
        }
    }

    /// Volume of cell `(i, j, k)`.
    #[inline]
    pub fn volume(&self, _i: isize, _j: isize, k: isize) -> f64 {
        self.dx() * self.dy() * self.dz_faces[k]
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Same geometry, adapted to another execution target.
    ///
    /// Host memory is shared by both targets, so values are carried over
    /// unchanged.
    pub fn on_architecture(self, architecture: Architecture) -> Self {
        let architecture = architecture.resolve();
        if architecture != self.architecture {
            log::debug!(
                "Moving grid {} from {} to {}",
                self.size,
                self.architecture,
                architecture
            );
        }
        Self {
            architecture,
            ..self
        }
    }

    /// Copy of the grid with different halo widths.
    ///
    /// A built grid does not keep its face source, so only the current halo
    /// (after zeroing Flat axes) can be honoured. Rebuild from the retained
    /// [`GridBuilder`](super::GridBuilder) to change it.
    pub fn with_halo(&self, halo: Halo3D) -> Result<Self> {
        let requested = flat_free_halo(halo, &self.topology);
        if requested == self.halo {
            return Ok(self.clone());
        }
        Err(ConfigError::HaloResize {
            current: self.halo,
            requested,
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Grid on {}: topology {}, halo {}, x ∈ {}, y ∈ {}, Lz = {:.4}, Δz ∈ [{:.4}, {:.4}]",
            self.size,
            self.architecture,
            self.topology,
            self.halo,
            self.x_extent,
            self.y_extent,
            self.lz,
            self.min_dz(),
            self.max_dz()
        )
    }
}

/// Halo widths with every Flat axis forced to zero.
pub(super) fn flat_free_halo(halo: Halo3D, topology: &Topology3D) -> Halo3D {
    let zero_if_flat = |h: usize, t: Topology| if t == Topology::Flat { 0 } else { h };
    Halo3D::new(
        zero_if_flat(halo.hx, topology.x),
        zero_if_flat(halo.hy, topology.y),
        zero_if_flat(halo.hz, topology.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use crate::vertical::{ExplicitFaces, GeometricStretching};
    use approx::assert_relative_eq;

    fn channel() -> Grid {
        GridBuilder::new(8, 4, 3)
            .with_x(Interval::new(-2.0, 2.0))
            .with_y(Interval::new(0.0, 1.0))
            .with_z_faces(ExplicitFaces(vec![-6.0, -3.0, -1.0, 0.0]))
            .with_topology(Topology3D::new(
                Topology::Periodic,
                Topology::Bounded,
                Topology::Bounded,
            ))
            .with_halo(Halo3D::new(2, 1, 1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_horizontal_coordinates() {
        let grid = channel();
        assert_relative_eq!(grid.dx(), 0.5);
        assert_relative_eq!(grid.dy(), 0.25);
        assert_relative_eq!(grid.x_node(Location::Face, 1), -2.0);
        assert_relative_eq!(grid.x_node(Location::Center, 1), -1.75);
        assert_relative_eq!(grid.x_node(Location::Center, 0), -2.25);

        // Periodic faces stop at Nx + Hx, Bounded at Ny + 1 + Hy
        assert_eq!(grid.x_nodes(Location::Face).last_index(), 10);
        assert_eq!(grid.x_nodes(Location::Face).first_index(), -1);
        assert_eq!(grid.y_nodes(Location::Face).last_index(), 6);
        assert_eq!(grid.y_nodes(Location::Center).last_index(), 5);
    }

    #[test]
    fn test_vertical_lookups() {
        let grid = channel();
        assert_relative_eq!(grid.lz(), 6.0);
        assert_relative_eq!(grid.z_node(Location::Face, 1), -6.0);
        assert_relative_eq!(grid.z_node(Location::Center, 1), -4.5);
        assert_relative_eq!(grid.delta_zf(1), 3.0);
        assert_relative_eq!(grid.delta_zf(3), 1.0);
        assert_relative_eq!(grid.delta_zc(2), 2.5);
        assert_relative_eq!(grid.spacing(Axis::Z, Location::Face, 1, 1, 2), 2.5);
        assert_relative_eq!(grid.volume(1, 1, 1), 0.5 * 0.25 * 3.0);
        assert_relative_eq!(grid.min_dz(), 1.0);
        assert_relative_eq!(grid.max_dz(), 3.0);
    }

    #[test]
    fn test_spacing_names_follow_differenced_nodes() {
        let grid = channel();
        let zf = grid.z_nodes(Location::Face);
        let zc = grid.z_nodes(Location::Center);
        // ΔzF differences faces and lives on centers
        for k in zc.indices() {
            assert_relative_eq!(grid.delta_zf(k), zf[k + 1] - zf[k], epsilon = 1e-14);
        }
        // ΔzC differences centers and lives on faces (k = Nz is corrected)
        assert_relative_eq!(grid.delta_zc(2), zc[2] - zc[1], epsilon = 1e-14);
        assert_relative_eq!(grid.delta_zc(3), grid.delta_zc(2));
    }

    #[test]
    fn test_on_architecture_preserves_geometry() {
        let grid = channel();
        let moved = grid.clone().on_architecture(Architecture::Multicore);
        assert_eq!(moved.z_nodes(Location::Center), grid.z_nodes(Location::Center));
        assert_eq!(moved.dz_centers(), grid.dz_centers());
        assert_eq!(moved.size(), grid.size());
    }

    #[test]
    fn test_with_halo() {
        let grid = GridBuilder::new(4, 4, 8)
            .with_z_faces(GeometricStretching::new(0.0, 1.0, 1.1))
            .build()
            .unwrap();
        assert!(grid.with_halo(grid.halo()).is_ok());
        assert!(matches!(
            grid.with_halo(Halo3D::uniform(3)),
            Err(ConfigError::HaloResize { .. })
        ));
    }

    #[test]
    fn test_display() {
        let s = format!("{}", channel());
        assert!(s.contains("8×4×3"));
        assert!(s.contains("Periodic"));
    }
}
