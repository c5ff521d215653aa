//! Halo-extended vertical metrics.
//!
//! Given a face-coordinate source, [`generate_vertical_metrics`] produces the
//! four vertical arrays of a stretched grid:
//!
//! ```text
//!   zF[k+1] ─────────────   face
//!                 │
//!   zC[k]    ·····│·····    center      ΔzF[k] = zF[k+1] - zF[k]   (at centers)
//!                 │
//!   zF[k]   ─────────────   face        ΔzC[k] = zC[k] - zC[k-1]   (at faces)
//! ```
//!
//! Halo layers below face 1 and above face `Nz + 1` are built by repeating
//! interior spacings: Bounded (and Flat) columns replicate the nearest
//! interior layer, Periodic columns wrap spacings from the opposite end.

use std::fmt;

use super::coordinates::FaceCoordinates;
use crate::types::{OffsetVec, Topology};

/// Vertical coordinates and spacings of one column, halo included.
///
/// All arrays use the 1-based halo-offset convention: index `1` is the
/// bottom interior face or center.
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalMetrics {
    /// Topology the halos were built for.
    pub topology: Topology,
    /// Number of interior layers.
    pub nz: usize,
    /// Halo width the arrays were built with.
    pub hz: usize,
    /// Interior column height `zF[Nz+1] - zF[1]`.
    pub lz: f64,
    /// Face heights, `1-Hz ..= Nz+1+Hz` (Periodic: `..= Nz+Hz`).
    pub z_faces: OffsetVec,
    /// Center heights, `1-Hz ..= Nz+Hz`.
    pub z_centers: OffsetVec,
    /// Face-to-face spacing (layer thickness) at centers, `1-Hz ..= Nz+Hz`.
    pub dz_faces: OffsetVec,
    /// Center-to-center spacing at faces, `2-Hz ..= Nz+Hz`.
    pub dz_centers: OffsetVec,
}

impl VerticalMetrics {
    /// Thinnest interior layer.
    pub fn min_spacing(&self) -> f64 {
        self.interior_thickness().fold(f64::INFINITY, f64::min)
    }

    /// Thickest interior layer.
    pub fn max_spacing(&self) -> f64 {
        self.interior_thickness().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Ratio of the thickest to the thinnest interior layer (1 when uniform).
    pub fn refinement_ratio(&self) -> f64 {
        self.max_spacing() / self.min_spacing()
    }

    fn interior_thickness(&self) -> impl Iterator<Item = f64> + '_ {
        self.dz_faces.slice(1..=self.nz as isize).iter().copied()
    }
}

impl fmt::Display for VerticalMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VerticalMetrics({}, Nz={}, Hz={}, Lz={:.4}, Δz ∈ [{:.4}, {:.4}])",
            self.topology,
            self.nz,
            self.hz,
            self.lz,
            self.min_spacing(),
            self.max_spacing()
        )
    }
}

/// Build halo-extended vertical metrics from a face-coordinate source.
///
/// The source is sampled at faces `1 ..= nz + 1`. No monotonicity check is
/// made: a decreasing source yields negative spacings.
///
/// # Example
///
/// ```
/// use poisson_rs::types::Topology;
/// use poisson_rs::vertical::{UniformSpacing, generate_vertical_metrics};
///
/// let m = generate_vertical_metrics(Topology::Bounded, 4, 1, &UniformSpacing::new(0.0, 1.0));
/// assert_eq!(m.lz, 4.0);
/// assert_eq!(m.z_faces[0], -1.0);
/// assert_eq!(m.z_faces[6], 5.0);
/// assert_eq!(m.z_centers[1], 0.5);
/// ```
pub fn generate_vertical_metrics<S>(
    topology: Topology,
    nz: usize,
    hz: usize,
    source: &S,
) -> VerticalMetrics
where
    S: FaceCoordinates + ?Sized,
{
    debug_assert!(nz >= 1);

    let interior: Vec<f64> = (1..=nz + 1).map(|k| source.face(k, nz)).collect();
    let lz = interior[nz] - interior[0];

    // Thickness of interior layer `layer` (1-based)
    let thickness = |layer: usize| interior[layer] - interior[layer - 1];

    let below: Vec<f64> = (1..=hz)
        .map(|m| match topology {
            Topology::Periodic => thickness((nz - m % nz) % nz + 1),
            Topology::Bounded | Topology::Flat => thickness(1),
        })
        .collect();
    let above: Vec<f64> = (1..=hz)
        .map(|m| match topology {
            Topology::Periodic => thickness((m - 1) % nz + 1),
            Topology::Bounded | Topology::Flat => thickness(nz),
        })
        .collect();

    let mut faces = Vec::with_capacity(nz + 1 + 2 * hz);
    let lower: Vec<f64> = below
        .iter()
        .scan(interior[0], |z, dz| {
            *z -= dz;
            Some(*z)
        })
        .collect();
    faces.extend(lower.iter().rev());
    faces.extend_from_slice(&interior);
    let mut z = interior[nz];
    for dz in &above {
        z += dz;
        faces.push(z);
    }

    let first = 1 - hz as isize;
    let z_faces = OffsetVec::new(faces, first);
    let center_range = first..=(nz + hz) as isize;

    let z_centers = OffsetVec::from_fn(center_range.clone(), |k| {
        0.5 * (z_faces[k] + z_faces[k + 1])
    });
    let dz_faces = OffsetVec::from_fn(center_range, |k| z_faces[k + 1] - z_faces[k]);
    let dz_centers = OffsetVec::from_fn(first + 1..=(nz + hz) as isize, |k| {
        z_centers[k] - z_centers[k - 1]
    });

    // Periodic columns drop the face that repeats the first one after a wrap
    let z_faces = match topology {
        Topology::Periodic => z_faces.restrict(first..=(nz + hz) as isize),
        Topology::Bounded | Topology::Flat => z_faces,
    };

    VerticalMetrics {
        topology,
        nz,
        hz,
        lz,
        z_faces,
        z_centers,
        dz_faces,
        dz_centers,
    }
}
