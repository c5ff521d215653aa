//! Vertical face-coordinate sources.
//!
//! A source maps a 1-based face index `k ∈ [1, Nz + 1]` to a physical height.
//! Sources are expected to increase with `k`; this is not validated.
//!
//! # Available Sources
//!
//! - [`ExplicitFaces`]: user-supplied array of `Nz + 1` heights
//! - [`FaceFn`]: closure of the face index
//! - [`UniformSpacing`]: constant layer thickness
//! - [`GeometricStretching`]: each layer a constant ratio taller than the one below
//! - [`SongHaidvogelFaces`]: terrain-following surface/bottom clustering over a depth
//!
//! # Example
//!
//! ```
//! use poisson_rs::vertical::{FaceCoordinates, GeometricStretching, UniformSpacing};
//!
//! let uniform = UniformSpacing::new(0.0, 1.0);
//! assert_eq!(uniform.face(5, 4), 4.0);
//!
//! let stretched = GeometricStretching::new(-100.0, 2.0, 1.1);
//! assert!(stretched.face(3, 10) - stretched.face(2, 10) > 2.0);
//! ```

/// Trait for vertical face-coordinate sources.
pub trait FaceCoordinates: Send + Sync {
    /// Height of face `k` (1-based) for a column of `nz` layers.
    fn face(&self, k: usize, nz: usize) -> f64;

    /// Number of faces the source can provide, if it is finite.
    fn face_count(&self) -> Option<usize> {
        None
    }

    /// Human-readable name for diagnostics and logging.
    fn name(&self) -> &'static str;

    /// Description of parameters (for diagnostics).
    fn description(&self) -> String {
        self.name().to_string()
    }
}

// =============================================================================
// Explicit array
// =============================================================================

/// Face heights given as an explicit array, bottom first.
///
/// `faces[0]` is face `k = 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplicitFaces(pub Vec<f64>);

impl FaceCoordinates for ExplicitFaces {
    fn face(&self, k: usize, _nz: usize) -> f64 {
        self.0[k - 1]
    }

    fn face_count(&self) -> Option<usize> {
        Some(self.0.len())
    }

    fn name(&self) -> &'static str {
        "explicit"
    }

    fn description(&self) -> String {
        format!("explicit ({} faces)", self.0.len())
    }
}

impl From<Vec<f64>> for ExplicitFaces {
    fn from(faces: Vec<f64>) -> Self {
        Self(faces)
    }
}

// =============================================================================
// Closure
// =============================================================================

/// Face heights from a closure of the 1-based face index.
///
/// ```
/// use poisson_rs::vertical::{FaceCoordinates, FaceFn};
///
/// let faces = FaceFn(|k: usize| (k as f64 - 1.0).powi(2));
/// assert_eq!(faces.face(3, 8), 4.0);
/// ```
#[derive(Clone, Copy)]
pub struct FaceFn<F>(pub F);

impl<F> FaceCoordinates for FaceFn<F>
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    fn face(&self, k: usize, _nz: usize) -> f64 {
        (self.0)(k)
    }

    fn name(&self) -> &'static str {
        "function"
    }
}

impl<F> std::fmt::Debug for FaceFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FaceFn(..)")
    }
}

// =============================================================================
// Uniform spacing
// =============================================================================

/// Constant layer thickness starting at `bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformSpacing {
    /// Height of the first face.
    pub bottom: f64,
    /// Layer thickness.
    pub spacing: f64,
}

impl UniformSpacing {
    /// Create uniform spacing.
    pub fn new(bottom: f64, spacing: f64) -> Self {
        Self { bottom, spacing }
    }

    /// Uniform layers spanning `[bottom, top]` with `nz` layers.
    pub fn spanning(bottom: f64, top: f64, nz: usize) -> Self {
        Self::new(bottom, (top - bottom) / nz as f64)
    }
}

impl FaceCoordinates for UniformSpacing {
    fn face(&self, k: usize, _nz: usize) -> f64 {
        self.bottom + (k - 1) as f64 * self.spacing
    }

    fn name(&self) -> &'static str {
        "uniform"
    }

    fn description(&self) -> String {
        format!("uniform (Δz={})", self.spacing)
    }
}

// =============================================================================
// Geometric stretching
// =============================================================================

/// Layers growing by a constant `ratio` from the bottom up.
///
/// Layer `k` has thickness `first_spacing · ratio^(k-1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometricStretching {
    /// Height of the first face.
    pub bottom: f64,
    /// Thickness of the bottom layer.
    pub first_spacing: f64,
    /// Thickness ratio between consecutive layers.
    pub ratio: f64,
}

impl GeometricStretching {
    /// Create geometric stretching.
    pub fn new(bottom: f64, first_spacing: f64, ratio: f64) -> Self {
        Self {
            bottom,
            first_spacing,
            ratio,
        }
    }
}

impl FaceCoordinates for GeometricStretching {
    fn face(&self, k: usize, _nz: usize) -> f64 {
        let m = (k - 1) as i32;
        if (self.ratio - 1.0).abs() < f64::EPSILON {
            return self.bottom + m as f64 * self.first_spacing;
        }
        // Partial geometric sum of the layers below face k
        self.bottom + self.first_spacing * (self.ratio.powi(m) - 1.0) / (self.ratio - 1.0)
    }

    fn name(&self) -> &'static str {
        "geometric"
    }

    fn description(&self) -> String {
        format!(
            "geometric (Δz₁={}, ratio={})",
            self.first_spacing, self.ratio
        )
    }
}

// =============================================================================
// Song-Haidvogel
// =============================================================================

/// Song-Haidvogel stretching of a water column of given `depth`.
///
/// Faces span `[-depth, 0]`. Uniform sigma levels `s ∈ [-1, 0]` are mapped
/// through a blend of a surface (`cosh`) and a bottom (`tanh`) clustering
/// function, both of which fix the end points.
///
/// - `theta_s`: surface refinement (0 = none, 5-7 typical for a mixed layer)
/// - `theta_b`: bottom refinement (0 = none, 0-2 typical)
///
/// # References
///
/// - Song, Y. and D.B. Haidvogel (1994): A semi-implicit ocean circulation
///   model using a generalized topography-following coordinate system.
///   J. Comp. Phys., 115, 228-244.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SongHaidvogelFaces {
    /// Column depth (positive).
    pub depth: f64,
    /// Surface stretching parameter.
    pub theta_s: f64,
    /// Bottom stretching parameter.
    pub theta_b: f64,
}

impl SongHaidvogelFaces {
    /// Create Song-Haidvogel faces.
    pub fn new(depth: f64, theta_s: f64, theta_b: f64) -> Self {
        Self {
            depth,
            theta_s,
            theta_b,
        }
    }

    /// Stretched sigma for uniform sigma `s`; `cs(-1) = -1`, `cs(0) = 0`.
    fn cs(&self, s: f64) -> f64 {
        let surface = (self.theta_s > 0.0)
            .then(|| (1.0 - (self.theta_s * s).cosh()) / (self.theta_s.cosh() - 1.0));
        let bottom = (self.theta_b > 0.0)
            .then(|| (self.theta_b * (s + 1.0)).tanh() / self.theta_b.tanh() - 1.0);

        match (surface, bottom) {
            (Some(cs_s), Some(cs_b)) => {
                let total = self.theta_s + self.theta_b;
                (self.theta_s * cs_s + self.theta_b * cs_b) / total
            }
            (Some(cs_s), None) => cs_s,
            (None, Some(cs_b)) => cs_b,
            (None, None) => s,
        }
    }
}

impl FaceCoordinates for SongHaidvogelFaces {
    fn face(&self, k: usize, nz: usize) -> f64 {
        let s = -1.0 + (k - 1) as f64 / nz as f64;
        self.depth * self.cs(s)
    }

    fn name(&self) -> &'static str {
        "song_haidvogel"
    }

    fn description(&self) -> String {
        format!(
            "Song-Haidvogel (depth={:.0}m, theta_s={:.1}, theta_b={:.1})",
            self.depth, self.theta_s, self.theta_b
        )
    }
}
