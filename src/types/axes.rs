//! Axis, location and topology tags with named per-axis storage.
//!
//! Provides strongly-typed per-axis triples so that `(x, y, z)` never has to
//! be remembered as a tuple position.

use std::fmt;

/// Coordinate axis selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First horizontal direction.
    X,
    /// Second horizontal direction.
    Y,
    /// Vertical direction (stretched).
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Staggered location of a quantity along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Cell center.
    Center,
    /// Cell face (cell boundary).
    Face,
}

/// Boundary topology of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// The axis wraps: the last cell neighbours the first.
    Periodic,
    /// The axis has true walls at both ends.
    #[default]
    Bounded,
    /// The axis is collapsed to a single cell without halos.
    Flat,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Periodic => write!(f, "Periodic"),
            Topology::Bounded => write!(f, "Bounded"),
            Topology::Flat => write!(f, "Flat"),
        }
    }
}

/// Number of stored points along an axis, halos included.
///
/// Periodic axes omit the face that coincides with the first face after one
/// wrap; Flat axes never carry halos.
///
/// ```
/// use poisson_rs::types::{Location, Topology, total_length};
///
/// assert_eq!(total_length(Location::Face, Topology::Bounded, 4, 1), 7);
/// assert_eq!(total_length(Location::Face, Topology::Periodic, 4, 1), 6);
/// assert_eq!(total_length(Location::Center, Topology::Flat, 1, 3), 1);
/// ```
pub fn total_length(location: Location, topology: Topology, n: usize, halo: usize) -> usize {
    match (location, topology) {
        (_, Topology::Flat) => n,
        (Location::Face, Topology::Bounded) => n + 1 + 2 * halo,
        _ => n + 2 * halo,
    }
}

/// Values attached to each of the three axes.
///
/// # Example
///
/// ```
/// use poisson_rs::types::{Axis, PerAxis, Topology};
///
/// let topo = PerAxis::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
/// assert_eq!(*topo.get(Axis::Z), Topology::Bounded);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PerAxis<T> {
    /// Value for the x-axis.
    pub x: T,
    /// Value for the y-axis.
    pub y: T,
    /// Value for the z-axis.
    pub z: T,
}

/// Topology of all three axes.
pub type Topology3D = PerAxis<Topology>;

impl<T> PerAxis<T> {
    /// Create from explicit named values.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Same value on every axis.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            x: value.clone(),
            y: value.clone(),
            z: value,
        }
    }

    /// Map a function over all axes.
    pub fn map<U, F>(self, mut f: F) -> PerAxis<U>
    where
        F: FnMut(T) -> U,
    {
        PerAxis {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }

    /// Value for one axis.
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Convert to array `[x, y, z]`.
    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Iterate `(axis, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        [(Axis::X, &self.x), (Axis::Y, &self.y), (Axis::Z, &self.z)].into_iter()
    }
}

impl<T: Default> Default for PerAxis<T> {
    fn default() -> Self {
        Self {
            x: T::default(),
            y: T::default(),
            z: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for PerAxis<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl<T> From<(T, T, T)> for PerAxis<T> {
    fn from((x, y, z): (T, T, T)) -> Self {
        Self::new(x, y, z)
    }
}
