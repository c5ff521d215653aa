//! Strongly-typed configuration and indexing types.
//!
//! # Design Philosophy
//!
//! - **Named fields over positional**: `PerAxis { x, y, z }` instead of tuples
//! - **Validated construction**: `Resolution3D::new` rejects empty axes
//! - **Halo-aware indexing**: [`OffsetVec`] and [`UniformRange`] use the
//!   1-based, halo-offset convention shared by every grid quantity
//!
//! # Example
//!
//! ```
//! use poisson_rs::types::{Halo3D, Interval, Resolution3D, Topology, Topology3D};
//!
//! let size = Resolution3D::new(32, 32, 16).unwrap();
//! let halo = Halo3D::uniform(1);
//! let x = Interval::new(0.0, 1e3);
//! let topology = Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
//! assert_eq!(size.columns(), 1024);
//! assert_eq!(halo.hz, 1);
//! assert_eq!(x.length(), 1e3);
//! assert_eq!(topology.z, Topology::Bounded);
//! ```

mod axes;
mod bounds;
mod offset;
mod resolution;

pub use axes::{Axis, Location, PerAxis, Topology, Topology3D, total_length};
pub use bounds::Interval;
pub use offset::{OffsetVec, UniformRange};
pub use resolution::{Halo3D, Resolution3D};
