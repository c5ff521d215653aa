//! Vertically stretched rectilinear grids.
//!
//! A [`Grid`] has uniform spacing along x and y and arbitrary spacing along
//! z, each axis carrying halo cells on both sides. Grids are built once by a
//! [`GridBuilder`], never mutated, and shared through `Arc<Grid>`.
//!
//! # Index Convention
//!
//! ```text
//!   halo         interior                 halo
//! ┌─────┬─────┬─────┬── ··· ──┬─────┬─────┬─────┐
//! │ 1-H │  0  │  1  │         │  N  │ N+1 │ N+H │   centers
//! └─────┴─────┴─────┴── ··· ──┴─────┴─────┴─────┘
//! 1-H   0     1     2         N    N+1   N+2  N+1+H  faces (Bounded)
//! ```

mod builder;
mod rectilinear;

pub use builder::GridBuilder;
pub use rectilinear::Grid;
