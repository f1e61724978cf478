//! **terranav-core**: shared value types for the terranav navigation crates.
//!
//! This crate provides the types every other terranav crate speaks:
//! the exact-equality [`Position`] key, the row-major [`HeightField`]
//! scalar grid, and the [`TerrainMesh`] vertex/index buffers generated from
//! a height field.

pub mod geom;
pub mod heightfield;
pub mod terrain;

pub use geom::Position;
pub use heightfield::{HeightField, HeightFieldError};
pub use terrain::TerrainMesh;
