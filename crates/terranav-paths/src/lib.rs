//! Pathfinding over height-field terrain.
//!
//! This crate provides the search half of terranav:
//!
//! - an [`IndexedMinHeap`] whose items track their own slot, so a queued
//!   node can be re-sifted after its cost drops
//! - the [`TerrainPather`] capability (neighbours, movement cost, heuristic)
//!   and its three concrete graphs, gathered in the closed [`TerrainGraph`]
//!   enum
//! - **A\*** search ([`find_path`], [`AStarSearch`]) with typed failure
//! - Catmull-Rom path smoothing ([`smooth_path`])
//!
//! # Graph variants
//!
//! | Variant | Neighbours | Cost |
//! |---|---|---|
//! | [`GridGraph`] | 4- or 8-connected grid | `1 + (10·Δh)³` or slope cost |
//! | [`AnisotropicGraph`] | coprime offsets within a radius | surface distance × slope band + turn band |
//! | [`MeshGraph`] | half-edge fan around a nav-mesh vertex | `run² + (10·rise/run)³` |

mod anisotropic;
mod astar;
mod distance;
mod graph;
mod grid;
mod heap;
mod mesh;
mod neighbors;
mod spline;
mod traits;

pub use anisotropic::{AnisotropicGraph, AnisotropicParams, Band};
pub use astar::{AStarSearch, Expansion, Path, PathError, SearchNode, Step, find_path};
pub use distance::{euclidean, slope_cost, slope_degrees, turn_degrees};
pub use graph::{GraphError, GraphVariant, TerrainGraph, build_terrain_graph};
pub use grid::{Connectivity, GridCost, GridGraph, GridParams};
pub use heap::{HeapError, HeapItem, IndexedMinHeap};
pub use mesh::MeshGraph;
pub use neighbors::{VertexGrid, coprime_offsets};
pub use spline::{SplineConfig, catmull_rom, smooth_path, smooth_path_with};
pub use traits::TerrainPather;
