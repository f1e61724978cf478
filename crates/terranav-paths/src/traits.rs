use terranav_core::Position;

use crate::distance::euclidean;
use crate::graph::GraphError;

/// Terrain graph interface used by A*.
///
/// Implementations pick one cost contract and keep to it: two-point graphs
/// ignore `previous`, three-point graphs use it for direction-aware terms.
pub trait TerrainPather {
    /// Append neighbours of `p` into `buf`. The caller clears `buf` before
    /// calling. Must be deterministic for a given `p`.
    fn neighbors(&self, p: Position, buf: &mut Vec<Position>) -> Result<(), GraphError>;

    /// Cost of moving from `from` to adjacent `to`, having arrived at `from`
    /// from `previous` (`None` at the start). Must be non-negative;
    /// `f32::INFINITY` marks an impassable move.
    fn cost(&self, previous: Option<Position>, from: Position, to: Position) -> f32;

    /// Heuristic estimate of the remaining cost from `from` to `to`.
    fn estimate(&self, from: Position, to: Position) -> f32 {
        euclidean(from, to)
    }
}
