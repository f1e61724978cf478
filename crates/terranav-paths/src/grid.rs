use terranav_core::Position;

use crate::distance::slope_cost;
use crate::graph::GraphError;
use crate::neighbors::{CARDINAL, MOORE, VertexGrid};
use crate::traits::TerrainPather;

/// Which grid moves are allowed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

/// Edge cost between adjacent grid vertices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridCost {
    /// `1 + (10·|Δh|)³`, independent of the move length.
    #[default]
    HeightDelta,
    /// `run² + (10·rise/run)³`.
    Slope,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridParams {
    pub connectivity: Connectivity,
    pub cost: GridCost,
}

/// Terrain graph over the raw height grid. Two-point cost contract.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGraph {
    grid: VertexGrid,
    params: GridParams,
}

impl GridGraph {
    pub fn new(grid: VertexGrid, params: GridParams) -> Self {
        Self { grid, params }
    }

    #[inline]
    pub fn grid(&self) -> &VertexGrid {
        &self.grid
    }

    #[inline]
    pub fn params(&self) -> GridParams {
        self.params
    }
}

impl TerrainPather for GridGraph {
    fn neighbors(&self, p: Position, buf: &mut Vec<Position>) -> Result<(), GraphError> {
        let offsets: &[(i32, i32)] = match self.params.connectivity {
            Connectivity::Four => &CARDINAL,
            Connectivity::Eight => &MOORE,
        };
        self.grid.neighbors(p, offsets, buf)
    }

    fn cost(&self, _previous: Option<Position>, from: Position, to: Position) -> f32 {
        match self.params.cost {
            GridCost::HeightDelta => {
                let scaled = 10.0 * from.rise(to);
                1.0 + scaled * scaled * scaled
            }
            GridCost::Slope => slope_cost(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(params: GridParams) -> GridGraph {
        let vertices = (0..3)
            .flat_map(|z| (0..3).map(move |x| Position::new(x as f32, 0.1 * x as f32, z as f32)))
            .collect();
        GridGraph::new(VertexGrid::new(vertices, 3, 3).unwrap(), params)
    }

    #[test]
    fn connectivity_controls_neighbor_count() {
        let centre = Position::new(1.0, 0.1, 1.0);
        let mut buf = Vec::new();
        graph(GridParams::default()).neighbors(centre, &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        buf.clear();
        let four = GridParams {
            connectivity: Connectivity::Four,
            ..GridParams::default()
        };
        graph(four).neighbors(centre, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn height_delta_cost_ignores_distance() {
        let g = graph(GridParams::default());
        let a = Position::ZERO;
        assert_eq!(g.cost(None, a, Position::new(0.0, 0.0, 1.0)), 1.0);
        assert_eq!(g.cost(None, a, Position::new(1.0, 0.0, 1.0)), 1.0);
        // |Δh| = 0.1 -> 1 + 1³
        assert!((g.cost(None, a, Position::new(1.0, 0.1, 0.0)) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn slope_cost_uses_run() {
        let g = graph(GridParams {
            cost: GridCost::Slope,
            ..GridParams::default()
        });
        assert!((g.cost(None, Position::ZERO, Position::new(1.0, 0.0, 1.0)) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_position_is_rejected() {
        let g = graph(GridParams::default());
        let outside = Position::new(7.0, 0.0, 0.0);
        let mut buf = Vec::new();
        assert_eq!(
            g.neighbors(outside, &mut buf),
            Err(GraphError::InvalidVertexLookup(outside))
        );
    }
}
