//! Direction-aware terrain graph.
//!
//! Movement cost follows the least-cost road planning model: the 3D surface
//! distance is scaled by a banded slope penalty, moves steeper than a limit
//! are impassable, and changing heading adds a banded turn penalty.

use terranav_core::Position;

use crate::distance::{slope_degrees, turn_degrees};
use crate::graph::GraphError;
use crate::neighbors::{VertexGrid, coprime_offsets};
use crate::traits::TerrainPather;

/// A step in a banded penalty: angles strictly above `above` degrees get
/// `weight`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub above: f32,
    pub weight: f32,
}

impl Band {
    pub const fn new(above: f32, weight: f32) -> Self {
        Self { above, weight }
    }
}

/// Weight of the first band (in descending `above` order) that `angle`
/// exceeds, 0 when none does.
fn band_weight(bands: &[Band], angle: f32) -> f32 {
    bands
        .iter()
        .find(|b| angle > b.above)
        .map_or(0.0, |b| b.weight)
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AnisotropicParams {
    /// Largest `|dx|` or `|dz|` of a single move.
    pub radius: u32,
    /// Moves steeper than this many degrees are impassable.
    pub max_slope_deg: f32,
    /// Slope penalty bands, descending by `above`.
    pub slope_bands: Vec<Band>,
    /// Flat turn penalty bands, descending by `above`.
    pub turn_bands: Vec<Band>,
}

impl Default for AnisotropicParams {
    fn default() -> Self {
        Self {
            radius: 2,
            max_slope_deg: 16.0,
            slope_bands: vec![Band::new(12.0, 4.0), Band::new(6.0, 1.0)],
            turn_bands: vec![
                Band::new(90.0, 8.0),
                Band::new(45.0, 4.0),
                Band::new(30.0, 2.0),
                Band::new(15.0, 1.0),
            ],
        }
    }
}

/// Terrain graph with long coprime moves and a three-point cost.
#[derive(Debug, Clone, PartialEq)]
pub struct AnisotropicGraph {
    grid: VertexGrid,
    params: AnisotropicParams,
    offsets: Vec<(i32, i32)>,
}

impl AnisotropicGraph {
    pub fn new(grid: VertexGrid, params: AnisotropicParams) -> Result<Self, GraphError> {
        let offsets = coprime_offsets(params.radius)?;
        Ok(Self {
            grid,
            params,
            offsets,
        })
    }

    #[inline]
    pub fn grid(&self) -> &VertexGrid {
        &self.grid
    }

    #[inline]
    pub fn params(&self) -> &AnisotropicParams {
        &self.params
    }

    #[inline]
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }
}

impl TerrainPather for AnisotropicGraph {
    fn neighbors(&self, p: Position, buf: &mut Vec<Position>) -> Result<(), GraphError> {
        self.grid.neighbors(p, &self.offsets, buf)
    }

    fn cost(&self, previous: Option<Position>, from: Position, to: Position) -> f32 {
        let slope = slope_degrees(from, to);
        if slope > self.params.max_slope_deg {
            return f32::INFINITY;
        }
        let slope_weight = band_weight(&self.params.slope_bands, slope);
        let turn_weight = previous.map_or(0.0, |prev| {
            band_weight(&self.params.turn_bands, turn_degrees(prev, from, to))
        });
        from.distance(to) * (1.0 + slope * slope_weight) + turn_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(heights: impl Fn(usize, usize) -> f32) -> AnisotropicGraph {
        let vertices = (0..5)
            .flat_map(|z| {
                let heights = &heights;
                (0..5).map(move |x| Position::new(x as f32, heights(x, z), z as f32))
            })
            .collect();
        let grid = VertexGrid::new(vertices, 5, 5).unwrap();
        AnisotropicGraph::new(grid, AnisotropicParams::default()).unwrap()
    }

    #[test]
    fn band_lookup() {
        let p = AnisotropicParams::default();
        assert_eq!(band_weight(&p.slope_bands, 5.0), 0.0);
        assert_eq!(band_weight(&p.slope_bands, 6.0), 0.0);
        assert_eq!(band_weight(&p.slope_bands, 8.0), 1.0);
        assert_eq!(band_weight(&p.slope_bands, 13.0), 4.0);
        assert_eq!(band_weight(&p.turn_bands, 180.0), 8.0);
        assert_eq!(band_weight(&p.turn_bands, 45.0), 2.0);
    }

    #[test]
    fn flat_cost_is_distance() {
        let g = graph(|_, _| 0.0);
        let a = Position::ZERO;
        let b = Position::new(2.0, 0.0, 1.0);
        assert!((g.cost(None, a, b) - 5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn steep_moves_are_impassable() {
        let g = graph(|_, _| 0.0);
        let a = Position::ZERO;
        // atan(0.3) ≈ 16.7°
        assert_eq!(g.cost(None, a, Position::new(1.0, 0.3, 0.0)), f32::INFINITY);
        // atan(0.25) ≈ 14°: weighted ×4
        let b = Position::new(1.0, 0.25, 0.0);
        let slope = slope_degrees(a, b);
        let expected = a.distance(b) * (1.0 + 4.0 * slope);
        assert!((g.cost(None, a, b) - expected).abs() < 1e-3);
    }

    #[test]
    fn turning_adds_flat_penalty() {
        let g = graph(|_, _| 0.0);
        let prev = Position::ZERO;
        let cur = Position::new(1.0, 0.0, 0.0);
        let straight = g.cost(Some(prev), cur, Position::new(2.0, 0.0, 0.0));
        // atan(2) ≈ 63°
        let sharp = g.cost(Some(prev), cur, Position::new(2.0, 0.0, 2.0));
        let reverse = g.cost(Some(prev), cur, prev);
        assert!((straight - 1.0).abs() < 1e-6);
        assert!((sharp - (5f32.sqrt() + 4.0)).abs() < 1e-5);
        assert!((reverse - 9.0).abs() < 1e-6);
    }

    #[test]
    fn neighbors_use_radius() {
        let g = graph(|_, _| 0.0);
        let mut buf = Vec::new();
        g.neighbors(Position::new(2.0, 0.0, 2.0), &mut buf).unwrap();
        assert_eq!(buf.len(), 16);
        buf.clear();
        g.neighbors(Position::ZERO, &mut buf).unwrap();
        // (1,0) (0,1) (1,1) (2,1) (1,2)
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn zero_radius_rejected() {
        let grid = VertexGrid::new(vec![Position::ZERO], 1, 1).unwrap();
        let params = AnisotropicParams {
            radius: 0,
            ..AnisotropicParams::default()
        };
        assert_eq!(
            AnisotropicGraph::new(grid, params),
            Err(GraphError::InvalidRadius)
        );
    }
}
