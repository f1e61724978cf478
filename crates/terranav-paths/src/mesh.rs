use terranav_core::Position;
use terranav_mesh::{HalfEdgeMesh, NavMesh};

use crate::distance::slope_cost;
use crate::graph::GraphError;
use crate::traits::TerrainPather;

/// Terrain graph over the vertices of a half-edge nav mesh.
///
/// Neighbours come from the vertex fan, so a vertex on the mesh boundary may
/// expose only part of its adjacent vertices. Two-point cost contract.
#[derive(Debug, Clone)]
pub struct MeshGraph {
    mesh: HalfEdgeMesh,
}

impl MeshGraph {
    pub fn new(mesh: HalfEdgeMesh) -> Self {
        Self { mesh }
    }

    #[inline]
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }
}

impl From<NavMesh> for MeshGraph {
    fn from(nav: NavMesh) -> Self {
        Self::new(nav.mesh)
    }
}

impl TerrainPather for MeshGraph {
    fn neighbors(&self, p: Position, buf: &mut Vec<Position>) -> Result<(), GraphError> {
        let v = self
            .mesh
            .vertex_id(p)
            .ok_or(GraphError::InvalidVertexLookup(p))?;
        buf.extend(self.mesh.neighbors(v).map(|n| self.mesh.position(n)));
        Ok(())
    }

    fn cost(&self, _previous: Option<Position>, from: Position, to: Position) -> f32 {
        slope_cost(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon() -> (Position, Vec<Position>, MeshGraph) {
        let centre = Position::new(0.0, 1.0, 0.0);
        let ring: Vec<Position> = (0..6)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / 6.0;
                Position::new(2.0 * a.cos(), 0.0, 2.0 * a.sin())
            })
            .collect();
        let triangles: Vec<[Position; 3]> = (0..6)
            .map(|i| [centre, ring[i], ring[(i + 1) % 6]])
            .collect();
        let mesh = HalfEdgeMesh::from_triangles(&triangles).unwrap();
        (centre, ring, MeshGraph::new(mesh))
    }

    #[test]
    fn interior_vertex_sees_whole_ring() {
        let (centre, ring, graph) = hexagon();
        let mut buf = Vec::new();
        graph.neighbors(centre, &mut buf).unwrap();
        assert_eq!(buf.len(), 6);
        for p in &ring {
            assert!(buf.contains(p));
        }
    }

    #[test]
    fn missing_vertex_is_an_error() {
        let (_, _, graph) = hexagon();
        let p = Position::new(9.0, 0.0, 9.0);
        let mut buf = Vec::new();
        assert_eq!(
            graph.neighbors(p, &mut buf),
            Err(GraphError::InvalidVertexLookup(p))
        );
    }

    #[test]
    fn cost_penalises_climbing() {
        let (centre, ring, graph) = hexagon();
        let flat = graph.cost(None, ring[0], ring[1]);
        let climb = graph.cost(None, ring[0], centre);
        // Ring edges and spokes both have run 2.
        assert!((flat - 4.0).abs() < 1e-4);
        assert!((climb - (4.0 + 125.0)).abs() < 1e-2);
    }
}
