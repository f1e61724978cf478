//! Navigation mesh assembly: triangulate contour points and expose render
//! buffers alongside the half-edge mesh.

use terranav_core::Position;

use crate::dcel::{FaceId, HalfEdgeMesh};
use crate::delaunay::triangulate;
use crate::error::MeshError;

/// A walkable triangulated surface.
#[derive(Debug, Clone)]
pub struct NavMesh {
    /// One entry per mesh vertex, indexed like [`HalfEdgeMesh::vertices`].
    pub vertices: Vec<Position>,
    /// Three vertex indices per triangle, counter-clockwise in `(x, z)`.
    pub indices: Vec<u32>,
    pub mesh: HalfEdgeMesh,
}

impl NavMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The vertex closest to `p` in the ground plane.
    pub fn nearest_vertex(&self, p: Position) -> Option<Position> {
        self.vertices
            .iter()
            .copied()
            .min_by(|a, b| a.planar_distance(p).total_cmp(&b.planar_distance(p)))
    }
}

/// Build a navigation mesh over `points` (typically contour vertices).
pub fn build_nav_mesh(points: &[Position]) -> Result<NavMesh, MeshError> {
    let triangulation = triangulate(points)?;
    let mesh = HalfEdgeMesh::from_triangulation(&triangulation)?;

    let vertices: Vec<Position> = mesh.vertices().iter().map(|v| v.position).collect();
    let mut indices = Vec::with_capacity(mesh.faces().len() * 3);
    for f in 0..mesh.faces().len() {
        indices.extend(mesh.face_vertices(FaceId(f)).iter().map(|v| v.0 as u32));
    }

    log::debug!(
        "navmesh: {} input points -> {} vertices, {} triangles",
        points.len(),
        vertices.len(),
        indices.len() / 3
    );
    Ok(NavMesh {
        vertices,
        indices,
        mesh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{ContourConfig, contour_vertices, extract_contours};
    use crate::delaunay::orientation;
    use terranav_core::HeightField;

    #[test]
    fn buffers_match_mesh() {
        let pts = [
            Position::new(0.0, 1.0, 0.0),
            Position::new(4.0, 2.0, 0.0),
            Position::new(4.0, 3.0, 4.0),
            Position::new(0.0, 4.0, 4.0),
            Position::new(2.0, 5.0, 1.0),
        ];
        let nav = build_nav_mesh(&pts).unwrap();
        assert_eq!(nav.vertices.len(), 5);
        assert_eq!(nav.triangle_count(), nav.mesh.faces().len());
        for tri in nav.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| nav.vertices[i as usize]);
            assert!(orientation(a, b, c) > 0.0);
        }
        for v in &pts {
            assert!(nav.mesh.vertex_id(*v).is_some());
        }
    }

    #[test]
    fn nearest_vertex_ignores_elevation() {
        let pts = [
            Position::new(0.0, 100.0, 0.0),
            Position::new(10.0, 0.0, 0.0),
            Position::new(0.0, 0.0, 10.0),
        ];
        let nav = build_nav_mesh(&pts).unwrap();
        assert_eq!(
            nav.nearest_vertex(Position::new(1.0, 0.0, 1.0)),
            Some(Position::new(0.0, 100.0, 0.0))
        );
    }

    #[test]
    fn degenerate_input_propagates() {
        let err = build_nav_mesh(&[Position::ZERO, Position::new(1.0, 0.0, 0.0)]).unwrap_err();
        assert!(err.is_degenerate_geometry());
    }

    #[test]
    fn contour_pipeline_builds_mesh() {
        // A round hill gives closed, well separated rings.
        let field = HeightField::from_fn(40, 40, |x, z| {
            let dx = x as f32 - 19.5;
            let dz = z as f32 - 19.5;
            (1.0 - (dx * dx + dz * dz).sqrt() / 28.0).max(0.0)
        })
        .unwrap();
        let config = ContourConfig {
            samples_x: 40,
            samples_y: 40,
            iso_count: 4,
            height_multiplier: 8.0,
        };
        let contours = extract_contours(&field, &config).unwrap();
        assert!(!contours.is_empty());
        let nav = build_nav_mesh(&contour_vertices(&contours)).unwrap();
        assert!(nav.triangle_count() > 0);
        for (i, he) in nav.mesh.half_edges().iter().enumerate() {
            let e = crate::dcel::HalfEdgeId(i);
            assert_eq!(nav.mesh.half_edge(he.twin).twin, e);
            assert_eq!(nav.mesh.destination(he.twin), he.origin);
        }
    }
}
