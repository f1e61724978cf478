//! Doubly connected edge list (half-edge mesh) built from a triangle set.
//!
//! # Structure
//!
//! Every undirected edge is a pair of directed half-edges (twins). A
//! half-edge knows its `origin`, its `twin`, and, when it borders a
//! triangle, the `next`/`previous` half-edges of that triangle and the
//! `face` itself. Half-edges on the mesh boundary have a twin but no face,
//! so their `next` is `None`.
//!
//! # Indexing
//!
//! Elements live in flat `Vec`s addressed by typed indices ([`VertexId`],
//! [`HalfEdgeId`], [`FaceId`]). The mesh is built once and is read-only
//! afterwards; nothing is ever removed.

use std::collections::HashMap;
use std::fmt;

use terranav_core::Position;

use crate::delaunay::{Triangulation, orientation};
use crate::error::MeshError;

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

macro_rules! idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

idx!(VertexId);
idx!(HalfEdgeId);
idx!(FaceId);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Position,
    /// First triangle half-edge seen leaving this vertex.
    pub incident_edge: Option<HalfEdgeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub twin: HalfEdgeId,
    pub next: Option<HalfEdgeId>,
    pub previous: Option<HalfEdgeId>,
    /// `None` on the mesh boundary.
    pub face: Option<FaceId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub outer_edge: HalfEdgeId,
}

// ---------------------------------------------------------------------------
// HalfEdgeMesh
// ---------------------------------------------------------------------------

/// Half-edge mesh over a set of triangles.
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeMesh {
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face>,
    lookup: HashMap<Position, VertexId>,
}

impl HalfEdgeMesh {
    /// Build the mesh from coordinate triangles.
    ///
    /// Vertices are deduplicated by exact coordinate. Each triangle is
    /// rewound counter-clockwise in the `(x, z)` plane so that neighbouring
    /// faces traverse their shared edge in opposite directions.
    pub fn from_triangles(triangles: &[[Position; 3]]) -> Result<Self, MeshError> {
        let mut mesh = Self::default();
        let mut edges: HashMap<(VertexId, VertexId), HalfEdgeId> = HashMap::new();

        for &[a, b, c] in triangles {
            let area = orientation(a, b, c);
            if area == 0.0 {
                return Err(MeshError::DegenerateTriangle { a, b, c });
            }
            let (b, c) = if area > 0.0 { (b, c) } else { (c, b) };

            let v = [mesh.vertex_for(a), mesh.vertex_for(b), mesh.vertex_for(c)];
            let face = FaceId(mesh.faces.len());

            let mut cycle = [HalfEdgeId(0); 3];
            for k in 0..3 {
                let (from, to) = (v[k], v[(k + 1) % 3]);
                let e = mesh.edge_between(&mut edges, from, to);
                if mesh.half_edges[e.0].face.is_some() {
                    return Err(MeshError::NonManifoldEdge {
                        from: mesh.position(from),
                        to: mesh.position(to),
                    });
                }
                cycle[k] = e;
            }

            for k in 0..3 {
                let e = cycle[k];
                let he = &mut mesh.half_edges[e.0];
                he.next = Some(cycle[(k + 1) % 3]);
                he.previous = Some(cycle[(k + 2) % 3]);
                he.face = Some(face);

                let origin = &mut mesh.vertices[v[k].0];
                if origin.incident_edge.is_none() {
                    origin.incident_edge = Some(e);
                }
            }
            mesh.faces.push(Face {
                outer_edge: cycle[0],
            });
        }

        log::debug!(
            "dcel: {} vertices, {} half-edges, {} faces",
            mesh.vertices.len(),
            mesh.half_edges.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Build the mesh from a [`Triangulation`].
    pub fn from_triangulation(triangulation: &Triangulation) -> Result<Self, MeshError> {
        Self::from_triangles(&triangulation.triangle_positions())
    }

    fn vertex_for(&mut self, p: Position) -> VertexId {
        if let Some(&id) = self.lookup.get(&p) {
            return id;
        }
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            position: p,
            incident_edge: None,
        });
        self.lookup.insert(p, id);
        id
    }

    /// Half-edge `from -> to`, creating it together with its twin the first
    /// time either direction is requested.
    fn edge_between(
        &mut self,
        edges: &mut HashMap<(VertexId, VertexId), HalfEdgeId>,
        from: VertexId,
        to: VertexId,
    ) -> HalfEdgeId {
        if let Some(&e) = edges.get(&(from, to)) {
            return e;
        }
        let forward = HalfEdgeId(self.half_edges.len());
        let backward = HalfEdgeId(forward.0 + 1);
        self.half_edges.push(HalfEdge {
            origin: from,
            twin: backward,
            next: None,
            previous: None,
            face: None,
        });
        self.half_edges.push(HalfEdge {
            origin: to,
            twin: forward,
            next: None,
            previous: None,
            face: None,
        });
        edges.insert((from, to), forward);
        edges.insert((to, from), backward);
        forward
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    #[inline]
    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    #[inline]
    pub fn position(&self, id: VertexId) -> Position {
        self.vertices[id.0].position
    }

    /// Vertex at exactly `p`, if any.
    #[inline]
    pub fn vertex_id(&self, p: Position) -> Option<VertexId> {
        self.lookup.get(&p).copied()
    }

    /// The vertex a half-edge points to.
    #[inline]
    pub fn destination(&self, e: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[e.0].twin.0].origin
    }

    #[inline]
    pub fn is_boundary(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e.0].face.is_none()
    }

    /// Half-edges around a face, starting at its outer edge.
    pub fn face_cycle(&self, f: FaceId) -> FaceCycle<'_> {
        let start = self.faces[f.0].outer_edge;
        FaceCycle {
            mesh: self,
            start,
            current: Some(start),
        }
    }

    /// Corner vertices of a face in counter-clockwise order.
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        let mut out = [VertexId(0); 3];
        for (slot, e) in out.iter_mut().zip(self.face_cycle(f)) {
            *slot = self.half_edges[e.0].origin;
        }
        out
    }

    /// Vertices adjacent to `v`, found by rotating around it via `twin.next`.
    ///
    /// The walk stops when it returns to the starting edge or reaches a
    /// boundary half-edge, so a boundary vertex may not report every
    /// neighbour.
    pub fn neighbors(&self, v: VertexId) -> VertexFan<'_> {
        let start = self.vertices[v.0].incident_edge;
        VertexFan {
            mesh: self,
            start,
            current: start,
        }
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over the half-edges of one face.
pub struct FaceCycle<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl Iterator for FaceCycle<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let e = self.current?;
        self.current = self.mesh.half_edges[e.0]
            .next
            .filter(|&n| n != self.start);
        Some(e)
    }
}

/// Iterator over the neighbours of a vertex.
pub struct VertexFan<'a> {
    mesh: &'a HalfEdgeMesh,
    start: Option<HalfEdgeId>,
    current: Option<HalfEdgeId>,
}

impl Iterator for VertexFan<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        let e = self.current?;
        let twin = &self.mesh.half_edges[self.mesh.half_edges[e.0].twin.0];
        self.current = twin.next.filter(|&n| Some(n) != self.start);
        Some(twin.origin)
    }
}
