//! Navigation-mesh derivation for height-field terrain.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`contour`]: CONREC iso-line segments over a resampled height field,
//!    stitched into thinned polylines by an x-ordered proximity sweep.
//! 2. [`delaunay`]: Bowyer-Watson triangulation of the contour points in
//!    the `(x, z)` plane; elevation rides along untouched.
//! 3. [`dcel`]: a half-edge mesh built from the triangle set, giving
//!    vertex → incident edge → neighbour traversal.
//! 4. [`navmesh`]: vertex and index buffers plus the half-edge mesh, ready
//!    for rendering or for a mesh-adjacency terrain graph.

pub mod contour;
pub mod dcel;
pub mod delaunay;
mod error;
pub mod navmesh;

pub use contour::{
    Contour, ContourConfig, ContourError, ContourExtractor, ContourPoint, Segment, conrec,
    extract_contours,
};
pub use dcel::{Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, Vertex, VertexId};
pub use delaunay::{Triangulation, triangulate};
pub use error::MeshError;
pub use navmesh::{NavMesh, build_nav_mesh};
