use terranav_core::{Position, TerrainMesh};
use terranav_mesh::HalfEdgeMesh;
use thiserror::Error;

use crate::anisotropic::{AnisotropicGraph, AnisotropicParams};
use crate::grid::{GridGraph, GridParams};
use crate::mesh::MeshGraph;
use crate::neighbors::VertexGrid;
use crate::traits::TerrainPather;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GraphError {
    #[error("expected {width}x{height} vertices, got {actual}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
    #[error("no graph vertex at {0}")]
    InvalidVertexLookup(Position),
    #[error("neighbour radius must be at least 1")]
    InvalidRadius,
}

/// Grid-based graph flavour and its parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GraphVariant {
    Grid(GridParams),
    Anisotropic(AnisotropicParams),
}

impl Default for GraphVariant {
    fn default() -> Self {
        Self::Anisotropic(AnisotropicParams::default())
    }
}

/// The terrain graph a search runs on. One variant per session.
#[derive(Debug, Clone)]
pub enum TerrainGraph {
    Grid(GridGraph),
    Anisotropic(AnisotropicGraph),
    Mesh(MeshGraph),
}

impl TerrainGraph {
    /// Graph over the vertices of a generated terrain mesh.
    pub fn from_terrain(terrain: &TerrainMesh, variant: GraphVariant) -> Result<Self, GraphError> {
        build_terrain_graph(
            terrain.vertices.clone(),
            terrain.width,
            terrain.height,
            variant,
        )
    }

    /// Graph over the vertex adjacency of a nav mesh.
    pub fn from_mesh(mesh: HalfEdgeMesh) -> Self {
        Self::Mesh(MeshGraph::new(mesh))
    }

    /// Short lowercase variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid(_) => "grid",
            Self::Anisotropic(_) => "anisotropic",
            Self::Mesh(_) => "mesh",
        }
    }

    fn pather(&self) -> &dyn TerrainPather {
        match self {
            Self::Grid(g) => g,
            Self::Anisotropic(g) => g,
            Self::Mesh(g) => g,
        }
    }
}

impl TerrainPather for TerrainGraph {
    fn neighbors(&self, p: Position, buf: &mut Vec<Position>) -> Result<(), GraphError> {
        self.pather().neighbors(p, buf)
    }

    fn cost(&self, previous: Option<Position>, from: Position, to: Position) -> f32 {
        self.pather().cost(previous, from, to)
    }

    fn estimate(&self, from: Position, to: Position) -> f32 {
        self.pather().estimate(from, to)
    }
}

impl From<GridGraph> for TerrainGraph {
    fn from(g: GridGraph) -> Self {
        Self::Grid(g)
    }
}

impl From<AnisotropicGraph> for TerrainGraph {
    fn from(g: AnisotropicGraph) -> Self {
        Self::Anisotropic(g)
    }
}

impl From<MeshGraph> for TerrainGraph {
    fn from(g: MeshGraph) -> Self {
        Self::Mesh(g)
    }
}

/// Build a grid-based terrain graph over `width * height` row-major
/// vertices.
pub fn build_terrain_graph(
    vertices: Vec<Position>,
    width: usize,
    height: usize,
    variant: GraphVariant,
) -> Result<TerrainGraph, GraphError> {
    let grid = VertexGrid::new(vertices, width, height)?;
    let graph: TerrainGraph = match variant {
        GraphVariant::Grid(params) => GridGraph::new(grid, params).into(),
        GraphVariant::Anisotropic(params) => AnisotropicGraph::new(grid, params)?.into(),
    };
    log::debug!("terrain graph: {width}x{height} {}", graph.name());
    Ok(graph)
}
