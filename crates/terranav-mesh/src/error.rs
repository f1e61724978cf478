use terranav_core::Position;
use thiserror::Error;

/// Errors raised while triangulating points or assembling a half-edge mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Fewer than three distinct planar points.
    #[error("triangulation needs at least 3 distinct points, got {points}")]
    TooFewPoints { points: usize },
    /// Every input point lies on one line.
    #[error("all {points} points are collinear")]
    Collinear { points: usize },
    /// A triangle with zero area in the ground plane.
    #[error("degenerate triangle {a} {b} {c}")]
    DegenerateTriangle { a: Position, b: Position, c: Position },
    /// A directed edge is claimed by more than one face.
    #[error("edge {from} -> {to} belongs to more than one face")]
    NonManifoldEdge { from: Position, to: Position },
}

impl MeshError {
    /// Whether the error stems from unusable input geometry.
    pub fn is_degenerate_geometry(&self) -> bool {
        matches!(
            self,
            Self::TooFewPoints { .. } | Self::Collinear { .. } | Self::DegenerateTriangle { .. }
        )
    }
}
