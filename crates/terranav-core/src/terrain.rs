//! Grid terrain mesh generation.
//!
//! Turns a [`HeightField`] into the vertex, triangle-index and UV buffers a
//! renderer or a grid-based terrain graph consumes.

use crate::geom::Position;
use crate::heightfield::HeightField;

/// Buffers describing a regular triangulated terrain grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub vertices: Vec<Position>,
    /// Three indices per triangle, two triangles per grid quad.
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl TerrainMesh {
    /// Generate the mesh for `field`, scaling samples by `height_multiplier`.
    ///
    /// Each quad is split along its `(x, z)` to `(x+1, z+1)` diagonal and both
    /// triangles share the same winding.
    pub fn from_height_field(field: &HeightField, height_multiplier: f32) -> Self {
        let width = field.width();
        let height = field.height();
        let vertices = field.vertices(height_multiplier);

        let quads = width.saturating_sub(1) * height.saturating_sub(1);
        let mut triangles = Vec::with_capacity(quads * 6);
        let mut uvs = Vec::with_capacity(width * height);

        for z in 0..height {
            for x in 0..width {
                let i = (z * width + x) as u32;
                let w = width as u32;
                // No triangles start on the last row or column.
                if x + 1 < width && z + 1 < height {
                    triangles.extend_from_slice(&[i, i + w, i + w + 1]);
                    triangles.extend_from_slice(&[i, i + w + 1, i + 1]);
                }
                uvs.push([x as f32 / width as f32, z as f32 / height as f32]);
            }
        }

        Self {
            width,
            height,
            vertices,
            triangles,
            uvs,
        }
    }

    /// Vertex at grid coordinates `(x, z)`.
    #[inline]
    pub fn vertex(&self, x: usize, z: usize) -> Option<Position> {
        if x < self.width && z < self.height {
            Some(self.vertices[z * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}
