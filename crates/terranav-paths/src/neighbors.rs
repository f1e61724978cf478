use terranav_core::Position;

use crate::distance::gcd;
use crate::graph::GraphError;

/// Von Neumann neighbourhood: left, right, back, front.
pub(crate) const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Moore neighbourhood: the cardinal moves followed by the diagonals.
pub(crate) const MOORE: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Offsets `(dx, dz)` with both components in `-radius..=radius` whose
/// absolute values are coprime, i.e. every direction reachable within the
/// radius exactly once at its shortest step.
pub fn coprime_offsets(radius: u32) -> Result<Vec<(i32, i32)>, GraphError> {
    let r = match i32::try_from(radius) {
        Ok(r) if r > 0 => r,
        _ => return Err(GraphError::InvalidRadius),
    };
    let mut offsets = Vec::new();
    for dz in -r..=r {
        for dx in -r..=r {
            if gcd(dx.unsigned_abs(), dz.unsigned_abs()) == 1 {
                offsets.push((dx, dz));
            }
        }
    }
    Ok(offsets)
}

/// Row-major grid of terrain vertices addressed by integer `(x, z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    width: usize,
    height: usize,
    vertices: Vec<Position>,
}

impl VertexGrid {
    /// Wrap `vertices`, which must hold exactly `width * height` entries.
    pub fn new(vertices: Vec<Position>, width: usize, height: usize) -> Result<Self, GraphError> {
        if width.checked_mul(height) != Some(vertices.len()) {
            return Err(GraphError::DimensionMismatch {
                width,
                height,
                actual: vertices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            vertices,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    /// Vertex at integer grid coordinates, `None` outside the grid.
    #[inline]
    pub fn at(&self, x: i32, z: i32) -> Option<Position> {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.height {
            return None;
        }
        Some(self.vertices[z as usize * self.width + x as usize])
    }

    /// Grid coordinates of `p`, rounded to the nearest cell.
    pub fn locate(&self, p: Position) -> Result<(i32, i32), GraphError> {
        let (x, z) = p.grid_coords();
        match self.at(x, z) {
            Some(_) => Ok((x, z)),
            None => Err(GraphError::InvalidVertexLookup(p)),
        }
    }

    /// Push the in-grid vertices at `p + offset` for each offset.
    pub fn neighbors(
        &self,
        p: Position,
        offsets: &[(i32, i32)],
        buf: &mut Vec<Position>,
    ) -> Result<(), GraphError> {
        let (x, z) = self.locate(p)?;
        buf.extend(offsets.iter().filter_map(|&(dx, dz)| self.at(x + dx, z + dz)));
        Ok(())
    }
}
