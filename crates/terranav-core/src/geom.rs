//! Geometry primitives: [`Position`].
//!
//! A `Position` is the identity key used throughout terranav: graph nodes,
//! search nodes, contour points and mesh vertices are all looked up by their
//! coordinates. Equality is exact on all three components, so two positions
//! computed independently (for example a triangulation output and a grid
//! sample) only match if they are bit-for-bit the same value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use glam::Vec3;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in terrain-local space.
///
/// `x` is the grid column, `y` the elevation and `z` the grid row.
///
/// Components must be finite. `0.0` and `-0.0` compare and hash equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new position.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in 3D.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }

    /// Squared Euclidean distance in 3D.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        self.to_vec3().distance_squared(other.to_vec3())
    }

    /// Distance in the ground plane, ignoring elevation.
    #[inline]
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Absolute elevation difference.
    #[inline]
    pub fn rise(self, other: Self) -> f32 {
        (self.y - other.y).abs()
    }

    /// Integer grid coordinates `(column, row)` nearest to this position.
    #[inline]
    pub fn grid_coords(self) -> (i32, i32) {
        (self.x.round() as i32, self.z.round() as i32)
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Linear interpolation towards `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self.to_vec3().lerp(other.to_vec3(), t).into()
    }
}

/// Bit pattern used for hashing; folds `-0.0` onto `0.0` so `Hash` agrees
/// with `==`.
#[inline]
fn canonical_bits(v: f32) -> u32 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

// --- trait impls for Position ---

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
        canonical_bits(self.z).hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<Vec3> for Position {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position> for Vec3 {
    #[inline]
    fn from(p: Position) -> Self {
        p.to_vec3()
    }
}

impl Add for Position {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Position {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Position> for f32 {
    type Output = Position;
    #[inline]
    fn mul(self, rhs: Position) -> Position {
        rhs * self
    }
}

impl Neg for Position {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn position_arithmetic() {
        let a = Position::new(1.0, 2.0, 3.0);
        let b = Position::new(4.0, 6.0, 3.0);
        assert_eq!(a + b, Position::new(5.0, 8.0, 6.0));
        assert_eq!(b - a, Position::new(3.0, 4.0, 0.0));
        assert_eq!(a * 2.0, Position::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, Position::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn distances() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 12.0, 4.0);
        assert_eq!(a.planar_distance(b), 5.0);
        assert_eq!(a.distance(b), 13.0);
        assert_eq!(a.distance_squared(b), 169.0);
        assert_eq!(a.rise(b), 12.0);
    }

    #[test]
    fn equality_is_exact() {
        let a = Position::new(0.3, 0.0, 0.0);
        let b = Position::new(f32::from_bits(0.3f32.to_bits() + 1), 0.0, 0.0);
        assert_ne!(a, b);
        assert_eq!(a, Position::new(0.3, 0.0, 0.0));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.contains(&b));
    }

    #[test]
    fn signed_zero_hashes_like_zero() {
        let mut set = HashSet::new();
        set.insert(Position::new(0.0, 1.0, 0.0));
        assert!(set.contains(&Position::new(-0.0, 1.0, -0.0)));
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Position::new(1.0, 2.0, 3.0), "a");
        map.insert(Position::new(1.0, 2.0, 4.0), "b");
        assert_eq!(map.get(&Position::new(1.0, 2.0, 3.0)), Some(&"a"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn grid_coords_round() {
        assert_eq!(Position::new(2.4, 9.0, 6.6).grid_coords(), (2, 7));
    }

    #[test]
    fn glam_round_trip() {
        let p = Position::new(1.5, -2.0, 8.0);
        let v: Vec3 = p.into();
        assert_eq!(Position::from(v), p);
        assert_eq!(p.lerp(Position::ZERO, 1.0), Position::ZERO);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn position_round_trip() {
        let p = Position::new(3.0, 0.25, 7.0);
        let json = serde_json::to_string(&p).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
