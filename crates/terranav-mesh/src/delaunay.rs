//! Bowyer-Watson Delaunay triangulation in the ground plane.
//!
//! Points are triangulated on their `(x, z)` coordinates; `y` is carried
//! through unchanged. Output triangles are counter-clockwise when viewed with
//! `x` as the first axis and `z` as the second, and satisfy the empty
//! circumcircle property: no input point lies strictly inside any output
//! triangle's circumcircle.

use std::collections::{HashMap, HashSet};

use terranav_core::Position;

use crate::error::MeshError;

/// Result of [`triangulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// Input points with planar duplicates removed, in first-seen order.
    pub points: Vec<Position>,
    /// Counter-clockwise index triples into `points`.
    pub triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Triangles as coordinate triples.
    pub fn triangle_positions(&self) -> Vec<[Position; 3]> {
        self.triangles
            .iter()
            .map(|t| [self.points[t[0]], self.points[t[1]], self.points[t[2]]])
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct P2 {
    x: f64,
    y: f64,
}

impl From<Position> for P2 {
    fn from(p: Position) -> Self {
        Self {
            x: p.x as f64,
            y: p.z as f64,
        }
    }
}

/// Twice the signed area of `abc`; positive when counter-clockwise.
#[inline]
fn orient(a: P2, b: P2, c: P2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Positive when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `abc`.
#[inline]
fn in_circle(a: P2, b: P2, c: P2, p: P2) -> f64 {
    let (ax, ay) = (a.x - p.x, a.y - p.y);
    let (bx, by) = (b.x - p.x, b.y - p.y);
    let (cx, cy) = (c.x - p.x, c.y - p.y);

    let det_ab = ax * by - bx * ay;
    let det_bc = bx * cy - cx * by;
    let det_ca = cx * ay - ax * cy;

    (ax * ax + ay * ay) * det_bc + (bx * bx + by * by) * det_ca + (cx * cx + cy * cy) * det_ab
}

/// Signed area test exposed for callers checking orientation of positions.
#[inline]
pub fn orientation(a: Position, b: Position, c: Position) -> f64 {
    orient(a.into(), b.into(), c.into())
}

/// Whether `p` lies strictly inside the circumcircle of triangle `abc`
/// (any winding).
pub fn circumcircle_contains(a: Position, b: Position, c: Position, p: Position) -> bool {
    let (a, b, c, p) = (P2::from(a), P2::from(b), P2::from(c), P2::from(p));
    let det = in_circle(a, b, c, p);
    if orient(a, b, c) > 0.0 { det > 0.0 } else { det < 0.0 }
}

fn planar_key(p: Position) -> (u32, u32) {
    let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
    (bits(p.x), bits(p.z))
}

/// Triangulate `input` in the `(x, z)` plane.
///
/// Points sharing `(x, z)` with an earlier point are dropped. Fails when
/// fewer than three distinct points remain or all of them are collinear.
pub fn triangulate(input: &[Position]) -> Result<Triangulation, MeshError> {
    let mut seen = HashSet::with_capacity(input.len());
    let points: Vec<Position> = input
        .iter()
        .copied()
        .filter(|p| seen.insert(planar_key(*p)))
        .collect();
    if points.len() < input.len() {
        log::warn!(
            "delaunay: dropped {} points sharing planar coordinates",
            input.len() - points.len()
        );
    }

    let n = points.len();
    if n < 3 {
        return Err(MeshError::TooFewPoints { points: n });
    }

    let mut coords: Vec<P2> = points.iter().map(|&p| P2::from(p)).collect();
    let first = coords[0];
    let second = coords[1];
    if coords[2..].iter().all(|&c| orient(first, second, c) == 0.0) {
        return Err(MeshError::Collinear { points: n });
    }

    // Super triangle enclosing every point, counter-clockwise.
    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in &coords {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) * 0.5;
    let mid_y = (min_y + max_y) * 0.5;
    coords.push(P2 {
        x: mid_x - 20.0 * span,
        y: mid_y - span,
    });
    coords.push(P2 {
        x: mid_x + 20.0 * span,
        y: mid_y - span,
    });
    coords.push(P2 {
        x: mid_x,
        y: mid_y + 20.0 * span,
    });

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];
    let mut edge_uses: HashMap<(usize, usize), u32> = HashMap::new();
    let mut cavity: Vec<[usize; 3]> = Vec::new();

    for i in 0..n {
        let p = coords[i];

        cavity.clear();
        triangles.retain(|t| {
            let bad = in_circle(coords[t[0]], coords[t[1]], coords[t[2]], p) > 0.0;
            if bad {
                cavity.push(*t);
            }
            !bad
        });

        // Cavity boundary: edges used by exactly one removed triangle.
        edge_uses.clear();
        for t in &cavity {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *edge_uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        for t in &cavity {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                if edge_uses.get(&(a.min(b), a.max(b))) == Some(&1) {
                    triangles.push([a, b, i]);
                }
            }
        }
    }

    triangles.retain(|t| t.iter().all(|&v| v < n));
    if triangles.is_empty() {
        return Err(MeshError::Collinear { points: n });
    }

    log::debug!(
        "delaunay: {} points -> {} triangles",
        n,
        triangles.len()
    );
    Ok(Triangulation { points, triangles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn p(x: f32, z: f32) -> Position {
        Position::new(x, 0.0, z)
    }

    #[test]
    fn single_triangle() {
        let tri = triangulate(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)]).unwrap();
        assert_eq!(tri.triangles.len(), 1);
        let [a, b, c] = tri.triangle_positions()[0];
        assert!(orientation(a, b, c) > 0.0);
    }

    #[test]
    fn square_splits_into_two() {
        let tri = triangulate(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap();
        assert_eq!(tri.triangles.len(), 2);
    }

    #[test]
    fn elevation_is_carried_through() {
        let pts = [
            Position::new(0.0, 5.0, 0.0),
            Position::new(2.0, 6.0, 0.0),
            Position::new(1.0, 7.0, 2.0),
        ];
        let tri = triangulate(&pts).unwrap();
        let mut ys: Vec<f32> = tri.triangle_positions()[0].iter().map(|q| q.y).collect();
        ys.sort_by(f32::total_cmp);
        assert_eq!(ys, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn too_few_points() {
        assert_eq!(
            triangulate(&[p(0.0, 0.0), p(1.0, 1.0)]),
            Err(MeshError::TooFewPoints { points: 2 })
        );
        // Planar duplicates collapse.
        let err = triangulate(&[p(0.0, 0.0), p(1.0, 1.0), Position::new(1.0, 9.0, 1.0)]).unwrap_err();
        assert!(err.is_degenerate_geometry());
    }

    #[test]
    fn collinear_points_rejected() {
        let pts: Vec<_> = (0..5).map(|i| p(i as f32, i as f32 * 2.0)).collect();
        assert_eq!(triangulate(&pts), Err(MeshError::Collinear { points: 5 }));
    }

    #[test]
    fn random_points_satisfy_empty_circumcircle() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<Position> = (0..60)
            .map(|_| {
                p(
                    rng.random_range(0.0f32..50.0),
                    rng.random_range(0.0f32..50.0),
                )
            })
            .collect();
        let tri = triangulate(&pts).unwrap();
        assert!(tri.triangles.len() >= tri.points.len() - 2 - 20);

        for t in &tri.triangles {
            let (a, b, c) = (tri.points[t[0]], tri.points[t[1]], tri.points[t[2]]);
            assert!(orientation(a, b, c) > 0.0);
            for (i, &q) in tri.points.iter().enumerate() {
                if t.contains(&i) {
                    continue;
                }
                let det = in_circle(a.into(), b.into(), c.into(), q.into());
                assert!(det <= 1e-6, "point {q} inside circumcircle of {a} {b} {c}");
            }
        }
    }

    #[test]
    fn circumcircle_test_handles_winding() {
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        assert!(circumcircle_contains(a, b, c, p(1.0, 1.0)));
        assert!(circumcircle_contains(a, c, b, p(1.0, 1.0)));
        assert!(!circumcircle_contains(a, b, c, p(5.0, 5.0)));
    }
}
