use glam::Vec3;
use terranav_core::Position;

/// Straight-line 3D distance. The default A* heuristic.
#[inline]
pub fn euclidean(a: Position, b: Position) -> f32 {
    a.distance(b)
}

/// Steepness of the move `a -> b` in degrees, in `[0, 90]`.
#[inline]
pub fn slope_degrees(a: Position, b: Position) -> f32 {
    a.rise(b).atan2(a.planar_distance(b)).to_degrees()
}

/// Angle in degrees between the incoming direction `previous -> current`
/// and the outgoing direction `current -> next`.
///
/// A zero-length direction has no heading and yields 0.
pub fn turn_degrees(previous: Position, current: Position, next: Position) -> f32 {
    let incoming = Vec3::from(current - previous);
    let outgoing = Vec3::from(next - current);
    let denom = (incoming.length_squared() * outgoing.length_squared()).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (incoming.dot(outgoing) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Squared planar run plus a cubic steepness term, `run² + (10·rise/run)³`.
///
/// A vertical move (zero run, non-zero rise) is impassable.
pub fn slope_cost(a: Position, b: Position) -> f32 {
    let rise = a.rise(b);
    let run = a.planar_distance(b);
    if run == 0.0 {
        return if rise == 0.0 { 0.0 } else { f32::INFINITY };
    }
    let scaled = 10.0 * rise / run;
    run * run + scaled * scaled * scaled
}

/// Greatest common divisor of two non-negative integers, `gcd(0, n) = n`.
pub(crate) fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
