use terranav_core::Position;

use crate::astar::Path;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineConfig {
    /// Parameter step per sample, in `(0, 1]`. 0.2 gives five samples per
    /// segment.
    pub resolution: f32,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self { resolution: 0.2 }
    }
}

impl SplineConfig {
    fn steps(&self) -> usize {
        if self.resolution.is_nan() || self.resolution <= 0.0 {
            return 1;
        }
        (1.0 / self.resolution).round().clamp(1.0, 1024.0) as usize
    }
}

/// Point at `t` in `[0, 1]` on the uniform Catmull-Rom segment from `p1` to
/// `p2`.
pub fn catmull_rom(p0: Position, p1: Position, p2: Position, p3: Position, t: f32) -> Position {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Smooth `path` with the default resolution.
pub fn smooth_path(path: &[Position]) -> Vec<Position> {
    smooth_path_with(path, &SplineConfig::default())
}

/// Resample `path` along Catmull-Rom segments between its interior points.
///
/// Each 4-point window `p[i-1..=i+2]` contributes samples from `p[i]` up to
/// (not including) `p[i+1]`, so the first and last input points act only as
/// tangent controls. Paths shorter than four points are returned unchanged.
pub fn smooth_path_with(path: &[Position], config: &SplineConfig) -> Vec<Position> {
    if path.len() < 4 {
        return path.to_vec();
    }
    let steps = config.steps();
    let mut out = Vec::with_capacity((path.len() - 3) * steps);
    for w in path.windows(4) {
        for j in 0..steps {
            let t = j as f32 / steps as f32;
            out.push(catmull_rom(w[0], w[1], w[2], w[3], t));
        }
    }
    out
}

impl Path {
    /// The same route resampled along a Catmull-Rom spline. `cost` stays the
    /// searched cost of the route.
    pub fn smoothed(&self, config: &SplineConfig) -> Path {
        Path {
            positions: smooth_path_with(&self.positions, config),
            cost: self.cost,
        }
    }
}
