//! Contour extraction: CONREC iso-line segments and proximity stitching.
//!
//! [`conrec`] walks every rectangular cell of a scalar field, splits it into
//! four triangles around the interpolated cell centre and emits one
//! [`Segment`] per triangle crossed by an iso level. [`ContourExtractor`]
//! resamples a [`HeightField`], reduces each segment to its midpoint and
//! stitches those midpoints into thinned polylines with a single sweep in
//! increasing `x`.
//!
//! The sweep attaches a point to the *first* open contour whose head is
//! close enough. Contours that should join later are never merged and
//! forking contours are not detected. Cost grows with
//! `points × open contours`.

use std::collections::HashSet;

use terranav_core::{HeightField, Position};
use thiserror::Error;

/// A point attaches to a contour whose head is closer than this.
pub const ATTACH_DISTANCE: f32 = 1.0;
/// An attached point becomes a polyline vertex once it is farther than this
/// from the contour's anchor.
pub const ANCHOR_SPACING: f32 = 2.0;

/// Errors raised while contouring a field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContourError {
    /// Axis coordinate slices do not match the field dimensions.
    #[error("axis lengths {xs}x{ys} do not match field {width}x{height}")]
    AxisMismatch {
        width: usize,
        height: usize,
        xs: usize,
        ys: usize,
    },
    /// Contouring needs at least a 2x2 lattice.
    #[error("contouring needs at least 2x2 samples, got {samples_x}x{samples_y}")]
    TooFewSamples { samples_x: usize, samples_y: usize },
}

// ---------------------------------------------------------------------------
// CONREC
// ---------------------------------------------------------------------------

/// One iso-line crossing within a single triangle of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub level: f32,
}

impl Segment {
    #[inline]
    pub fn midpoint(&self) -> (f32, f32) {
        ((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }
}

// Indexed by the sign (+1) of the three triangle vertices' heights above the
// level. 0 = no crossing; 1..=3 = the segment is a triangle edge; 4..=6 = a
// vertex to the opposite side; 7..=9 = side to side.
const CASES: [[[u8; 3]; 3]; 3] = [
    [[0, 0, 8], [0, 2, 5], [7, 6, 9]],
    [[0, 3, 4], [1, 3, 1], [4, 3, 0]],
    [[9, 6, 7], [5, 2, 0], [8, 0, 0]],
];

// Corner offsets for corners 1..=4, counter-clockwise from (i, j).
const IM: [usize; 4] = [0, 1, 1, 0];
const JM: [usize; 4] = [0, 0, 1, 1];

#[inline]
fn sign(v: f32) -> usize {
    if v > 0.0 {
        2
    } else if v < 0.0 {
        0
    } else {
        1
    }
}

/// Run CONREC over `field`, emitting every iso-line segment.
///
/// `xs[i]` and `ys[j]` give the coordinates of column `i` and row `j`; the
/// segments are reported in that coordinate space.
pub fn conrec(
    field: &HeightField,
    xs: &[f32],
    ys: &[f32],
    levels: &[f32],
    mut emit: impl FnMut(Segment),
) -> Result<(), ContourError> {
    if xs.len() != field.width() || ys.len() != field.height() {
        return Err(ContourError::AxisMismatch {
            width: field.width(),
            height: field.height(),
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if levels.is_empty() {
        return Ok(());
    }

    let (lo, hi) = levels
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &l| {
            (lo.min(l), hi.max(l))
        });
    let values = field.values();
    let width = field.width();
    let d = |i: usize, j: usize| values[j * width + i];

    let mut h = [0.0f32; 5];
    let mut xh = [0.0f32; 5];
    let mut yh = [0.0f32; 5];
    let mut sh = [0usize; 5];

    for j in 0..ys.len().saturating_sub(1) {
        for i in 0..xs.len().saturating_sub(1) {
            let corners = [d(i, j), d(i + 1, j), d(i + 1, j + 1), d(i, j + 1)];
            let dmin = corners.iter().copied().fold(f32::INFINITY, f32::min);
            let dmax = corners.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if dmax < lo || dmin > hi {
                continue;
            }

            for &level in levels {
                if level < dmin || level > dmax {
                    continue;
                }

                for m in 1..=4 {
                    h[m] = corners[m - 1] - level;
                    xh[m] = xs[i + IM[m - 1]];
                    yh[m] = ys[j + JM[m - 1]];
                }
                h[0] = 0.25 * (h[1] + h[2] + h[3] + h[4]);
                xh[0] = 0.5 * (xs[i] + xs[i + 1]);
                yh[0] = 0.5 * (ys[j] + ys[j + 1]);
                for m in 0..5 {
                    sh[m] = sign(h[m]);
                }

                let vertex = |a: usize| (xh[a], yh[a]);
                let sect = |a: usize, b: usize| {
                    let dh = h[b] - h[a];
                    (
                        (h[b] * xh[a] - h[a] * xh[b]) / dh,
                        (h[b] * yh[a] - h[a] * yh[b]) / dh,
                    )
                };

                for m in 1..=4 {
                    let m1 = m;
                    let m2 = 0;
                    let m3 = if m != 4 { m + 1 } else { 1 };

                    let ((x1, y1), (x2, y2)) = match CASES[sh[m1]][sh[m2]][sh[m3]] {
                        1 => (vertex(m1), vertex(m2)),
                        2 => (vertex(m2), vertex(m3)),
                        3 => (vertex(m3), vertex(m1)),
                        4 => (vertex(m1), sect(m2, m3)),
                        5 => (vertex(m2), sect(m3, m1)),
                        6 => (vertex(m3), sect(m1, m2)),
                        7 => (sect(m1, m2), sect(m2, m3)),
                        8 => (sect(m2, m3), sect(m3, m1)),
                        9 => (sect(m3, m1), sect(m1, m2)),
                        _ => continue,
                    };
                    emit(Segment {
                        x1,
                        y1,
                        x2,
                        y2,
                        level,
                    });
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contours
// ---------------------------------------------------------------------------

/// Settings for [`ContourExtractor`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourConfig {
    /// Lattice columns the field is resampled onto.
    pub samples_x: usize,
    /// Lattice rows the field is resampled onto.
    pub samples_y: usize,
    /// Number of evenly spaced iso levels.
    pub iso_count: usize,
    /// Scale applied to a level to get a contour point's elevation.
    pub height_multiplier: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            samples_x: 100,
            samples_y: 100,
            iso_count: 10,
            height_multiplier: 1.0,
        }
    }
}

/// A segment midpoint tagged with the level it was traced at.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourPoint {
    pub position: Position,
    pub level: f32,
}

/// A traced iso-line, thinned to points roughly [`ANCHOR_SPACING`] apart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    /// First point seen.
    pub start: Position,
    /// Last point kept in `points`.
    pub anchor: Position,
    /// Last raw point attached.
    pub head: Position,
    pub points: Vec<Position>,
    /// Level of the point that opened the contour.
    pub level: f32,
}

impl Contour {
    fn open(p: ContourPoint) -> Self {
        Self {
            start: p.position,
            anchor: p.position,
            head: p.position,
            points: vec![p.position],
            level: p.level,
        }
    }

    /// Try to attach `p`; returns `false` if the head is out of reach.
    fn attach(&mut self, p: Position) -> bool {
        if p.distance(self.head) >= ATTACH_DISTANCE {
            return false;
        }
        self.head = p;
        if p.distance(self.anchor) > ANCHOR_SPACING {
            self.points.push(p);
            self.anchor = p;
        }
        true
    }
}

/// Stitch contour points into polylines.
///
/// Points are swept in increasing `x` (stable for equal `x`). Each point
/// extends the first contour whose head is within [`ATTACH_DISTANCE`], or
/// opens a new contour.
pub fn stitch(points: &[ContourPoint]) -> Vec<Contour> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));

    let mut contours: Vec<Contour> = Vec::new();
    for p in sorted {
        let attached = contours.iter_mut().any(|c| c.attach(p.position));
        if !attached {
            contours.push(Contour::open(p));
        }
    }
    contours
}

/// All polyline vertices of `contours`, contour by contour.
pub fn contour_vertices(contours: &[Contour]) -> Vec<Position> {
    contours
        .iter()
        .flat_map(|c| c.points.iter().copied())
        .collect()
}

/// Resamples height fields and traces their contours.
#[derive(Debug, Clone, Default)]
pub struct ContourExtractor {
    config: ContourConfig,
}

impl ContourExtractor {
    pub fn new(config: ContourConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    /// Evenly spaced levels strictly inside the field's value range.
    ///
    /// A flat field has no levels.
    pub fn iso_levels(&self, field: &HeightField) -> Vec<f32> {
        let (min, max) = field.min_max();
        let range = max - min;
        if range <= 0.0 || !range.is_finite() {
            return Vec::new();
        }
        let n = self.config.iso_count;
        (1..=n)
            .map(|k| min + range * k as f32 / (n + 1) as f32)
            .collect()
    }

    /// Resample `field` onto the configured lattice.
    ///
    /// Returns the lattice field plus the field-space coordinate of each
    /// lattice column and row.
    fn resample(&self, field: &HeightField) -> Result<(HeightField, Vec<f32>, Vec<f32>), ContourError> {
        let ContourConfig {
            samples_x,
            samples_y,
            ..
        } = self.config;
        if samples_x < 2 || samples_y < 2 || field.width() < 2 || field.height() < 2 {
            return Err(ContourError::TooFewSamples {
                samples_x: samples_x.min(field.width()),
                samples_y: samples_y.min(field.height()),
            });
        }

        let axis = |samples: usize, extent: usize| -> Vec<f32> {
            let span = (extent - 1) as f32;
            (0..samples)
                .map(|i| i as f32 * span / (samples - 1) as f32)
                .collect()
        };
        let xs = axis(samples_x, field.width());
        let ys = axis(samples_y, field.height());

        let lattice = HeightField::from_fn(samples_x, samples_y, |i, j| field.sample(xs[i], ys[j]))
            .map_err(|_| ContourError::TooFewSamples {
                samples_x,
                samples_y,
            })?;
        Ok((lattice, xs, ys))
    }

    /// Distinct segment midpoints, in emission order.
    pub fn points(&self, field: &HeightField) -> Result<Vec<ContourPoint>, ContourError> {
        let levels = self.iso_levels(field);
        let (lattice, xs, ys) = self.resample(field)?;

        let multiplier = self.config.height_multiplier;
        let mut seen = HashSet::new();
        let mut points = Vec::new();
        let mut segments = 0usize;
        conrec(&lattice, &xs, &ys, &levels, |seg| {
            segments += 1;
            let (mx, mz) = seg.midpoint();
            let position = Position::new(mx, seg.level * multiplier, mz);
            if seen.insert(position) {
                points.push(ContourPoint {
                    position,
                    level: seg.level,
                });
            }
        })?;

        log::debug!(
            "contour: {} levels, {} segments, {} distinct midpoints",
            levels.len(),
            segments,
            points.len()
        );
        Ok(points)
    }

    /// Trace and stitch the contours of `field`.
    pub fn extract(&self, field: &HeightField) -> Result<Vec<Contour>, ContourError> {
        let points = self.points(field)?;
        let contours = stitch(&points);
        log::debug!(
            "contour: stitched {} points into {} contours",
            points.len(),
            contours.len()
        );
        Ok(contours)
    }
}

/// Trace the contours of `field` with `config`.
pub fn extract_contours(
    field: &HeightField,
    config: &ContourConfig,
) -> Result<Vec<Contour>, ContourError> {
    ContourExtractor::new(config.clone()).extract(field)
}
