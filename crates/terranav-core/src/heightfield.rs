//! The [`HeightField`] type, a row-major grid of elevation samples.
//!
//! Column `x` runs along the first axis and row `z` along the second, so the
//! sample for `(x, z)` lives at `z * width + x`.

use thiserror::Error;

use crate::geom::Position;

/// Errors raised when constructing a [`HeightField`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeightFieldError {
    /// The sample buffer does not hold exactly `width * height` values.
    #[error("height field expects {expected} samples ({width}x{height}), got {actual}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    /// One of the dimensions is zero.
    #[error("height field must have at least one sample, got {width}x{height}")]
    Empty { width: usize, height: usize },
}

/// A 2D scalar field of elevation samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHeightField"))]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

/// Unchecked wire form, validated through [`HeightField::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawHeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHeightField> for HeightField {
    type Error = HeightFieldError;

    fn try_from(raw: RawHeightField) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.values)
    }
}

impl HeightField {
    /// Wrap an existing row-major sample buffer.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self, HeightFieldError> {
        if width == 0 || height == 0 {
            return Err(HeightFieldError::Empty { width, height });
        }
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if values.len() != expected {
            return Err(HeightFieldError::SizeMismatch {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Build a field by evaluating `f(x, z)` for every sample.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, HeightFieldError> {
        let mut values = Vec::with_capacity(width * height);
        for z in 0..height {
            for x in 0..width {
                values.push(f(x, z));
            }
        }
        Self::new(width, height, values)
    }

    /// A field where every sample has the same value.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, HeightFieldError> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw row-major samples.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    fn index(&self, x: usize, z: usize) -> Option<usize> {
        if x < self.width && z < self.height {
            Some(z * self.width + x)
        } else {
            None
        }
    }

    /// Sample at `(x, z)`, or `None` outside the field.
    #[inline]
    pub fn at(&self, x: usize, z: usize) -> Option<f32> {
        self.index(x, z).map(|i| self.values[i])
    }

    /// Overwrite the sample at `(x, z)`. Returns `false` outside the field.
    pub fn set(&mut self, x: usize, z: usize, value: f32) -> bool {
        match self.index(x, z) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Bilinearly interpolated sample at fractional coordinates, clamped to
    /// the field's extent.
    pub fn sample(&self, fx: f32, fz: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_z = (self.height - 1) as f32;
        let fx = fx.clamp(0.0, max_x);
        let fz = fz.clamp(0.0, max_z);

        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let v00 = self.values[z0 * self.width + x0];
        let v10 = self.values[z0 * self.width + x1];
        let v01 = self.values[z1 * self.width + x0];
        let v11 = self.values[z1 * self.width + x1];

        let top = v00 + (v10 - v00) * tx;
        let bottom = v01 + (v11 - v01) * tx;
        top + (bottom - top) * tz
    }

    /// Row-major vertex grid with `y = sample * height_multiplier`.
    pub fn vertices(&self, height_multiplier: f32) -> Vec<Position> {
        let mut out = Vec::with_capacity(self.values.len());
        for z in 0..self.height {
            for x in 0..self.width {
                let h = self.values[z * self.width + x] * height_multiplier;
                out.push(Position::new(x as f32, h, z as f32));
            }
        }
        out
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn field_round_trip() {
        let field = HeightField::from_fn(3, 2, |x, z| (x + 10 * z) as f32).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        let back: HeightField = serde_json::from_str(&json).unwrap();
        assert_eq!(field, back);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = serde_json::from_str::<HeightField>(r#"{"width":3,"height":3,"values":[]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("expects 9 samples"));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(serde_json::from_str::<HeightField>(r#"{"width":0,"height":4,"values":[]}"#).is_err());
    }
}
