use std::error::Error;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use terranav_core::HeightField;

/// Demo settings, overridable from the command line.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub seed: u64,
    /// Terrain is `size x size` samples.
    pub size: usize,
    pub height_multiplier: f32,
    pub hills: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            size: 64,
            height_multiplier: 3.0,
            hills: 6,
        }
    }
}

impl DemoConfig {
    /// Read `[SEED] [SIZE]` from `args`, defaulting the rest.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, Box<dyn Error>> {
        let mut config = Self::default();
        if let Some(seed) = args.next() {
            config.seed = seed.parse()?;
        }
        if let Some(size) = args.next() {
            config.size = size.parse()?;
        }
        if config.size < 2 {
            return Err("terrain size must be at least 2".into());
        }
        Ok(config)
    }
}

/// Sum of random Gaussian hills, normalised to `[0, 1]`.
pub fn generate_height_field(config: &DemoConfig) -> Result<HeightField, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let size = config.size as f32;
    let hills: Vec<(f32, f32, f32, f32)> = (0..config.hills)
        .map(|_| {
            (
                rng.random_range(0.0..size),
                rng.random_range(0.0..size),
                rng.random_range(size / 8.0..size / 3.0),
                rng.random_range(0.3f32..1.0),
            )
        })
        .collect();

    let field = HeightField::from_fn(config.size, config.size, |x, z| {
        hills
            .iter()
            .map(|&(cx, cz, radius, amplitude)| {
                let dx = x as f32 - cx;
                let dz = z as f32 - cz;
                amplitude * (-(dx * dx + dz * dz) / (2.0 * radius * radius)).exp()
            })
            .sum()
    })?;

    let (min, max) = field.min_max();
    let span = max - min;
    if span <= 0.0 {
        return Ok(field);
    }
    let values = field.values().iter().map(|h| (h - min) / span).collect();
    Ok(HeightField::new(config.size, config.size, values)?)
}
