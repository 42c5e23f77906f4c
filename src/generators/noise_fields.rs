//! Gradient-noise height fields: Perlin and Simplex octave sums, a
//! fractional Brownian motion field and a ridged multifractal.

use super::{fill_rows, signed_to_byte};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti, Simplex};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fractal Perlin noise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct PerlinParams {
    #[validate(range(exclusive_min = 0.0))]
    pub scale: f64,
    #[validate(range(min = 1, max = 16))]
    pub octaves: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub persistence: f64,
    #[validate(range(min = 1.0))]
    pub lacunarity: f64,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            scale: 0.1,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Fractal Simplex noise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SimplexParams {
    #[validate(range(exclusive_min = 0.0))]
    pub scale: f64,
    #[validate(range(min = 1, max = 16))]
    pub octaves: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub persistence: f64,
    #[validate(range(min = 1.0))]
    pub lacunarity: f64,
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self {
            scale: 0.05,
            octaves: 6,
            persistence: 0.6,
            lacunarity: 2.2,
        }
    }
}

/// Fractional Brownian motion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct FractalParams {
    #[validate(range(exclusive_min = 0.0))]
    pub scale: f64,
    #[validate(range(min = 1, max = 16))]
    pub octaves: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub persistence: f64,
    #[validate(range(min = 1.0))]
    pub lacunarity: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            scale: 0.02,
            octaves: 8,
            persistence: 0.7,
            lacunarity: 2.5,
        }
    }
}

/// Ridged multifractal parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RidgedParams {
    #[validate(range(exclusive_min = 0.0))]
    pub frequency: f64,
    #[validate(range(min = 1, max = 16))]
    pub octaves: u32,
}

impl Default for RidgedParams {
    fn default() -> Self {
        Self {
            frequency: 0.02,
            octaves: 5,
        }
    }
}

/// Octave sum of `source` at pixel `(x, y)`, normalized back into `[-1, 1]`
fn octave_sum<N>(
    source: &N,
    x: f64,
    y: f64,
    scale: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64
where
    N: NoiseFn<f64, 2>,
{
    let mut noise_value = 0.0;
    let mut max_value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..octaves.max(1) {
        noise_value += source.get([x * scale * frequency, y * scale * frequency]) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    noise_value / f64::max(max_value, f64::EPSILON)
}

pub fn generate_perlin(width: u32, height: u32, seed: u32, params: &PerlinParams) -> Vec<u8> {
    let perlin = Perlin::new(seed);
    fill_rows(width, height, |x, y| {
        signed_to_byte(octave_sum(
            &perlin,
            x as f64,
            y as f64,
            params.scale,
            params.octaves,
            params.persistence,
            params.lacunarity,
        ))
    })
}

pub fn generate_simplex(width: u32, height: u32, seed: u32, params: &SimplexParams) -> Vec<u8> {
    let simplex = Simplex::new(seed);
    fill_rows(width, height, |x, y| {
        signed_to_byte(octave_sum(
            &simplex,
            x as f64,
            y as f64,
            params.scale,
            params.octaves,
            params.persistence,
            params.lacunarity,
        ))
    })
}

pub fn generate_fractal(width: u32, height: u32, seed: u32, params: &FractalParams) -> Vec<u8> {
    let fbm = Fbm::<Perlin>::new(seed)
        .set_octaves(params.octaves.max(1) as usize)
        .set_frequency(params.scale)
        .set_persistence(params.persistence)
        .set_lacunarity(params.lacunarity);

    fill_rows(width, height, |x, y| signed_to_byte(fbm.get([x as f64, y as f64])))
}

pub fn generate_ridged(width: u32, height: u32, seed: u32, params: &RidgedParams) -> Vec<u8> {
    let ridged = RidgedMulti::<Perlin>::new(seed)
        .set_octaves(params.octaves.max(1) as usize)
        .set_frequency(params.frequency);

    fill_rows(width, height, |x, y| {
        signed_to_byte(ridged.get([x as f64, y as f64]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(pixels: &[u8]) -> u8 {
        let min = pixels.iter().copied().min().unwrap_or(0);
        let max = pixels.iter().copied().max().unwrap_or(0);
        max - min
    }

    #[test]
    fn test_octave_sum_is_normalized() {
        // Persistence and lacunarity of 1 sample the same point every octave
        let perlin = Perlin::new(9);
        for i in 0..50 {
            let (x, y) = (i as f64 * 1.7, i as f64 * 0.3);
            let single = octave_sum(&perlin, x, y, 0.1, 1, 1.0, 1.0);
            let many = octave_sum(&perlin, x, y, 0.1, 6, 1.0, 1.0);
            assert!((single - many).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_octave_matches_source() {
        let perlin = Perlin::new(4);
        let direct = perlin.get([1.25, 3.5]);
        let summed = octave_sum(&perlin, 2.5, 7.0, 0.5, 1, 0.5, 2.0);
        assert_eq!(direct, summed);
    }

    #[test]
    fn test_noise_fields_vary() {
        assert!(spread(&generate_perlin(32, 32, 1, &PerlinParams::default())) > 10);
        assert!(spread(&generate_simplex(32, 32, 1, &SimplexParams::default())) > 10);
        assert!(spread(&generate_fractal(128, 128, 1, &FractalParams::default())) > 10);
        assert!(spread(&generate_ridged(128, 128, 1, &RidgedParams::default())) > 10);
    }

    #[test]
    fn test_simplex_depends_on_seed() {
        let params = SimplexParams::default();
        assert_ne!(
            generate_simplex(24, 24, 1, &params),
            generate_simplex(24, 24, 2, &params)
        );
    }
}
