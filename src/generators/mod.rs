//! Generator registry: every depth map strategy behind one enum.

pub mod cavity;
pub mod diamond_square;
pub mod noise_fields;
pub mod voronoi;

pub use cavity::{AdvancedOrganicParams, OrganicCavityParams};
pub use diamond_square::DiamondSquareParams;
pub use noise_fields::{FractalParams, PerlinParams, RidgedParams, SimplexParams};
pub use voronoi::{DistanceMetric, VoronoiParams};

use crate::config::MapGenConfig;
use crate::depth_map::{DepthMap, MAX_DIMENSION};
use crate::errors::{MapGenError, MapGenResult};
use crate::tunnel_lattice::{TunnelLatticeParams, generate_tunnel_lattice};
use rayon::prelude::*;
use validator::Validate;

/// Names accepted by [`get_generator_preset`], in listing order
pub const ALGORITHMS: &[&str] = &[
    "tunnel-lattice",
    "perlin",
    "simplex",
    "fractal",
    "ridged",
    "diamond-square",
    "voronoi",
    "organic-cavity",
    "advanced-organic",
];

/// Alternative names and the algorithm they resolve to
pub const ALIASES: &[(&str, &str)] = &[("cellular", "organic-cavity")];

/// Depth map generation strategies
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorKind {
    TunnelLattice(TunnelLatticeParams),
    Perlin(PerlinParams),
    Simplex(SimplexParams),
    Fractal(FractalParams),
    Ridged(RidgedParams),
    DiamondSquare(DiamondSquareParams),
    Voronoi(VoronoiParams),
    OrganicCavity(OrganicCavityParams),
    AdvancedOrganic(AdvancedOrganicParams),
}

impl GeneratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::TunnelLattice(_) => "tunnel-lattice",
            GeneratorKind::Perlin(_) => "perlin",
            GeneratorKind::Simplex(_) => "simplex",
            GeneratorKind::Fractal(_) => "fractal",
            GeneratorKind::Ridged(_) => "ridged",
            GeneratorKind::DiamondSquare(_) => "diamond-square",
            GeneratorKind::Voronoi(_) => "voronoi",
            GeneratorKind::OrganicCavity(_) => "organic-cavity",
            GeneratorKind::AdvancedOrganic(_) => "advanced-organic",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            GeneratorKind::TunnelLattice(_) => "0.3.0",
            _ => "1.0.0",
        }
    }

    pub fn validate(&self) -> MapGenResult<()> {
        let result = match self {
            GeneratorKind::TunnelLattice(params) => params.validate(),
            GeneratorKind::Perlin(params) => params.validate(),
            GeneratorKind::Simplex(params) => params.validate(),
            GeneratorKind::Fractal(params) => params.validate(),
            GeneratorKind::Ridged(params) => params.validate(),
            GeneratorKind::DiamondSquare(params) => params.validate(),
            GeneratorKind::Voronoi(params) => params.validate(),
            GeneratorKind::OrganicCavity(params) => params.validate(),
            GeneratorKind::AdvancedOrganic(params) => params.validate(),
        };
        result.map_err(|errors| MapGenError::from_validation(&errors))
    }

    /// Parameters rendered the way they appear in the config file
    pub fn parameters_toml(&self) -> MapGenResult<String> {
        let text = match self {
            GeneratorKind::TunnelLattice(params) => toml::to_string_pretty(params)?,
            GeneratorKind::Perlin(params) => toml::to_string_pretty(params)?,
            GeneratorKind::Simplex(params) => toml::to_string_pretty(params)?,
            GeneratorKind::Fractal(params) => toml::to_string_pretty(params)?,
            GeneratorKind::Ridged(params) => toml::to_string_pretty(params)?,
            GeneratorKind::DiamondSquare(params) => toml::to_string_pretty(params)?,
            GeneratorKind::Voronoi(params) => toml::to_string_pretty(params)?,
            GeneratorKind::OrganicCavity(params) => toml::to_string_pretty(params)?,
            GeneratorKind::AdvancedOrganic(params) => toml::to_string_pretty(params)?,
        };
        Ok(text)
    }
}

/// Main depth map generator struct
#[derive(Debug, Clone, PartialEq)]
pub struct MapGenerator {
    pub seed: u32,
    pub kind: GeneratorKind,
}

impl MapGenerator {
    /// Create a new depth map generator
    pub fn new(seed: u32, kind: GeneratorKind) -> Self {
        Self { seed, kind }
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn version(&self) -> &'static str {
        self.kind.version()
    }

    /// Generate a depth map using the configured algorithm
    pub fn generate(&self, width: u32, height: u32) -> MapGenResult<DepthMap> {
        if width <= 1 || height <= 1 {
            return Err(MapGenError::InvalidDimensions { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MapGenError::DimensionsTooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        self.kind.validate()?;

        let (w, h, seed) = (width, height, self.seed);
        let pixels = match &self.kind {
            GeneratorKind::TunnelLattice(params) => generate_tunnel_lattice(w, h, seed, params)?,
            GeneratorKind::Perlin(params) => noise_fields::generate_perlin(w, h, seed, params),
            GeneratorKind::Simplex(params) => noise_fields::generate_simplex(w, h, seed, params),
            GeneratorKind::Fractal(params) => noise_fields::generate_fractal(w, h, seed, params),
            GeneratorKind::Ridged(params) => noise_fields::generate_ridged(w, h, seed, params),
            GeneratorKind::DiamondSquare(params) => {
                diamond_square::generate_diamond_square(w, h, seed, params)
            }
            GeneratorKind::Voronoi(params) => voronoi::generate_voronoi(w, h, seed, params),
            GeneratorKind::OrganicCavity(params) => {
                cavity::generate_organic_cavity(w, h, seed, params)
            }
            GeneratorKind::AdvancedOrganic(params) => {
                cavity::generate_advanced_organic(w, h, seed, params)
            }
        };

        DepthMap::new(width, height, pixels)
    }
}

/// Look up a generator by name, taking its parameters from `config`.
///
/// Names are matched case-insensitively, `_` is accepted for `-` and
/// [`ALIASES`] are resolved. A missing seed is drawn at random.
pub fn get_generator_preset(
    name: &str,
    seed: Option<u32>,
    config: &MapGenConfig,
) -> MapGenResult<MapGenerator> {
    let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map_or(normalized.as_str(), |(_, target)| *target);

    let kind = match canonical {
        "tunnel-lattice" => GeneratorKind::TunnelLattice(config.tunnel_lattice.clone()),
        "perlin" => GeneratorKind::Perlin(config.perlin.clone()),
        "simplex" => GeneratorKind::Simplex(config.simplex.clone()),
        "fractal" => GeneratorKind::Fractal(config.fractal.clone()),
        "ridged" => GeneratorKind::Ridged(config.ridged.clone()),
        "diamond-square" => GeneratorKind::DiamondSquare(config.diamond_square.clone()),
        "voronoi" => GeneratorKind::Voronoi(config.voronoi.clone()),
        "organic-cavity" => GeneratorKind::OrganicCavity(config.organic_cavity.clone()),
        "advanced-organic" => GeneratorKind::AdvancedOrganic(config.advanced_organic.clone()),
        _ => {
            return Err(MapGenError::UnknownAlgorithm {
                name: name.to_string(),
            });
        }
    };

    let seed = seed.unwrap_or_else(rand::random);
    Ok(MapGenerator::new(seed, kind))
}

/// Evaluate `shade(x, y)` for every pixel, one rayon task per row
fn fill_rows<F>(width: u32, height: u32, shade: F) -> Vec<u8>
where
    F: Fn(u32, u32) -> u8 + Sync,
{
    let mut pixels = vec![0u8; width as usize * height as usize];
    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = shade(x as u32, y as u32);
            }
        });
    pixels
}

/// Map a noise sample in `[-1, 1]` onto a byte
fn signed_to_byte(value: f64) -> u8 {
    ((value + 1.0) * 127.5).clamp(0.0, 255.0) as u8
}
