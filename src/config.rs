pub mod range_types;

use crate::errors::{MapGenError, MapGenResult};
use crate::generators::{
    AdvancedOrganicParams, DiamondSquareParams, FractalParams, OrganicCavityParams, PerlinParams,
    RidgedParams, SimplexParams, VoronoiParams,
};
use crate::tunnel_lattice::TunnelLatticeParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-algorithm parameter tables, as stored in `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapGenConfig {
    pub tunnel_lattice: TunnelLatticeParams,
    pub perlin: PerlinParams,
    pub simplex: SimplexParams,
    pub fractal: FractalParams,
    pub ridged: RidgedParams,
    pub diamond_square: DiamondSquareParams,
    pub voronoi: VoronoiParams,
    pub organic_cavity: OrganicCavityParams,
    pub advanced_organic: AdvancedOrganicParams,
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("depthgen");
        path.push("config.toml");
        path
    })
}

/// Load the default config file, falling back to defaults when it is missing
/// or unreadable
pub fn load_config() -> MapGenConfig {
    let Some(config_path) = get_config_path() else {
        return MapGenConfig::default();
    };
    if !config_path.exists() {
        return MapGenConfig::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
            MapGenConfig::default()
        }
    }
}

/// Load an explicitly named config file
pub fn load_config_from<P: AsRef<Path>>(path: P) -> MapGenResult<MapGenConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapGenError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let config = toml::from_str::<MapGenConfig>(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write `config` to the default location, returning the path written
pub fn save_config(config: &MapGenConfig) -> MapGenResult<PathBuf> {
    let config_path = get_config_path().ok_or(MapGenError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)?;
    Ok(config_path)
}

pub fn save_config_to<P: AsRef<Path>>(config: &MapGenConfig, path: P) -> MapGenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
