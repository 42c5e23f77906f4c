use super::constants::MIN_SHADE_RADIUS;
use super::sdf::DistanceField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Gray levels for the inside and outside bands of the distance field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeBands {
    pub inside_base: u8,
    pub inside_range: u8,
    pub outside_base: u8,
    pub outside_range: u8,
}

impl Default for ShadeBands {
    fn default() -> Self {
        Self {
            inside_base: 45,
            inside_range: 35,
            outside_base: 185,
            outside_range: 45,
        }
    }
}

impl ShadeBands {
    /// Map a signed distance to a depth byte.
    ///
    /// Inside (`d < 0`) rises from `inside_base` at the wall to
    /// `inside_base + inside_range` one `base_radius` deep; outside rises from
    /// `outside_base` to `outside_base + outside_range` one `base_radius` out.
    pub fn shade(&self, d: f64, base_radius: f64) -> u8 {
        let inv = 1.0 / base_radius.max(MIN_SHADE_RADIUS);
        let shade = if d < 0.0 {
            self.inside_base as f64 + self.inside_range as f64 * (-d * inv).clamp(0.0, 1.0)
        } else {
            self.outside_base as f64 + self.outside_range as f64 * (d * inv).clamp(0.0, 1.0)
        };
        shade.clamp(0.0, 255.0) as u8
    }

    /// Value every pixel far from all tunnels ends up with
    pub fn saturated_outside(&self) -> u8 {
        self.outside_base.saturating_add(self.outside_range)
    }
}

/// Shade a finished distance field into a row-major depth image
pub fn shade_field(field: &DistanceField, bands: &ShadeBands, base_radius: f64) -> Vec<u8> {
    field
        .values()
        .par_iter()
        .map(|&d| bands.shade(d as f64, base_radius))
        .collect()
}
