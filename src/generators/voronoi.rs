use super::fill_rows;
use crate::rng::SeedStream;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

impl DistanceMetric {
    pub fn distance(self, dx: f64, dy: f64) -> f64 {
        match self {
            DistanceMetric::Euclidean => dx.hypot(dy),
            DistanceMetric::Manhattan => dx.abs() + dy.abs(),
            DistanceMetric::Chebyshev => dx.abs().max(dy.abs()),
        }
    }
}

/// Nearest-site cell parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct VoronoiParams {
    #[validate(range(min = 1, max = 10000))]
    pub points: u32,
    pub distance_metric: DistanceMetric,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            points: 50,
            distance_metric: DistanceMetric::Euclidean,
        }
    }
}

/// `count` integer sites drawn uniformly over the image, x then y per site
pub fn random_sites(count: u32, width: u32, height: u32, stream: &mut SeedStream) -> Vec<(f64, f64)> {
    (0..count)
        .map(|_| {
            let x = stream.next_below(width) as f64;
            let y = stream.next_below(height) as f64;
            (x, y)
        })
        .collect()
}

/// Shade every pixel by the index of its nearest site, `index · 255 / N`
pub fn generate_voronoi(width: u32, height: u32, seed: u32, params: &VoronoiParams) -> Vec<u8> {
    let mut stream = SeedStream::new(seed);
    let sites = random_sites(params.points.max(1), width, height, &mut stream);
    tracing::debug!(sites = sites.len(), metric = ?params.distance_metric, "placed voronoi sites");

    let metric = params.distance_metric;
    fill_rows(width, height, |x, y| {
        let mut closest = 0usize;
        let mut min_distance = f64::MAX;
        for (i, &(sx, sy)) in sites.iter().enumerate() {
            let d = metric.distance(x as f64 - sx, y as f64 - sy);
            if d < min_distance {
                min_distance = d;
                closest = i;
            }
        }
        (closest * 255 / sites.len()) as u8
    })
}
