//! Toroidal tunnel-lattice generator.
//!
//! Pipeline: seeded node sampling → lattice graph → one curved polyline per
//! edge → capsule SDF union on the torus → band shading. Every stage owns its
//! output and hands it to the next; the only inputs are the dimensions, the
//! seed and [`TunnelLatticeParams`]. The result tiles seamlessly.

pub mod constants;
pub mod graph;
pub mod noise;
pub mod nodes;
pub mod path;
pub mod sdf;
pub mod shading;
pub mod torus;

use crate::config::range_types::{CurveSteps, Curviness, JitterAmount};
use crate::errors::{MapGenError, MapGenResult};
use crate::rng::SeedStream;
use self::noise::PeriodicNoise;
use graph::LatticeGraph;
use nodes::{LatticeNodes, sample_nodes};
use path::{CurveSettings, Polyline, curved_path};
use sdf::{DistanceField, SdfContext, TunnelProfile};
use serde::{Deserialize, Serialize};
use shading::{ShadeBands, shade_field};
use torus::TorusDomain;
use tracing::instrument;
use validator::Validate;

/// Tunnel-lattice parameters, keyed like the service's parameter dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TunnelLatticeParams {
    #[validate(range(min = 1, max = 4096))]
    pub node_count: u32,
    #[validate(range(exclusive_min = 0.0))]
    pub base_radius: f64,
    #[validate(range(min = 0.0))]
    pub radius_noise_amp: f64,
    pub extra_loops: u32,
    #[validate(range(min = 1, max = 16))]
    pub noise_octaves: u32,
    #[validate(range(exclusive_min = 0.0))]
    pub noise_scale: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub curviness: f64,
    #[validate(range(min = 1, max = 1024))]
    pub curve_steps: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub jitter_amount: f64,
    pub inside_base: u8,
    pub inside_range: u8,
    pub outside_base: u8,
    pub outside_range: u8,
}

impl Default for TunnelLatticeParams {
    fn default() -> Self {
        let bands = ShadeBands::default();
        Self {
            node_count: 24,
            base_radius: 14.0,
            radius_noise_amp: 0.18,
            extra_loops: 12,
            noise_octaves: 4,
            noise_scale: 1.2,
            curviness: 1.0,
            curve_steps: 20,
            jitter_amount: 0.35,
            inside_base: bands.inside_base,
            inside_range: bands.inside_range,
            outside_base: bands.outside_base,
            outside_range: bands.outside_range,
        }
    }
}

impl TunnelLatticeParams {
    pub fn bands(&self) -> ShadeBands {
        ShadeBands {
            inside_base: self.inside_base,
            inside_range: self.inside_range,
            outside_base: self.outside_base,
            outside_range: self.outside_range,
        }
    }

    /// Radius profile; a non-positive radius falls back to one pixel
    pub fn profile(&self) -> TunnelProfile {
        let base_radius = if self.base_radius > 0.0 {
            self.base_radius
        } else {
            tracing::warn!(base_radius = self.base_radius, "non-positive radius, using 1.0");
            1.0
        };
        TunnelProfile {
            base_radius,
            radius_noise_amp: self.radius_noise_amp.max(0.0),
            noise_octaves: self.noise_octaves.max(1),
            noise_scale: self.noise_scale,
        }
    }

    /// Curve settings after clamping to their documented ranges
    pub fn curve_settings(&self) -> CurveSettings {
        let settings = CurveSettings {
            steps: CurveSteps::new(self.curve_steps),
            curviness: Curviness::new(self.curviness),
        };
        if settings.steps.get() != self.curve_steps {
            tracing::warn!(requested = self.curve_steps, used = settings.steps.get(), "curve steps clamped");
        }
        if settings.curviness.get() != self.curviness {
            tracing::warn!(requested = self.curviness, used = settings.curviness.get(), "curviness clamped");
        }
        settings
    }

    pub fn jitter(&self) -> JitterAmount {
        let jitter = JitterAmount::new(self.jitter_amount);
        if jitter.get() != self.jitter_amount {
            tracing::warn!(requested = self.jitter_amount, used = jitter.get(), "jitter amount clamped");
        }
        jitter
    }
}

/// Everything decided before rasterization
#[derive(Debug, Clone)]
pub struct LatticePlan {
    pub domain: TorusDomain,
    pub nodes: LatticeNodes,
    pub graph: LatticeGraph,
    pub polylines: Vec<Polyline>,
}

/// Sample nodes, build the graph and synthesize every tunnel path
pub fn plan_tunnel_lattice(
    width: u32,
    height: u32,
    seed: u32,
    params: &TunnelLatticeParams,
) -> MapGenResult<LatticePlan> {
    if width <= 1 || height <= 1 {
        return Err(MapGenError::InvalidDimensions { width, height });
    }

    let domain = TorusDomain::new(width, height);
    let noise = PeriodicNoise::new(seed);
    let mut stream = SeedStream::new(seed);

    let nodes = sample_nodes(params.node_count, &domain, params.jitter(), &mut stream);
    if nodes.is_empty() {
        return Err(MapGenError::DegenerateNodeCount {
            requested: params.node_count,
            produced: 0,
        });
    }

    let graph = LatticeGraph::build(&nodes, &domain, params.extra_loops);

    let settings = params.curve_settings();
    let polylines: Vec<Polyline> = graph
        .edges
        .iter()
        .map(|edge| {
            curved_path(
                nodes.points[edge.a],
                nodes.points[edge.b],
                settings,
                &domain,
                &noise,
                &mut stream,
            )
        })
        .collect();

    Ok(LatticePlan {
        domain,
        nodes,
        graph,
        polylines,
    })
}

/// Generate a `width × height` single-channel, row-major depth map
#[instrument(skip(params), fields(nodes = params.node_count))]
pub fn generate_tunnel_lattice(
    width: u32,
    height: u32,
    seed: u32,
    params: &TunnelLatticeParams,
) -> MapGenResult<Vec<u8>> {
    let plan = plan_tunnel_lattice(width, height, seed, params)?;
    tracing::debug!(
        nodes = plan.nodes.len(),
        edges = plan.graph.edges.len(),
        "planned tunnel lattice"
    );

    let profile = params.profile();
    let ctx = SdfContext {
        domain: plan.domain,
        profile,
        noise: PeriodicNoise::new(seed),
    };

    let mut field = DistanceField::new(width as usize, height as usize);
    field.union_polylines(&plan.polylines, &ctx);

    Ok(shade_field(&field, &params.bands(), profile.base_radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use torus::Point;

    fn scenario_params() -> TunnelLatticeParams {
        TunnelLatticeParams {
            node_count: 16,
            base_radius: 8.0,
            radius_noise_amp: 0.0,
            extra_loops: 0,
            curviness: 0.0,
            curve_steps: 1,
            ..Default::default()
        }
    }

    /// Distance from a pixel to a segment, over all nine wrapped copies
    fn torus_segment_distance(domain: &TorusDomain, p: Point, a: Point, b: Point) -> f64 {
        let delta = domain.shortest_vector(a, b);
        let len2 = delta.x * delta.x + delta.y * delta.y;
        let mut best = f64::MAX;
        for oy in [-1.0, 0.0, 1.0] {
            for ox in [-1.0, 0.0, 1.0] {
                let start = Point::new(a.x + ox * domain.width, a.y + oy * domain.height);
                let t = if len2 > 0.0 {
                    (((p.x - start.x) * delta.x + (p.y - start.y) * delta.y) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let c = start + delta * t;
                best = best.min((p.x - c.x).hypot(p.y - c.y));
            }
        }
        best
    }

    #[test]
    fn test_output_shape_and_determinism() {
        let params = TunnelLatticeParams::default();
        let a = generate_tunnel_lattice(96, 80, 42, &params).expect("generation should succeed");
        let b = generate_tunnel_lattice(96, 80, 42, &params).expect("generation should succeed");
        assert_eq!(a.len(), 96 * 80);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_output() {
        let params = TunnelLatticeParams::default();
        let a = generate_tunnel_lattice(64, 64, 1, &params).unwrap();
        let b = generate_tunnel_lattice(64, 64, 2, &params).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_dimensions() {
        let params = TunnelLatticeParams::default();
        for (w, h) in [(1, 64), (64, 1), (0, 0)] {
            let err = generate_tunnel_lattice(w, h, 0, &params).unwrap_err();
            assert!(matches!(err, MapGenError::InvalidDimensions { .. }));
        }
    }

    #[test]
    fn test_zero_nodes_is_fatal() {
        let params = TunnelLatticeParams {
            node_count: 0,
            ..Default::default()
        };
        let err = generate_tunnel_lattice(32, 32, 0, &params).unwrap_err();
        assert!(matches!(
            err,
            MapGenError::DegenerateNodeCount { requested: 0, produced: 0 }
        ));
    }

    #[test]
    fn test_output_has_both_bands() {
        let params = TunnelLatticeParams::default();
        let image = generate_tunnel_lattice(256, 256, 7, &params).unwrap();
        let bands = params.bands();
        assert!(image.iter().any(|&b| b < bands.outside_base), "no tunnels rendered");
        assert!(image.iter().any(|&b| b >= bands.outside_base), "no rock rendered");
    }

    #[test]
    fn test_straight_scenario_bands() {
        let params = scenario_params();
        let (w, h) = (64u32, 64u32);
        let plan = plan_tunnel_lattice(w, h, 42, &params).expect("plan should succeed");
        let image = generate_tunnel_lattice(w, h, 42, &params).expect("generation should succeed");

        assert!(plan.graph.is_connected());
        assert!(plan.polylines.iter().all(|p| p.len() == 2));

        let bands = params.bands();
        let radius = params.base_radius;
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(x as f64, y as f64);
                let nearest = plan
                    .polylines
                    .iter()
                    .map(|line| torus_segment_distance(&plan.domain, p, line[0], line[1]))
                    .fold(f64::MAX, f64::min);
                let shade = image[(y * w + x) as usize];

                if nearest < radius - 1e-3 {
                    assert!(shade < bands.outside_base, "({x}, {y}) at {nearest:.3} should be inside");
                }
                if nearest >= 2.0 * radius + 1e-3 {
                    assert_eq!(shade, bands.saturated_outside(), "({x}, {y}) should be saturated");
                }
            }
        }
    }

    #[test]
    fn test_single_isolated_tunnel_saturates_far_pixels() {
        // Two nodes on a large tile: one straight tunnel, most of the tile far away
        let params = TunnelLatticeParams {
            node_count: 2,
            base_radius: 4.0,
            radius_noise_amp: 0.0,
            extra_loops: 0,
            curviness: 0.0,
            curve_steps: 1,
            jitter_amount: 0.0,
            ..Default::default()
        };
        let image = generate_tunnel_lattice(128, 128, 3, &params).unwrap();
        let saturated = image.iter().filter(|&&b| b == params.bands().saturated_outside()).count();
        assert!(saturated > 128 * 128 / 2);
        assert!(image.iter().any(|&b| b < params.outside_base));
    }

    #[test]
    fn test_seamless_columns() {
        let params = TunnelLatticeParams {
            node_count: 9,
            base_radius: 6.0,
            ..Default::default()
        };
        let (w, h) = (72u32, 48u32);
        let plan = plan_tunnel_lattice(w, h, 11, &params).unwrap();
        let image = generate_tunnel_lattice(w, h, 11, &params).unwrap();

        // A tunnel crossing the left/right border shows up on both edge columns
        let crossing = plan.polylines.iter().flat_map(|l| l.windows(2)).any(|pair| {
            let d = plan.domain.shortest_vector(pair[0], pair[1]);
            pair[0].x + d.x >= plan.domain.width || pair[0].x + d.x < 0.0
        });
        assert!(crossing, "a 3x3 lattice always has wrap edges");

        let inside = |x: u32, y: u32| image[(y * w + x) as usize] < params.outside_base;
        let left = (0..h).filter(|&y| inside(0, y)).count();
        let right = (0..h).filter(|&y| inside(w - 1, y)).count();
        assert!(left > 0 && right > 0);
    }

    #[test]
    fn test_params_toml_round_trip_uses_camel_case() {
        let params: TunnelLatticeParams =
            toml::from_str("nodeCount = 10\nbaseRadius = 3.5\ncurveSteps = 4\n").unwrap();
        assert_eq!(params.node_count, 10);
        assert_eq!(params.base_radius, 3.5);
        assert_eq!(params.curve_steps, 4);
        // Unspecified keys keep their defaults
        assert_eq!(params.extra_loops, 12);
    }

    #[test]
    fn test_params_validation() {
        assert!(TunnelLatticeParams::default().validate().is_ok());

        let bad = TunnelLatticeParams {
            base_radius: -1.0,
            curviness: 2.0,
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("base_radius"));
        assert!(fields.contains_key("curviness"));
    }
}
