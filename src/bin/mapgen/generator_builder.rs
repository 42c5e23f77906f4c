use depthgen::config::MapGenConfig;
use depthgen::errors::MapGenResult;
use depthgen::generators::{GeneratorKind, MapGenerator, get_generator_preset};
use tracing::{info, warn};

/// Tunnel-lattice knobs settable from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TunnelOverrides {
    pub nodes: Option<u32>,
    pub radius: Option<f64>,
    pub extra_loops: Option<u32>,
    pub curviness: Option<f64>,
    pub curve_steps: Option<u32>,
    pub jitter: Option<f64>,
}

impl TunnelOverrides {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct GeneratorBuilder {
    algorithm: String,
    seed: Option<u32>,
    config: MapGenConfig,
    overrides: TunnelOverrides,
}

impl GeneratorBuilder {
    pub fn new(algorithm: String) -> Self {
        Self {
            algorithm,
            seed: None,
            config: MapGenConfig::default(),
            overrides: TunnelOverrides::default(),
        }
    }

    pub fn seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(mut self, config: MapGenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn overrides(mut self, overrides: TunnelOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve the preset, apply overrides and validate the result
    pub fn build(self) -> MapGenResult<MapGenerator> {
        let mut generator = get_generator_preset(&self.algorithm, self.seed, &self.config)?;

        if !self.overrides.is_empty() {
            generator.kind = self.apply_overrides(generator.kind);
        }

        generator.kind.validate()?;
        Ok(generator)
    }

    fn apply_overrides(&self, kind: GeneratorKind) -> GeneratorKind {
        match kind {
            GeneratorKind::TunnelLattice(mut params) => {
                let o = &self.overrides;
                if let Some(nodes) = o.nodes {
                    params.node_count = nodes;
                }
                if let Some(radius) = o.radius {
                    params.base_radius = radius;
                }
                if let Some(extra_loops) = o.extra_loops {
                    params.extra_loops = extra_loops;
                }
                if let Some(curviness) = o.curviness {
                    params.curviness = curviness;
                }
                if let Some(curve_steps) = o.curve_steps {
                    params.curve_steps = curve_steps;
                }
                if let Some(jitter) = o.jitter {
                    params.jitter_amount = jitter;
                }
                info!(
                    nodes = params.node_count,
                    radius = params.base_radius,
                    extra_loops = params.extra_loops,
                    "using custom tunnel parameters"
                );
                GeneratorKind::TunnelLattice(params)
            }
            other => {
                warn!(
                    algorithm = other.name(),
                    "tunnel parameters (--nodes, --radius, ...) are ignored for this algorithm"
                );
                other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthgen::errors::MapGenError;

    #[test]
    fn test_generator_builder_default() {
        let generator = GeneratorBuilder::new("tunnel-lattice".to_string())
            .seed(Some(12345))
            .build()
            .expect("Builder should succeed with defaults");
        assert_eq!(generator.seed, 12345);
        assert_eq!(generator.algorithm_name(), "tunnel-lattice");
    }

    #[test]
    fn test_generator_builder_with_overrides() {
        let generator = GeneratorBuilder::new("tunnel-lattice".to_string())
            .seed(Some(1))
            .overrides(TunnelOverrides {
                nodes: Some(9),
                radius: Some(6.5),
                curve_steps: Some(4),
                ..Default::default()
            })
            .build()
            .unwrap();

        match generator.kind {
            GeneratorKind::TunnelLattice(params) => {
                assert_eq!(params.node_count, 9);
                assert_eq!(params.base_radius, 6.5);
                assert_eq!(params.curve_steps, 4);
                assert_eq!(params.extra_loops, 12);
            }
            _ => panic!("Expected tunnel-lattice generator"),
        }
    }

    #[test]
    fn test_overrides_ignored_for_other_algorithms() {
        let config = MapGenConfig::default();
        let generator = GeneratorBuilder::new("perlin".to_string())
            .seed(Some(1))
            .config(config.clone())
            .overrides(TunnelOverrides {
                nodes: Some(3),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(generator.kind, GeneratorKind::Perlin(config.perlin));
    }

    #[test]
    fn test_builder_accepts_alias() {
        let config = MapGenConfig::default();
        let generator = GeneratorBuilder::new("cellular".to_string())
            .seed(Some(4))
            .config(config.clone())
            .build()
            .expect("Alias should build successfully");
        assert_eq!(generator.algorithm_name(), "organic-cavity");
        assert_eq!(generator.kind, GeneratorKind::OrganicCavity(config.organic_cavity));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = GeneratorBuilder::new("tunnel-lattice".to_string())
            .overrides(TunnelOverrides {
                radius: Some(-2.0),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, MapGenError::InvalidParameters { .. }));
    }

    #[test]
    fn test_generator_builder_unknown_type() {
        let builder = GeneratorBuilder::new("unknown".to_string());
        assert!(builder.build().is_err());
    }
}
