pub mod config;
pub mod depth_map;
pub mod errors;
pub mod generators;
pub mod rng;
pub mod tunnel_lattice;

// Selective re-exports for external consumers

pub use depth_map::DepthMap;
pub use errors::{MapGenError, MapGenResult};
pub use generators::{ALGORITHMS, GeneratorKind, MapGenerator, get_generator_preset};
pub use tunnel_lattice::{TunnelLatticeParams, generate_tunnel_lattice};
