/// Constants for the tunnel-lattice generator

/// Noise field
pub const LATTICE_PERIOD: u32 = 256;
pub const BASE_CELLS: f64 = 8.0;
pub const CURL_DELTA: f64 = 0.01;

/// Node sampling: wave bend as a fraction of a cell
pub const WAVE_AMPLITUDE: f64 = 0.15;

/// Graph building: loop edges only between nodes closer than this fraction of min(W, H)
pub const LOOP_DISTANCE_FRACTION: f64 = 0.35;

/// Path synthesis
pub const MIN_CURVE_DISTANCE: f64 = 1.0;
pub const MIDPOINT_DEVIATION: f64 = 0.3;
pub const CURL_BEND: f64 = 0.5;

/// Distance field sentinel for pixels no segment has reached
pub const FAR_DISTANCE: f32 = 1.0e9;

/// Lower bound on the radius used to normalize shading
pub const MIN_SHADE_RADIUS: f64 = 1e-6;
