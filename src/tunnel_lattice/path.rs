use super::constants::{CURL_BEND, MIDPOINT_DEVIATION, MIN_CURVE_DISTANCE};
use super::noise::PeriodicNoise;
use super::torus::{Point, TorusDomain};
use crate::config::range_types::{CurveSteps, Curviness};
use crate::rng::SeedStream;

/// Ordered tunnel centreline points, each wrapped into the domain
pub type Polyline = Vec<Point>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSettings {
    pub steps: CurveSteps,
    pub curviness: Curviness,
}

/// Bend the edge `a → b` into a quadratic Bézier polyline of `steps + 1`
/// points along the toroidal shortest vector.
///
/// One value is drawn from `stream` per call, even for degenerate edges, so
/// the stream position depends only on the number of edges.
pub fn curved_path(
    a: Point,
    b: Point,
    settings: CurveSettings,
    domain: &TorusDomain,
    noise: &PeriodicNoise,
    stream: &mut SeedStream,
) -> Polyline {
    let draw = stream.next_f64();

    let delta = domain.shortest_vector(a, b);
    let distance = delta.length();
    if distance < MIN_CURVE_DISTANCE {
        return vec![a, b];
    }

    let steps = settings.steps.get() as usize;
    let curviness = settings.curviness.get();

    let normal = Point::new(-delta.y / distance, delta.x / distance);
    let offset = curviness * distance * MIDPOINT_DEVIATION * (draw - 0.5);
    let mid = a + delta * 0.5 + normal * offset;
    let end = a + delta;
    let bend = curviness * (distance / steps as f64) * CURL_BEND;

    let mut path = Vec::with_capacity(steps + 1);
    path.push(a);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let s = 1.0 - t;
        let mut p = a * (s * s) + mid * (2.0 * s * t) + end * (t * t);

        if bend > 0.0 {
            let (u, v) = domain.to_uv(p);
            let (cx, cy) = noise.curl(u, v);
            p = p + Point::new(cx, cy) * bend;
        }

        path.push(domain.wrap(p));
    }
    path.push(b);

    path
}
