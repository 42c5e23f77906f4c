//! Capsule distance-field accumulation on the torus.
//!
//! Every polyline segment becomes one or more [`Stamp`]s: the segment itself
//! plus any of its eight domain-translated copies that reach into the tile.
//! Stamps are collected first and then applied row by row in parallel. Each
//! pixel only ever takes the `min` of its candidates, so the result does not
//! depend on stamp order or thread scheduling.

use super::constants::FAR_DISTANCE;
use super::noise::PeriodicNoise;
use super::torus::{Point, TorusDomain};
use rayon::prelude::*;

/// Radius profile of the tunnels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunnelProfile {
    pub base_radius: f64,
    pub radius_noise_amp: f64,
    pub noise_octaves: u32,
    pub noise_scale: f64,
}

impl TunnelProfile {
    /// Largest radius the noise can produce
    pub fn max_radius(&self) -> f64 {
        self.base_radius * (1.0 + self.radius_noise_amp.abs())
    }

    /// Distance from a segment beyond which a pixel's signed distance is at
    /// least `base_radius`, i.e. past the point where outside shading saturates.
    pub fn reach(&self) -> f64 {
        self.max_radius() + self.base_radius
    }

    /// Local radius at normalized UV
    pub fn radius_at(&self, noise: &PeriodicNoise, u: f64, v: f64) -> f64 {
        if self.radius_noise_amp == 0.0 {
            return self.base_radius;
        }
        let n = noise.fractal(u, v, self.noise_octaves, self.noise_scale);
        self.base_radius * (1.0 + self.radius_noise_amp * n)
    }
}

/// Everything a stamp needs to evaluate a pixel
#[derive(Debug, Clone, Copy)]
pub struct SdfContext {
    pub domain: TorusDomain,
    pub profile: TunnelProfile,
    pub noise: PeriodicNoise,
}

/// One segment copy and the pixel window it can influence (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    start: Point,
    delta: Point,
    len2: f64,
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

impl Stamp {
    fn covers_row(&self, y: usize) -> bool {
        y >= self.min_y && y <= self.max_y
    }

    /// Signed distance of pixel `(px, py)` to this capsule
    fn signed_distance(&self, px: f64, py: f64, ctx: &SdfContext) -> f32 {
        let t = (((px - self.start.x) * self.delta.x + (py - self.start.y) * self.delta.y)
            / self.len2)
            .clamp(0.0, 1.0);
        let closest = self.start + self.delta * t;
        let dist = (px - closest.x).hypot(py - closest.y);

        let (u, v) = ctx.domain.to_uv(closest);
        let radius = ctx.profile.radius_at(&ctx.noise, u, v);
        (dist - radius) as f32
    }
}

/// H×W buffer of signed distances, only ever lowered
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DistanceField {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![FAR_DISTANCE; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Row-major distances
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn union_polyline(&mut self, polyline: &[Point], ctx: &SdfContext) {
        let mut stamps = Vec::new();
        self.stamp_polyline(polyline, ctx, &mut stamps);
        self.apply(&stamps, ctx);
    }

    /// Union every polyline in one parallel pass
    pub fn union_polylines(&mut self, polylines: &[Vec<Point>], ctx: &SdfContext) {
        let mut stamps = Vec::new();
        for polyline in polylines {
            self.stamp_polyline(polyline, ctx, &mut stamps);
        }
        tracing::debug!(
            polylines = polylines.len(),
            stamps = stamps.len(),
            "accumulating distance field"
        );
        self.apply(&stamps, ctx);
    }

    fn stamp_polyline(&self, polyline: &[Point], ctx: &SdfContext, stamps: &mut Vec<Stamp>) {
        for pair in polyline.windows(2) {
            let start = pair[0];
            let delta = ctx.domain.shortest_vector(pair[0], pair[1]);
            self.stamp_segment(start, delta, ctx, stamps);
        }
    }

    /// Push the segment and, near a border, its overlapping wrapped copies
    fn stamp_segment(&self, start: Point, delta: Point, ctx: &SdfContext, stamps: &mut Vec<Stamp>) {
        let reach = ctx.profile.reach();
        let len2 = delta.x * delta.x + delta.y * delta.y + 1e-12;

        let lo_x = start.x.min(start.x + delta.x) - reach;
        let hi_x = start.x.max(start.x + delta.x) + reach;
        let lo_y = start.y.min(start.y + delta.y) - reach;
        let hi_y = start.y.max(start.y + delta.y) + reach;

        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let interior = lo_x >= 0.0 && lo_y >= 0.0 && hi_x <= max_x && hi_y <= max_y;

        for oy in [0.0, -1.0, 1.0] {
            for ox in [0.0, -1.0, 1.0] {
                let is_original = ox == 0.0 && oy == 0.0;
                if interior && !is_original {
                    continue;
                }

                let shift_x = ox * ctx.domain.width;
                let shift_y = oy * ctx.domain.height;
                let Some((min_x, max_x)) = pixel_span(lo_x + shift_x, hi_x + shift_x, max_x) else {
                    continue;
                };
                let Some((min_y, max_y)) = pixel_span(lo_y + shift_y, hi_y + shift_y, max_y) else {
                    continue;
                };

                stamps.push(Stamp {
                    start: Point::new(start.x + shift_x, start.y + shift_y),
                    delta,
                    len2,
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                });
            }
        }
    }

    fn apply(&mut self, stamps: &[Stamp], ctx: &SdfContext) {
        let width = self.width;
        self.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let py = y as f64;
                for stamp in stamps.iter().filter(|s| s.covers_row(y)) {
                    for x in stamp.min_x..=stamp.max_x {
                        let d = stamp.signed_distance(x as f64, py, ctx);
                        if d < row[x] {
                            row[x] = d;
                        }
                    }
                }
            });
    }
}

/// Integer pixels in `[lo, hi]` clipped to `[0, max]`, if any
fn pixel_span(lo: f64, hi: f64, max: f64) -> Option<(usize, usize)> {
    let first = lo.ceil().max(0.0);
    let last = hi.floor().min(max);
    if first > last {
        return None;
    }
    Some((first as usize, last as usize))
}
