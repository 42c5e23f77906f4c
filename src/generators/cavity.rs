//! Cave-like depth maps grown from random seeds.
//!
//! `organic-cavity` runs a stochastic cellular automaton over a boolean grid;
//! `advanced-organic` grows a continuous cavity field from scattered cavity
//! centres and layers noise, cell structure and texture on top. Both consume
//! one [`SeedStream`] in a fixed scan order, so they run single-threaded.

use super::voronoi::random_sites;
use crate::rng::SeedStream;
use noise::{NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Cellular-automaton cavity parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganicCavityParams {
    #[validate(range(min = 0, max = 64))]
    pub iterations: u32,
    #[validate(range(max = 24))]
    pub birth_threshold: u32,
    #[validate(range(max = 24))]
    pub survival_threshold: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub initial_density: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub organic_growth: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub cavity_depth: f64,
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub wall_thickness: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub texture_detail: f64,
    #[validate(range(max = 16))]
    pub smoothing_passes: u32,
}

impl Default for OrganicCavityParams {
    fn default() -> Self {
        Self {
            iterations: 8,
            birth_threshold: 3,
            survival_threshold: 2,
            initial_density: 0.4,
            organic_growth: 0.6,
            cavity_depth: 0.8,
            wall_thickness: 0.2,
            texture_detail: 0.4,
            smoothing_passes: 3,
        }
    }
}

/// Layered organic cavity parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedOrganicParams {
    #[validate(range(min = 0.0, max = 10.0))]
    pub cavity_density: f64,
    /// Cavity radius range as fractions of the shorter image side
    pub cavity_size_range: [f64; 2],
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub wall_thickness: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub organic_variation: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub branching_factor: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub texture_detail: f64,
    #[validate(range(max = 16))]
    pub smoothing_passes: u32,
    #[validate(range(min = 1, max = 16))]
    pub fractal_octaves: u32,
    #[validate(range(exclusive_min = 0.0))]
    pub noise_scale: f64,
    #[validate(range(min = 1, max = 10000))]
    pub voronoi_points: u32,
}

impl Default for AdvancedOrganicParams {
    fn default() -> Self {
        Self {
            cavity_density: 0.5,
            cavity_size_range: [0.05, 0.25],
            wall_thickness: 0.2,
            organic_variation: 0.8,
            branching_factor: 0.9,
            texture_detail: 0.7,
            smoothing_passes: 3,
            fractal_octaves: 5,
            noise_scale: 0.015,
            voronoi_points: 150,
        }
    }
}

impl AdvancedOrganicParams {
    /// Ordered, non-negative size range
    fn size_range(&self) -> (f64, f64) {
        let [a, b] = self.cavity_size_range;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        (lo.max(0.0), hi.max(0.0))
    }
}

/// Row-major scalar grid
#[derive(Debug, Clone, PartialEq)]
struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn at(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// In-bounds neighbours within `radius` (Chebyshev), excluding the centre
    fn neighbours(&self, x: usize, y: usize, radius: i64) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let (w, h) = (self.width as i64, self.height as i64);
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius).filter_map(move |dy| {
                let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                if (dx == 0 && dy == 0) || nx < 0 || ny < 0 || nx >= w || ny >= h {
                    return None;
                }
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                Some((nx as usize, ny as usize, distance))
            })
        })
    }

    /// Weighted average over a `(2r+1)²` window, normalized by the weights
    /// that fall inside the image
    fn smooth(&self, radius: i64, weight: impl Fn(f64) -> f64 + Sync) -> Self {
        let mut out = Self::new(self.width, self.height);
        out.data
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, value) in row.iter_mut().enumerate() {
                    let centre = weight(0.0);
                    let mut sum = self.at(x, y) * centre;
                    let mut total = centre;
                    for (nx, ny, distance) in self.neighbours(x, y, radius) {
                        let w = weight(distance);
                        sum += self.at(nx, ny) * w;
                        total += w;
                    }
                    *value = sum / total.max(f64::EPSILON);
                }
            });
        out
    }
}

/// Deterministic sine-cosine grain in `[-detail, detail]`
fn granular_texture(x: usize, y: usize, detail: f64, spread: f64) -> f64 {
    let frequency = 1.0 + detail * spread;
    (x as f64 * frequency * 0.1).sin() * (y as f64 * frequency * 0.1).cos() * detail
}

pub fn generate_organic_cavity(
    width: u32,
    height: u32,
    seed: u32,
    params: &OrganicCavityParams,
) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut stream = SeedStream::new(seed);

    // Clustered initial seeding
    let mut alive: Vec<bool> = (0..w * h)
        .map(|i| {
            let (x, y) = ((i % w) as f64, (i / w) as f64);
            let density = params.initial_density + (x * 0.1).sin() * (y * 0.1).cos() * 0.2;
            stream.next_f64() < density
        })
        .collect();

    for _ in 0..params.iterations {
        alive = organic_growth_step(&alive, w, h, params, &mut stream);
    }
    tracing::debug!(
        alive = alive.iter().filter(|&&a| a).count(),
        iterations = params.iterations,
        "grew organic cavity"
    );

    let mut field = Field::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let i = field.index(x, y);
            let base = if alive[i] { 1.0 } else { 0.0 };
            let grain = granular_texture(x, y, params.texture_detail, 4.0);
            field.data[i] = (base + grain * 0.3).clamp(0.0, 1.0);
        }
    }

    for _ in 0..params.smoothing_passes {
        field = field.smooth(1, |d| if d == 0.0 { 0.5 } else { 0.0625 });
    }

    let cavity = (255.0 * (1.0 - params.cavity_depth)) as u8;
    field
        .data
        .iter()
        .map(|&value| {
            if value < params.wall_thickness {
                cavity
            } else {
                let wall = (value - params.wall_thickness) / (1.0 - params.wall_thickness);
                (255.0 * (0.3 + wall * 0.7)).clamp(0.0, 255.0) as u8
            }
        })
        .collect()
}

/// One automaton step over a 5×5 neighbourhood; farther neighbours are
/// counted with probability `1 / distance`
fn organic_growth_step(
    alive: &[bool],
    w: usize,
    h: usize,
    params: &OrganicCavityParams,
    stream: &mut SeedStream,
) -> Vec<bool> {
    let grid = Field {
        width: w,
        height: h,
        data: alive.iter().map(|&a| if a { 1.0 } else { 0.0 }).collect(),
    };
    let mut next = vec![false; w * h];

    for y in 0..h {
        for x in 0..w {
            let mut neighbours = 0u32;
            for (nx, ny, distance) in grid.neighbours(x, y, 2) {
                if grid.at(nx, ny) > 0.0 && (distance <= 1.0 || stream.next_f64() < 1.0 / distance) {
                    neighbours += 1;
                }
            }

            let i = y * w + x;
            next[i] = if alive[i] {
                let chance = params.organic_growth + (stream.next_f64() - 0.5) * 0.2;
                neighbours >= params.survival_threshold && stream.next_f64() < chance
            } else {
                let chance = params.organic_growth + (stream.next_f64() - 0.5) * 0.3;
                neighbours >= params.birth_threshold && stream.next_f64() < chance
            };
        }
    }
    next
}

/// Randomly placed cavity centre
#[derive(Debug, Clone, Copy)]
struct Cavity {
    x: f64,
    y: f64,
    radius: f64,
    connectivity: f64,
    /// Bonus from cavities close to this one, added wherever it has influence
    link_bonus: f64,
}

fn scatter_cavities(w: usize, h: usize, params: &AdvancedOrganicParams, stream: &mut SeedStream) -> Vec<Cavity> {
    let count = (w as f64 * h as f64 * params.cavity_density / 100.0) as usize;
    let (lo, hi) = params.size_range();
    let short_side = w.min(h) as f64;

    let mut cavities: Vec<Cavity> = (0..count)
        .map(|_| {
            let x = stream.next_below(w as u32) as f64;
            let y = stream.next_below(h as u32) as f64;
            let size = stream.next_f64() * (hi - lo) + lo;
            let connectivity = stream.next_f64() * 0.8 + 0.2;
            Cavity {
                x,
                y,
                radius: short_side * size,
                connectivity,
                link_bonus: 0.0,
            }
        })
        .collect();

    // Pairs closer than twice the link distance pull each other's bonus
    let link_distance = short_side * 0.1;
    for i in 0..cavities.len() {
        let mut bonus = 0.0;
        for j in (i + 1)..cavities.len() {
            let d = (cavities[i].x - cavities[j].x).hypot(cavities[i].y - cavities[j].y);
            let normalized = d / link_distance.max(f64::EPSILON);
            if normalized < 2.0 {
                bonus += (1.0 - normalized).powi(3) * 0.3;
            }
        }
        cavities[i].link_bonus = bonus;
    }
    cavities
}

/// Cavity influence map: strongest falloff plus weighted sum and link bonus
fn base_cavities(w: usize, h: usize, cavities: &[Cavity]) -> Field {
    let mut max_influence = Field::new(w, h);
    let mut total = Field::new(w, h);
    let mut bonus = Field::new(w, h);

    for cavity in cavities {
        if cavity.radius <= 0.0 {
            continue;
        }
        let x0 = (cavity.x - cavity.radius).ceil().max(0.0) as usize;
        let x1 = ((cavity.x + cavity.radius).floor() as usize).min(w - 1);
        let y0 = (cavity.y - cavity.radius).ceil().max(0.0) as usize;
        let y1 = ((cavity.y + cavity.radius).floor() as usize).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = (x as f64 - cavity.x).hypot(y as f64 - cavity.y) / cavity.radius;
                if d < 1.0 {
                    let influence = (1.0 - d).powi(2);
                    let i = y * w + x;
                    max_influence.data[i] = max_influence.data[i].max(influence);
                    total.data[i] += influence * cavity.connectivity;
                    bonus.data[i] += cavity.link_bonus;
                }
            }
        }
    }

    let mut layer = Field::new(w, h);
    for i in 0..w * h {
        let combined = (max_influence.data[i] + total.data[i] * 0.3 + bonus.data[i]).min(1.0);
        layer.data[i] = combined * 0.7;
    }
    layer
}

/// Four passes of stochastic growth: strong cavity cells deepen, weak cells
/// next to cavity get eroded
fn organic_growth(layer: Field, params: &AdvancedOrganicParams, stream: &mut SeedStream) -> Field {
    let mut layer = layer;
    for _ in 0..4 {
        let mut next = layer.clone();
        for y in 0..layer.height {
            for x in 0..layer.width {
                let mut sum = 0.0;
                let mut count = 0;
                for (nx, ny, distance) in layer.neighbours(x, y, 2) {
                    if stream.next_f64() < 1.0 / (1.0 + distance * 0.5) {
                        sum += layer.at(nx, ny);
                        count += 1;
                    }
                }
                let neighbours = if count > 0 { sum / count as f64 } else { 0.0 };

                let current = layer.at(x, y);
                let i = layer.index(x, y);
                if current > 0.5 {
                    let chance = params.organic_variation + (stream.next_f64() - 0.5) * 0.3;
                    if stream.next_f64() < chance {
                        next.data[i] = (current + 0.1).min(1.0);
                    }
                } else {
                    let chance = params.branching_factor + (stream.next_f64() - 0.5) * 0.2;
                    if neighbours > 0.3 && stream.next_f64() < chance {
                        next.data[i] = (current - 0.05).max(0.0);
                    }
                }
            }
        }
        layer = next;
    }
    layer
}

pub fn generate_advanced_organic(
    width: u32,
    height: u32,
    seed: u32,
    params: &AdvancedOrganicParams,
) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut stream = SeedStream::new(seed);

    let cavities = scatter_cavities(w, h, params, &mut stream);
    tracing::debug!(cavities = cavities.len(), "scattered cavity centres");

    let mut layer = organic_growth(base_cavities(w, h, &cavities), params, &mut stream);

    // Fractal noise blend
    let perlin = Perlin::new(seed);
    let octaves = params.fractal_octaves.clamp(1, 4);
    for y in 0..h {
        for x in 0..w {
            let mut noise_value = 0.0;
            let mut max_value = 0.0;
            let mut amplitude = 1.0;
            let mut frequency = params.noise_scale;
            for _ in 0..octaves {
                noise_value += perlin.get([x as f64 * frequency, y as f64 * frequency]) * amplitude;
                max_value += amplitude;
                amplitude *= 0.5;
                frequency *= 2.0;
            }
            let i = layer.index(x, y);
            layer.data[i] = layer.data[i] * 0.7 + (noise_value / max_value + 1.0) * 0.5 * 0.3;
        }
    }

    // Cell structure blend
    let sites = random_sites(params.voronoi_points, width, height, &mut stream);
    let diagonal = (w as f64).hypot(h as f64);
    layer
        .data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                let nearest = sites
                    .iter()
                    .map(|&(sx, sy)| (x as f64 - sx).hypot(y as f64 - sy))
                    .fold(f64::MAX, f64::min);
                *value = *value * 0.8 + (1.0 - nearest / diagonal) * 0.2;
            }
        });

    // Surface grain
    for y in 0..h {
        for x in 0..w {
            let i = layer.index(x, y);
            let grain = granular_texture(x, y, params.texture_detail, 8.0);
            layer.data[i] = (layer.data[i] + grain * 0.2).clamp(0.0, 1.0);
        }
    }

    for _ in 0..params.smoothing_passes.min(2) {
        layer = layer.smooth(2, |d| (-d * d / 2.0).exp());
    }

    let wall_thickness = params.wall_thickness;
    layer
        .data
        .iter()
        .map(|&value| {
            let value = value.clamp(0.0, 1.0);
            let shade = if value < wall_thickness {
                0.1 + value / wall_thickness * 0.3
            } else {
                0.4 + (value - wall_thickness) / (1.0 - wall_thickness) * 0.6
            };
            (255.0 * shade).clamp(0.0, 255.0) as u8
        })
        .collect()
}
