use crate::rng::SeedStream;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Midpoint-displacement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DiamondSquareParams {
    #[validate(range(min = 0.0, max = 1.0))]
    pub roughness: f64,
    /// Heightmap side; rounded down to `2^n + 1`
    #[validate(range(min = 3, max = 4097))]
    pub size: u32,
}

impl Default for DiamondSquareParams {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            size: 257,
        }
    }
}

/// Largest `2^n + 1` not above `size`, at least 3
pub fn grid_side(size: u32) -> usize {
    let cells = size.saturating_sub(1).max(2);
    let power = 1usize << (u32::BITS - 1 - cells.leading_zeros());
    power + 1
}

/// Square `side × side` heightmap, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    side: usize,
    data: Vec<f64>,
}

impl Heightmap {
    /// Seed the four corners, then alternate diamond and square passes with
    /// displacement shrinking by `roughness` per level
    pub fn build(side: usize, roughness: f64, stream: &mut SeedStream) -> Self {
        let mut map = Self {
            side,
            data: vec![0.0; side * side],
        };
        let last = side - 1;
        for (x, y) in [(0, 0), (0, last), (last, 0), (last, last)] {
            map.set(x, y, stream.next_f64());
        }

        let mut step = last;
        let mut range = 1.0;
        while step > 1 {
            let half = step / 2;

            for x in (half..side).step_by(step) {
                for y in (half..side).step_by(step) {
                    let avg = (map.at(x - half, y - half)
                        + map.at(x + half, y - half)
                        + map.at(x - half, y + half)
                        + map.at(x + half, y + half))
                        / 4.0;
                    map.set(x, y, avg + displacement(stream, range));
                }
            }

            for x in (0..side).step_by(half) {
                for y in ((x + half) % step..side).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0;
                    if x >= half {
                        sum += map.at(x - half, y);
                        count += 1;
                    }
                    if x + half < side {
                        sum += map.at(x + half, y);
                        count += 1;
                    }
                    if y >= half {
                        sum += map.at(x, y - half);
                        count += 1;
                    }
                    if y + half < side {
                        sum += map.at(x, y + half);
                        count += 1;
                    }
                    map.set(x, y, sum / count as f64 + displacement(stream, range));
                }
            }

            step = half;
            range *= roughness;
        }

        map
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.side + x]
    }

    fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.side + x] = value;
    }

    /// Lowest and highest height
    pub fn bounds(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

fn displacement(stream: &mut SeedStream, range: f64) -> f64 {
    (stream.next_f64() * 2.0 - 1.0) * range
}

/// Build the heightmap and resample it nearest-neighbour onto the image,
/// stretching the height range to the full byte range
pub fn generate_diamond_square(
    width: u32,
    height: u32,
    seed: u32,
    params: &DiamondSquareParams,
) -> Vec<u8> {
    let mut stream = SeedStream::new(seed);
    let side = grid_side(params.size);
    let map = Heightmap::build(side, params.roughness, &mut stream);

    let (lo, hi) = map.bounds();
    let span = (hi - lo).max(f64::EPSILON);
    tracing::debug!(side, lo, hi, "built diamond-square heightmap");

    let last = (side - 1) as f64;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let map_y = (y as f64 / height as f64 * last) as usize;
        for x in 0..width {
            let map_x = (x as f64 / width as f64 * last) as usize;
            let normalized = (map.at(map_x, map_y) - lo) / span;
            pixels.push((normalized * 255.0).clamp(0.0, 255.0) as u8);
        }
    }
    pixels
}
