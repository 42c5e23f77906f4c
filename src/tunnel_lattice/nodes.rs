use super::constants::WAVE_AMPLITUDE;
use super::torus::{Point, TorusDomain};
use crate::config::range_types::JitterAmount;
use crate::rng::SeedStream;
use std::f64::consts::TAU;

/// Lattice nodes in row-major grid order
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeNodes {
    pub points: Vec<Point>,
    /// Grid side length, `ceil(sqrt(requested))`
    pub columns: usize,
}

impl LatticeNodes {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Place up to `count` nodes on a staggered, jittered, wave-deformed grid.
///
/// Draws two values from `stream` per node (x jitter, then y jitter), in
/// row-major order.
pub fn sample_nodes(
    count: u32,
    domain: &TorusDomain,
    jitter: JitterAmount,
    stream: &mut SeedStream,
) -> LatticeNodes {
    let count = count as usize;
    if count == 0 {
        return LatticeNodes {
            points: Vec::new(),
            columns: 0,
        };
    }

    let grid = grid_size(count);
    let cell_w = domain.width / grid as f64;
    let cell_h = domain.height / grid as f64;
    let j = jitter.get();

    let mut points = Vec::with_capacity(count);
    'rows: for row in 0..grid {
        let stagger = if row % 2 == 1 { 0.5 * cell_w } else { 0.0 };
        let row_wave = (TAU * row as f64 / grid as f64).sin() * WAVE_AMPLITUDE * cell_w;

        for col in 0..grid {
            if points.len() == count {
                break 'rows;
            }

            let jitter_x = (stream.next_f64() - 0.5) * j * cell_w;
            let jitter_y = (stream.next_f64() - 0.5) * j * cell_h;
            let col_wave = (TAU * col as f64 / grid as f64).sin() * WAVE_AMPLITUDE * cell_h;

            let x = (col as f64 + 0.5) * cell_w + stagger + jitter_x + row_wave;
            let y = (row as f64 + 0.5) * cell_h + jitter_y + col_wave;
            points.push(domain.wrap(Point::new(x, y)));
        }
    }

    LatticeNodes {
        points,
        columns: grid,
    }
}

/// `ceil(sqrt(count))` without floating point rounding surprises
pub fn grid_size(count: usize) -> usize {
    let mut side = (count as f64).sqrt() as usize;
    while side * side < count {
        side += 1;
    }
    while side > 1 && (side - 1) * (side - 1) >= count {
        side -= 1;
    }
    side.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        assert_eq!(grid_size(1), 1);
        assert_eq!(grid_size(2), 2);
        assert_eq!(grid_size(4), 2);
        assert_eq!(grid_size(5), 3);
        assert_eq!(grid_size(16), 4);
        assert_eq!(grid_size(24), 5);
        assert_eq!(grid_size(10_000), 100);
    }

    #[test]
    fn test_node_count_and_bounds() {
        let domain = TorusDomain::new(200, 120);
        for count in [1, 2, 3, 7, 16, 24, 50] {
            let mut stream = SeedStream::new(11);
            let nodes = sample_nodes(count, &domain, JitterAmount::new(1.0), &mut stream);
            assert_eq!(nodes.len(), count as usize);
            for p in &nodes.points {
                assert!((0.0..200.0).contains(&p.x), "x {} out of domain", p.x);
                assert!((0.0..120.0).contains(&p.y), "y {} out of domain", p.y);
            }
        }
    }

    #[test]
    fn test_zero_nodes() {
        let domain = TorusDomain::new(64, 64);
        let mut stream = SeedStream::new(1);
        let nodes = sample_nodes(0, &domain, JitterAmount::default(), &mut stream);
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let domain = TorusDomain::new(512, 512);
        let a = sample_nodes(24, &domain, JitterAmount::new(0.5), &mut SeedStream::new(99));
        let b = sample_nodes(24, &domain, JitterAmount::new(0.5), &mut SeedStream::new(99));
        assert_eq!(a, b);

        let c = sample_nodes(24, &domain, JitterAmount::new(0.5), &mut SeedStream::new(100));
        assert_ne!(a, c);
    }

    #[test]
    fn test_no_jitter_is_staggered_grid() {
        let domain = TorusDomain::new(100, 100);
        let mut stream = SeedStream::new(3);
        let nodes = sample_nodes(4, &domain, JitterAmount::new(0.0), &mut stream);
        assert_eq!(nodes.columns, 2);

        // Row 0 has no wave (sin 0) and no stagger; column 0 has no wave either
        let p = nodes.points[0];
        assert!((p.x - 25.0).abs() < 1e-9);
        assert!((p.y - 25.0).abs() < 1e-9);

        // Row 1 is shifted by half a cell (sin(pi) is ~0)
        let q = nodes.points[2];
        assert!((q.x - 50.0).abs() < 1e-9);
        assert!((q.y - 75.0).abs() < 1e-9);
    }
}
