//! Periodic hashed-lattice value noise on the unit UV square.
//!
//! Lattice values are a pure function of `(x, y, seed, octave)`: nothing is
//! reseeded or mutated while sampling, so the field can be evaluated from any
//! thread in any order. Every octave wraps at an integer period equal to its
//! own cell count, which makes `u` and `u + 1` (and `v`, `v + 1`) sample the
//! same value. Torus-wrapped distance queries therefore never see a seam.

use super::constants::{BASE_CELLS, CURL_DELTA, LATTICE_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicNoise {
    seed: u32,
}

impl PeriodicNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Single-octave noise at `BASE_CELLS` cells per unit, in `[-1, 1]`
    pub fn noise(&self, u: f64, v: f64) -> f64 {
        let cells = BASE_CELLS as u32;
        self.value(u * BASE_CELLS, v * BASE_CELLS, cells, 0) * 2.0 - 1.0
    }

    /// Multi-octave noise normalized by total amplitude, in `[-1, 1]`.
    ///
    /// Octave `o` runs at `round(scale * BASE_CELLS * 2^o)` cells per unit
    /// (at least one, at most `LATTICE_PERIOD`) with amplitude `0.5^o`.
    pub fn fractal(&self, u: f64, v: f64, octaves: u32, scale: f64) -> f64 {
        let uu = u.rem_euclid(1.0);
        let vv = v.rem_euclid(1.0);

        let mut sum = 0.0;
        let mut total = 0.0;
        let mut amplitude = 1.0;
        for octave in 0..octaves.max(1) {
            let cells = octave_cells(scale, octave);
            let c = cells as f64;
            sum += amplitude * self.value(uu * c, vv * c, cells, octave + 1);
            total += amplitude;
            amplitude *= 0.5;
        }

        (sum / total) * 2.0 - 1.0
    }

    /// Perpendicular gradient of the base noise, `(dN/dv, -dN/du)`, measured
    /// per lattice cell so magnitudes stay around 1.
    pub fn curl(&self, u: f64, v: f64) -> (f64, f64) {
        let dn_dv = self.noise(u, v + CURL_DELTA) - self.noise(u, v - CURL_DELTA);
        let dn_du = self.noise(u + CURL_DELTA, v) - self.noise(u - CURL_DELTA, v);
        let per_cell = 2.0 * CURL_DELTA * BASE_CELLS;
        (dn_dv / per_cell, -dn_du / per_cell)
    }

    /// Bilinear value noise in lattice units, wrapping at `period`, in `[0, 1)`
    pub fn value(&self, x: f64, y: f64, period: u32, salt: u32) -> f64 {
        let period = period.clamp(1, LATTICE_PERIOD);
        let xf = x.floor();
        let yf = y.floor();
        let x0 = (xf as i64).rem_euclid(period as i64) as u32;
        let y0 = (yf as i64).rem_euclid(period as i64) as u32;
        let x1 = (x0 + 1) % period;
        let y1 = (y0 + 1) % period;

        let sx = smoothstep(x - xf);
        let sy = smoothstep(y - yf);

        let a = self.lattice(x0, y0, salt);
        let b = self.lattice(x1, y0, salt);
        let c = self.lattice(x0, y1, salt);
        let d = self.lattice(x1, y1, salt);

        let top = a + (b - a) * sx;
        let bottom = c + (d - c) * sx;
        top + (bottom - top) * sy
    }

    fn lattice(&self, x: u32, y: u32, salt: u32) -> f64 {
        let mut h = x
            .wrapping_mul(0x8da6_b343)
            ^ y.wrapping_mul(0xd816_3841)
            ^ self.seed.wrapping_mul(0xcb1a_b31f)
            ^ salt.wrapping_mul(0x9e37_79b9);
        h ^= h >> 15;
        h = h.wrapping_mul(0x2c1b_3c6d);
        h ^= h >> 12;
        h = h.wrapping_mul(0x297a_2d39);
        h ^= h >> 15;
        // Top 24 bits, exactly representable
        (h >> 8) as f64 / (1u32 << 24) as f64
    }
}

/// Lattice cells per unit for a fractal octave
pub fn octave_cells(scale: f64, octave: u32) -> u32 {
    let cells = scale.max(0.0) * BASE_CELLS * 2f64.powi(octave.min(30) as i32);
    (cells.round() as u32).clamp(1, LATTICE_PERIOD)
}

/// Cubic easing `t²(3 − 2t)`
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_range() {
        let noise = PeriodicNoise::new(42);
        for i in 0..500 {
            let u = i as f64 * 0.0137 - 2.0;
            let v = i as f64 * 0.0291 + 0.5;
            let n = noise.noise(u, v);
            assert!((-1.0..=1.0).contains(&n), "noise {n} out of range");
            let f = noise.fractal(u, v, 4, 1.2);
            assert!((-1.0..=1.0).contains(&f), "fractal {f} out of range");
        }
    }

    #[test]
    fn test_noise_is_pure() {
        let a = PeriodicNoise::new(9);
        let b = PeriodicNoise::new(9);
        assert_eq!(
            a.fractal(0.31, 0.77, 5, 1.2).to_bits(),
            b.fractal(0.31, 0.77, 5, 1.2).to_bits()
        );
        assert_eq!(a.curl(0.1, 0.2), b.curl(0.1, 0.2));
    }

    #[test]
    fn test_fractal_is_periodic_in_uv() {
        let noise = PeriodicNoise::new(1234);
        for i in 0..50 {
            let t = i as f64 / 50.0;
            let base = noise.fractal(0.0, t, 4, 1.2);
            let wrapped = noise.fractal(1.0, t, 4, 1.2);
            assert!((base - wrapped).abs() < 1e-12, "seam at v={t}");

            let base = noise.fractal(t, 0.0, 3, 0.7);
            let wrapped = noise.fractal(t, 1.0, 3, 0.7);
            assert!((base - wrapped).abs() < 1e-12, "seam at u={t}");
        }
    }

    #[test]
    fn test_base_noise_is_periodic() {
        let noise = PeriodicNoise::new(5);
        for i in 0..20 {
            let t = i as f64 * 0.05 + 0.013;
            assert!((noise.noise(t, 0.4) - noise.noise(t + 1.0, 0.4)).abs() < 1e-9);
            assert!((noise.noise(t, 0.4) - noise.noise(t - 3.0, 0.4)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_value_hits_lattice_points() {
        let noise = PeriodicNoise::new(77);
        // At integer coordinates the interpolation weights vanish
        let at_corner = noise.value(3.0, 5.0, 16, 0);
        let wrapped = noise.value(19.0, 21.0, 16, 0);
        assert_eq!(at_corner.to_bits(), wrapped.to_bits());
        assert!((0.0..1.0).contains(&at_corner));
    }

    #[test]
    fn test_seed_changes_field() {
        let a = PeriodicNoise::new(1);
        let b = PeriodicNoise::new(2);
        let differs = (0..32).any(|i| {
            let u = i as f64 / 32.0;
            (a.fractal(u, 0.5, 3, 1.0) - b.fractal(u, 0.5, 3, 1.0)).abs() > 1e-6
        });
        assert!(differs);
    }

    #[test]
    fn test_octave_cells() {
        assert_eq!(octave_cells(1.0, 0), 8);
        assert_eq!(octave_cells(1.0, 2), 32);
        assert_eq!(octave_cells(1.2, 0), 10);
        assert_eq!(octave_cells(0.0, 0), 1);
        assert_eq!(octave_cells(100.0, 8), LATTICE_PERIOD);
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }
}
