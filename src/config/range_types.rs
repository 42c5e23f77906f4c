use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Node jitter as a fraction of a lattice cell, constrained to [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct JitterAmount(f64);

impl JitterAmount {
    const MIN: f64 = 0.0;
    const MAX: f64 = 1.0;

    pub fn new(value: f64) -> Self {
        Self(clamp_or(value, Self::MIN, Self::MAX, Self::MIN))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for JitterAmount {
    fn default() -> Self {
        Self::new(0.35)
    }
}

/// Tunnel bend strength, constrained to [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct Curviness(f64);

impl Curviness {
    const MIN: f64 = 0.0;
    const MAX: f64 = 1.0;

    pub fn new(value: f64) -> Self {
        Self(clamp_or(value, Self::MIN, Self::MAX, Self::MIN))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Curviness {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Segments per curved tunnel path, constrained to [1, 1024]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
pub struct CurveSteps(u32);

impl CurveSteps {
    const MIN: u32 = 1;
    const MAX: u32 = 1024;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CurveSteps {
    fn default() -> Self {
        Self::new(20)
    }
}

/// Clamp, mapping NaN to `fallback`
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
