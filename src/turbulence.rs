//! Turbulence model and its injectable random source.
//!
//! Every integration step multiplies the drag force by `1 + u`, where `u` is
//! drawn uniformly from `[0, bound)` and `bound` depends on the turbulence
//! level. The draw goes through [`TurbulenceSource`] so callers decide
//! whether a run is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical bound on the per-step drag perturbation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurbulenceLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl TurbulenceLevel {
    pub const ALL: [TurbulenceLevel; 3] = [
        TurbulenceLevel::Low,
        TurbulenceLevel::Medium,
        TurbulenceLevel::High,
    ];

    /// Upper bound of the uniform perturbation added to the drag multiplier
    pub fn bound(self) -> f64 {
        match self {
            TurbulenceLevel::Low => 0.1,
            TurbulenceLevel::Medium => 0.3,
            TurbulenceLevel::High => 0.6,
        }
    }
}

impl fmt::Display for TurbulenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TurbulenceLevel::Low => "low",
            TurbulenceLevel::Medium => "medium",
            TurbulenceLevel::High => "high",
        };
        write!(f, "{}", name)
    }
}

/// Source of the uniform draws behind the turbulence multiplier.
pub trait TurbulenceSource {
    /// Draw a value in `[0, upper]`. Random sources never return `upper`
    /// itself; deterministic ones may.
    fn uniform(&mut self, upper: f64) -> f64;

    /// Drag multiplier for one step at the given level.
    fn drag_factor(&mut self, level: TurbulenceLevel) -> f64 {
        1.0 + self.uniform(level.bound())
    }
}

impl<T: TurbulenceSource + ?Sized> TurbulenceSource for &mut T {
    fn uniform(&mut self, upper: f64) -> f64 {
        (**self).uniform(upper)
    }
}

impl<T: TurbulenceSource + ?Sized> TurbulenceSource for Box<T> {
    fn uniform(&mut self, upper: f64) -> f64 {
        (**self).uniform(upper)
    }
}

/// Seedable pseudo-random turbulence
#[derive(Debug, Clone)]
pub struct SeededTurbulence {
    seed: Option<u64>,
    rng: StdRng,
}

impl SeededTurbulence {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl TurbulenceSource for SeededTurbulence {
    fn uniform(&mut self, upper: f64) -> f64 {
        if upper <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..upper)
    }
}

/// Still air: the drag multiplier is always exactly 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTurbulence;

impl TurbulenceSource for NoTurbulence {
    fn uniform(&mut self, _upper: f64) -> f64 {
        0.0
    }
}

/// Constant draw at a fixed fraction of the bound, clamped to `[0, 1]`.
///
/// A fraction of 1 returns the bound exactly, the worst-case drag multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedTurbulence {
    fraction: f64,
}

impl FixedTurbulence {
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        Self { fraction }
    }
}

impl TurbulenceSource for FixedTurbulence {
    fn uniform(&mut self, upper: f64) -> f64 {
        upper * self.fraction
    }
}
