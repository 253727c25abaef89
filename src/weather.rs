//! Per-shot weather generation.
//!
//! A [`WeatherProfile`] holds fixed base conditions plus a flag per field.
//! Flagged fields are redrawn on every [`WeatherProfile::sample`] call, so a
//! series run sees fresh weather for each shot.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::inputs::WeatherConditions;
use crate::turbulence::TurbulenceLevel;

pub const RANDOM_WIND_SPEED_MPS: Range<f64> = 0.0..50.0;
pub const RANDOM_WIND_DIRECTION_DEG: Range<f64> = 0.0..360.0;
pub const RANDOM_TEMPERATURE_C: Range<f64> = -20.0..40.0;
pub const RANDOM_ALTITUDE_M: Range<f64> = 0.0..3000.0;

/// Which weather fields are redrawn per sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RandomizedFields {
    pub wind_speed: bool,
    pub wind_direction: bool,
    pub temperature: bool,
    pub altitude: bool,
    pub turbulence: bool,
}

impl RandomizedFields {
    pub fn all() -> Self {
        Self {
            wind_speed: true,
            wind_direction: true,
            temperature: true,
            altitude: true,
            turbulence: true,
        }
    }

    pub fn any(&self) -> bool {
        self.wind_speed || self.wind_direction || self.temperature || self.altitude || self.turbulence
    }
}

/// One drawn set of conditions for a single shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub conditions: WeatherConditions,
    /// Replaces the launch turbulence level when turbulence is randomized.
    pub turbulence_override: Option<TurbulenceLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherProfile {
    pub base: WeatherConditions,
    pub randomized: RandomizedFields,
}

impl WeatherProfile {
    pub fn fixed(base: WeatherConditions) -> Self {
        Self {
            base,
            randomized: RandomizedFields::default(),
        }
    }

    pub fn with_randomized(mut self, randomized: RandomizedFields) -> Self {
        self.randomized = randomized;
        self
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> WeatherSample {
        let mut conditions = self.base.clone();
        let flags = self.randomized;

        if flags.wind_speed {
            conditions.wind_speed = rng.gen_range(RANDOM_WIND_SPEED_MPS);
        }
        if flags.wind_direction {
            conditions.wind_direction = rng.gen_range(RANDOM_WIND_DIRECTION_DEG);
        }
        if flags.temperature {
            conditions.temperature = rng.gen_range(RANDOM_TEMPERATURE_C);
        }
        if flags.altitude {
            conditions.altitude = rng.gen_range(RANDOM_ALTITUDE_M);
        }
        let turbulence_override = if flags.turbulence {
            Some(TurbulenceLevel::ALL[rng.gen_range(0..TurbulenceLevel::ALL.len())])
        } else {
            None
        };

        WeatherSample {
            conditions,
            turbulence_override,
        }
    }
}
