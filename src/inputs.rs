// Launch and environment inputs for a single simulation run
use crate::constants::MM_TO_M;
use crate::error::{ensure_finite, BallisticsError, Result};
use crate::turbulence::TurbulenceLevel;
use serde::{Deserialize, Serialize};

// Projectile and launch configuration, immutable for the duration of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    pub initial_speed: f64,     // m/s
    pub elevation_angle: f64,   // degrees above the horizon
    pub azimuth_angle: f64,     // degrees, compass bearing of the shot
    pub drag_coefficient: f64,  // dimensionless
    pub mass: f64,              // kg
    pub caliber_diameter: f64,  // meters
    pub turbulence_level: TurbulenceLevel,
}

impl Default for LaunchParameters {
    fn default() -> Self {
        Self {
            initial_speed: 500.0,
            elevation_angle: 45.0,
            azimuth_angle: 0.0,
            drag_coefficient: 0.3,
            mass: 10.0,
            caliber_diameter: 0.1,
            turbulence_level: TurbulenceLevel::Low,
        }
    }
}

impl LaunchParameters {
    /// Build parameters from menu units, where the caliber is given in millimeters.
    pub fn from_menu_units(
        initial_speed: f64,
        elevation_angle: f64,
        azimuth_angle: f64,
        drag_coefficient: f64,
        mass: f64,
        caliber_mm: f64,
        turbulence_level: TurbulenceLevel,
    ) -> Self {
        Self {
            initial_speed,
            elevation_angle,
            azimuth_angle,
            drag_coefficient,
            mass,
            caliber_diameter: caliber_mm * MM_TO_M,
            turbulence_level,
        }
    }

    pub fn caliber_mm(&self) -> f64 {
        self.caliber_diameter / MM_TO_M
    }

    /// Reject inputs that would make the integration produce NaN or infinities.
    ///
    /// The elevation angle is not restricted to [0, 90]; out-of-range angles
    /// are still physically meaningful directions.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("initial_speed", self.initial_speed)?;
        ensure_finite("elevation_angle", self.elevation_angle)?;
        ensure_finite("azimuth_angle", self.azimuth_angle)?;
        ensure_finite("drag_coefficient", self.drag_coefficient)?;
        ensure_finite("mass", self.mass)?;
        ensure_finite("caliber_diameter", self.caliber_diameter)?;

        if self.initial_speed < 0.0 {
            return Err(BallisticsError::invalid(
                "initial_speed",
                self.initial_speed,
                "must not be negative",
            ));
        }
        if self.drag_coefficient < 0.0 {
            return Err(BallisticsError::invalid(
                "drag_coefficient",
                self.drag_coefficient,
                "must not be negative",
            ));
        }
        if self.mass <= 0.0 {
            return Err(BallisticsError::invalid("mass", self.mass, "must be greater than zero"));
        }
        if self.caliber_diameter <= 0.0 {
            return Err(BallisticsError::invalid(
                "caliber_diameter",
                self.caliber_diameter,
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// Environment around the launch site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub wind_speed: f64,      // m/s
    pub wind_direction: f64,  // degrees, bearing the air moves toward
    pub temperature: f64,     // Celsius
    pub altitude: f64,        // meters, density correction only
}

impl Default for WeatherConditions {
    fn default() -> Self {
        Self {
            wind_speed: 0.0,
            wind_direction: 0.0,
            temperature: 15.0,
            altitude: 0.0,
        }
    }
}

impl WeatherConditions {
    pub fn calm() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("wind_speed", self.wind_speed)?;
        ensure_finite("wind_direction", self.wind_direction)?;
        ensure_finite("temperature", self.temperature)?;
        ensure_finite("altitude", self.altitude)?;

        if self.wind_speed < 0.0 {
            return Err(BallisticsError::invalid(
                "wind_speed",
                self.wind_speed,
                "must not be negative",
            ));
        }
        // The density formula divides by the absolute temperature
        if self.temperature <= -crate::constants::CELSIUS_TO_KELVIN {
            return Err(BallisticsError::invalid(
                "temperature",
                self.temperature,
                "must be above absolute zero",
            ));
        }
        Ok(())
    }
}
