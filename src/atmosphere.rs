//! Atmospheric calculations for the drag model.
//!
//! Density follows a simple ideal-gas temperature correction around a 15°C
//! baseline combined with an exponential falloff in altitude.

use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, CELSIUS_TO_KELVIN, DENSITY_SCALE_HEIGHT_M, REFERENCE_TEMPERATURE_K,
};
use std::f64::consts::PI;

/// Calculate air density for the given conditions.
///
/// `rho = 1.225 * (288.15 / (273.15 + T)) * exp(-h / 8500)`
///
/// # Arguments
/// * `temperature_c` - Air temperature in Celsius
/// * `altitude_m` - Altitude above the reference level in meters
///
/// # Returns
/// Air density in kg/m³
pub fn air_density(temperature_c: f64, altitude_m: f64) -> f64 {
    AIR_DENSITY_SEA_LEVEL * temperature_factor(temperature_c) * altitude_factor(altitude_m)
}

/// Density ratio contributed by temperature alone (1.0 at 15°C)
pub fn temperature_factor(temperature_c: f64) -> f64 {
    REFERENCE_TEMPERATURE_K / (CELSIUS_TO_KELVIN + temperature_c)
}

/// Density ratio contributed by altitude alone (1.0 at the reference level)
pub fn altitude_factor(altitude_m: f64) -> f64 {
    (-altitude_m / DENSITY_SCALE_HEIGHT_M).exp()
}

/// Frontal area of a round projectile from its caliber in meters
pub fn cross_sectional_area(caliber_m: f64) -> f64 {
    let radius = caliber_m / 2.0;
    PI * radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_conditions() {
        let rho = air_density(15.0, 0.0);
        assert!((rho - 1.225).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_reduces_density() {
        let sea = air_density(15.0, 0.0);
        let high = air_density(15.0, 3000.0);
        assert!(high < sea);
        // One scale height divides density by e
        let scale = air_density(15.0, 8500.0);
        assert!((scale - sea / std::f64::consts::E).abs() < 1e-9);
    }

    #[test]
    fn test_heat_reduces_density() {
        assert!(air_density(40.0, 0.0) < air_density(15.0, 0.0));
        assert!(air_density(-20.0, 0.0) > air_density(15.0, 0.0));
    }

    #[test]
    fn test_cross_sectional_area() {
        // 100 mm caliber
        let area = cross_sectional_area(0.1);
        assert!((area - 0.007853981633974483).abs() < 1e-12);
        assert_eq!(cross_sectional_area(0.0), 0.0);
    }
}
