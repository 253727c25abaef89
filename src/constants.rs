/// Physical and numerical constants used by the trajectory kernel

/// Gravitational acceleration in m/s², applied to the vertical axis only
pub const G_ACCEL_MPS2: f64 = 9.81;

/// Air density at sea level and 15°C (kg/m³)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225;

/// Reference temperature of the density correction, 15°C in Kelvin
///
/// The correction scales density by `T_ref / T`, so a warmer day yields
/// thinner air. This baseline is fixed and not configurable.
pub const REFERENCE_TEMPERATURE_K: f64 = 288.15;

/// Offset between Celsius and Kelvin
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Scale height of the exponential altitude correction (m)
pub const DENSITY_SCALE_HEIGHT_M: f64 = 8500.0;

/// Conversion factor: millimeters to meters
pub const MM_TO_M: f64 = 0.001;

// Integration constants

/// Fixed explicit-Euler time step (s)
///
/// Results are only reproducible at a given step size, so the step is
/// never adapted during a run.
pub const TIME_STEP_S: f64 = 0.01;

/// Safety ceiling on simulated flight time (s)
pub const MAX_FLIGHT_TIME_S: f64 = 200.0;

/// Relative air speed below which drag is skipped (m/s)
///
/// Normalizing the relative velocity below this magnitude would divide by
/// a near-zero value.
pub const MIN_RELATIVE_SPEED_MPS: f64 = 1e-3;

// Dispersion constants

/// Ratio between probable deviation and standard deviation of a normal distribution
pub const PROBABLE_DEVIATION_FACTOR: f64 = 0.6745;

/// Minimum number of impact points for a dispersion summary
pub const MIN_DISPERSION_SAMPLES: usize = 2;

/// Relative dispersion below which a group is rated high quality
pub const HIGH_GROUPING_THRESHOLD: f64 = 0.05;

/// Relative dispersion below which a group is rated satisfactory
pub const SATISFACTORY_GROUPING_THRESHOLD: f64 = 0.1;
