//! # Ballistics Kernel
//!
//! Projectile trajectory integration with an environmental drag model, plus
//! dispersion statistics for a series of shots.
//!
//! ```
//! use ballistics_kernel::{integrate, LaunchParameters, WeatherConditions, SeededTurbulence};
//!
//! let launch = LaunchParameters::default();
//! let result = integrate(&launch, &WeatherConditions::calm(), &mut SeededTurbulence::new(1)).unwrap();
//! assert!(result.range() > 0.0);
//! ```

// Re-export the main types and functions
pub use dispersion::{analyze, AxisStatistics, DispersionSummary, GroupingQuality, ImpactPoint};
pub use error::{BallisticsError, Result};
pub use inputs::{LaunchParameters, WeatherConditions};
pub use records::{
    DispersionOutcome, LaunchRecord, MemoryResultStore, Preset, ResultStore, SeriesRecord,
};
pub use series::{
    derive_shot_seed, run_series, run_series_parallel, SeriesConfig, SeriesResult, ShotOutcome,
};
pub use trajectory_solver::{
    integrate, SimulationState, Termination, TrajectoryBounds, TrajectoryIntegrator,
    TrajectoryPoint, TrajectoryResult, TrajectorySummary,
};
pub use turbulence::{
    FixedTurbulence, NoTurbulence, SeededTurbulence, TurbulenceLevel, TurbulenceSource,
};
pub use weather::{RandomizedFields, WeatherProfile, WeatherSample};

// Module declarations
pub mod atmosphere;
pub mod constants;
pub mod dispersion;
mod error;
mod inputs;
pub mod records;
pub mod series;
mod trajectory_solver;
pub mod turbulence;
pub mod weather;
pub mod wind;
