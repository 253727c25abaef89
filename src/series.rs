//! Multi-shot series runs.
//!
//! A series fires the same launch configuration several times. Shots differ
//! only through turbulence and, when the weather profile asks for it,
//! redrawn weather. Every shot derives its own seeds from one master seed,
//! which makes the sequential and the rayon-parallel runner produce
//! identical results.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispersion::{analyze, DispersionSummary, ImpactPoint};
use crate::error::{BallisticsError, Result};
use crate::inputs::{LaunchParameters, WeatherConditions};
use crate::trajectory_solver::{Termination, TrajectoryIntegrator, TrajectorySummary};
use crate::turbulence::{SeededTurbulence, TurbulenceLevel};
use crate::weather::WeatherProfile;

/// Golden-ratio increment used to spread shot seeds across the seed space
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
/// Separates the weather stream from the turbulence stream of a shot
const WEATHER_STREAM_SALT: u64 = 0xD1B5_4A32_D192_ED03;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub shots: usize,
    /// Drawn from OS entropy when absent; the value used is reported back.
    pub master_seed: Option<u64>,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            shots: 10,
            master_seed: None,
        }
    }
}

impl SeriesConfig {
    pub fn new(shots: usize) -> Self {
        Self {
            shots,
            master_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.master_seed = Some(seed);
        self
    }
}

/// Seed of the turbulence stream for shot `index`
pub fn derive_shot_seed(master_seed: u64, index: usize) -> u64 {
    master_seed.wrapping_add((index as u64).wrapping_add(1).wrapping_mul(SEED_STRIDE))
}

/// Outcome of one shot in a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotOutcome {
    pub index: usize,
    pub seed: u64,
    pub weather: WeatherConditions,
    pub turbulence_level: TurbulenceLevel,
    pub summary: TrajectorySummary,
}

impl ShotOutcome {
    pub fn landed(&self) -> bool {
        self.summary.termination == Termination::Landed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub master_seed: u64,
    pub shots: Vec<ShotOutcome>,
}

impl SeriesResult {
    /// Impact points of the shots that actually landed, in shot order.
    pub fn impact_points(&self) -> Vec<ImpactPoint> {
        self.shots
            .iter()
            .filter(|shot| shot.landed())
            .map(|shot| shot.summary.impact)
            .collect()
    }

    pub fn ceiling_hits(&self) -> usize {
        self.shots.iter().filter(|shot| !shot.landed()).count()
    }

    /// Grouping statistics over the landed shots.
    pub fn dispersion(&self) -> Result<DispersionSummary> {
        analyze(&self.impact_points())
    }
}

fn prepare(launch: &LaunchParameters, profile: &WeatherProfile, config: &SeriesConfig) -> Result<u64> {
    if config.shots == 0 {
        return Err(BallisticsError::invalid(
            "shots",
            0.0,
            "a series needs at least one shot",
        ));
    }
    launch.validate()?;
    profile.base.validate()?;

    let master_seed = config
        .master_seed
        .unwrap_or_else(|| StdRng::from_entropy().gen());
    debug!(shots = config.shots, master_seed, "starting series");
    Ok(master_seed)
}

fn simulate_shot(
    launch: &LaunchParameters,
    profile: &WeatherProfile,
    master_seed: u64,
    index: usize,
) -> Result<ShotOutcome> {
    let seed = derive_shot_seed(master_seed, index);
    let mut weather_rng = StdRng::seed_from_u64(seed ^ WEATHER_STREAM_SALT);
    let sample = profile.sample(&mut weather_rng);

    let mut shot_launch = launch.clone();
    if let Some(level) = sample.turbulence_override {
        shot_launch.turbulence_level = level;
    }
    let turbulence_level = shot_launch.turbulence_level;

    let integrator = TrajectoryIntegrator::new(shot_launch, sample.conditions.clone());
    let result = integrator.solve(&mut SeededTurbulence::new(seed))?;
    debug!(
        index,
        range = result.range(),
        landed = result.landed(),
        "series shot complete"
    );

    Ok(ShotOutcome {
        index,
        seed,
        weather: sample.conditions,
        turbulence_level,
        summary: result.summary(),
    })
}

/// Fire the series one shot after another.
pub fn run_series(
    launch: &LaunchParameters,
    profile: &WeatherProfile,
    config: &SeriesConfig,
) -> Result<SeriesResult> {
    let master_seed = prepare(launch, profile, config)?;
    let shots = (0..config.shots)
        .map(|index| simulate_shot(launch, profile, master_seed, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(SeriesResult { master_seed, shots })
}

/// Fire the series across the rayon thread pool.
///
/// Produces exactly the same shots as [`run_series`] for the same master seed.
pub fn run_series_parallel(
    launch: &LaunchParameters,
    profile: &WeatherProfile,
    config: &SeriesConfig,
) -> Result<SeriesResult> {
    let master_seed = prepare(launch, profile, config)?;
    let shots = (0..config.shots)
        .into_par_iter()
        .map(|index| simulate_shot(launch, profile, master_seed, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(SeriesResult { master_seed, shots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispersion::GroupingQuality;
    use crate::weather::RandomizedFields;

    fn launch() -> LaunchParameters {
        LaunchParameters {
            initial_speed: 250.0,
            elevation_angle: 35.0,
            azimuth_angle: 10.0,
            drag_coefficient: 0.3,
            mass: 8.0,
            caliber_diameter: 0.08,
            turbulence_level: TurbulenceLevel::Medium,
        }
    }

    #[test]
    fn test_shot_seeds_differ() {
        let a = derive_shot_seed(42, 0);
        let b = derive_shot_seed(42, 1);
        let c = derive_shot_seed(43, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, derive_shot_seed(42, 0));
    }

    #[test]
    fn test_series_is_reproducible() {
        let profile = WeatherProfile::default();
        let config = SeriesConfig::new(5).with_seed(1234);
        let first = run_series(&launch(), &profile, &config).unwrap();
        let second = run_series(&launch(), &profile, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.master_seed, 1234);
        assert_eq!(first.shots.len(), 5);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let profile = WeatherProfile::default().with_randomized(RandomizedFields::all());
        let config = SeriesConfig::new(12).with_seed(77);
        let sequential = run_series(&launch(), &profile, &config).unwrap();
        let parallel = run_series_parallel(&launch(), &profile, &config).unwrap();
        assert_eq!(sequential, parallel);
        for (i, shot) in parallel.shots.iter().enumerate() {
            assert_eq!(shot.index, i);
        }
    }

    #[test]
    fn test_turbulence_spreads_impacts() {
        let config = SeriesConfig::new(8).with_seed(9);
        let result = run_series(&launch(), &WeatherProfile::default(), &config).unwrap();
        let points = result.impact_points();
        assert_eq!(points.len(), 8);
        assert_eq!(result.ceiling_hits(), 0);

        let summary = result.dispersion().unwrap();
        assert_eq!(summary.shot_count, 8);
        assert!(summary.x.std_dev > 0.0);
        assert!(summary.z.std_dev > 0.0);
        // Turbulence alone keeps the group tight
        assert_eq!(summary.quality, GroupingQuality::High);
    }

    #[test]
    fn test_randomized_turbulence_overrides_level() {
        let profile = WeatherProfile::default().with_randomized(RandomizedFields {
            turbulence: true,
            ..Default::default()
        });
        let config = SeriesConfig::new(30).with_seed(3);
        let result = run_series(&launch(), &profile, &config).unwrap();
        let distinct: std::collections::HashSet<_> =
            result.shots.iter().map(|s| s.turbulence_level).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_single_shot_series_has_no_dispersion() {
        let config = SeriesConfig::new(1).with_seed(1);
        let result = run_series(&launch(), &WeatherProfile::default(), &config).unwrap();
        assert!(result.dispersion().unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_invalid_series_inputs() {
        let profile = WeatherProfile::default();
        assert!(run_series(&launch(), &profile, &SeriesConfig::new(0)).is_err());

        let mut bad = launch();
        bad.mass = -2.0;
        let err = run_series_parallel(&bad, &profile, &SeriesConfig::new(3)).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_entropy_seed_is_reported() {
        let config = SeriesConfig::new(2);
        let result = run_series(&launch(), &WeatherProfile::default(), &config).unwrap();
        let replay = run_series(
            &launch(),
            &WeatherProfile::default(),
            &SeriesConfig::new(2).with_seed(result.master_seed),
        )
        .unwrap();
        assert_eq!(result, replay);
    }
}
