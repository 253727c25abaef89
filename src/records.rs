//! Value objects handed to the persistence layer.
//!
//! The kernel never writes anything itself. It builds [`LaunchRecord`]s and
//! [`SeriesRecord`]s for a caller-provided [`ResultStore`], and reads launch
//! configurations back from [`Preset`]s.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::dispersion::DispersionSummary;
use crate::error::{BallisticsError, Result};
use crate::inputs::LaunchParameters;
use crate::series::SeriesResult;
use crate::trajectory_solver::{Termination, TrajectorySummary};
use crate::turbulence::TurbulenceLevel;

/// Random 128-bit identifier rendered as 32 hex digits
pub fn generate_id() -> String {
    let value: u128 = StdRng::from_entropy().gen();
    format!("{:032x}", value)
}

/// Seconds since the Unix epoch; 0 if the system clock is before 1970
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Named launch configuration as entered in the menus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default = "generate_id")]
    pub id: String,
    pub name: String,
    pub speed: f64,
    pub angle: f64,
    #[serde(default)]
    pub azimuth: f64,
    pub drag: f64,
    pub mass: f64,
    pub caliber_mm: f64,
    #[serde(default)]
    pub turbulence: TurbulenceLevel,
}

impl Preset {
    pub fn from_launch(name: impl Into<String>, launch: &LaunchParameters) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            speed: launch.initial_speed,
            angle: launch.elevation_angle,
            azimuth: launch.azimuth_angle,
            drag: launch.drag_coefficient,
            mass: launch.mass,
            caliber_mm: launch.caliber_mm(),
            turbulence: launch.turbulence_level,
        }
    }

    pub fn to_launch(&self) -> LaunchParameters {
        LaunchParameters::from_menu_units(
            self.speed,
            self.angle,
            self.azimuth,
            self.drag,
            self.mass,
            self.caliber_mm,
            self.turbulence,
        )
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Stored outcome of a single launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub id: String,
    pub preset_name: Option<String>,
    pub timestamp: u64,
    pub initial_speed: f64,
    pub elevation_angle: f64,
    pub azimuth_angle: f64,
    pub drag_coefficient: f64,
    pub mass: f64,
    pub caliber_mm: f64,
    pub flight_time: f64,
    pub max_distance: f64,
    pub max_height: f64,
    pub termination: Termination,
}

impl LaunchRecord {
    pub fn new(
        launch: &LaunchParameters,
        summary: &TrajectorySummary,
        preset_name: Option<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            preset_name,
            timestamp: unix_timestamp(),
            initial_speed: launch.initial_speed,
            elevation_angle: launch.elevation_angle,
            azimuth_angle: launch.azimuth_angle,
            drag_coefficient: launch.drag_coefficient,
            mass: launch.mass,
            caliber_mm: launch.caliber_mm(),
            flight_time: summary.time_of_flight,
            max_distance: summary.range,
            max_height: summary.max_height,
            termination: summary.termination,
        }
    }
}

/// Grouping outcome of a series, or why it could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DispersionOutcome {
    Summary(DispersionSummary),
    InsufficientData { landed_shots: usize },
}

/// Stored outcome of a series run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub id: String,
    pub timestamp: u64,
    pub master_seed: u64,
    pub shots: Vec<LaunchRecord>,
    pub ceiling_hits: usize,
    pub dispersion: DispersionOutcome,
}

impl SeriesRecord {
    /// Too few landed shots is recorded as an outcome; any other analysis
    /// error is returned.
    pub fn new(
        launch: &LaunchParameters,
        series: &SeriesResult,
        preset_name: Option<String>,
    ) -> Result<Self> {
        let dispersion = match series.dispersion() {
            Ok(summary) => DispersionOutcome::Summary(summary),
            Err(BallisticsError::InsufficientData { actual, .. }) => {
                DispersionOutcome::InsufficientData { landed_shots: actual }
            }
            Err(err) => return Err(err),
        };
        let shots = series
            .shots
            .iter()
            .map(|shot| LaunchRecord::new(launch, &shot.summary, preset_name.clone()))
            .collect();

        Ok(Self {
            id: generate_id(),
            timestamp: unix_timestamp(),
            master_seed: series.master_seed,
            shots,
            ceiling_hits: series.ceiling_hits(),
            dispersion,
        })
    }
}

/// Durable key-value storage for launch records, implemented by the host application.
pub trait ResultStore {
    /// Store a record. Returns `false` without overwriting when the id already exists.
    fn save(&mut self, record: LaunchRecord) -> bool;

    /// Remove a record by id. Returns `false` when it was not stored.
    fn delete(&mut self, id: &str) -> bool;

    fn list(&self) -> Vec<LaunchRecord>;
}

/// Volatile store keeping records in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    records: Vec<LaunchRecord>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LaunchRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

impl ResultStore for MemoryResultStore {
    fn save(&mut self, record: LaunchRecord) -> bool {
        if self.get(&record.id).is_some() {
            warn!(id = %record.id, "launch record already stored");
            return false;
        }
        self.records.push(record);
        true
    }

    fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    fn list(&self) -> Vec<LaunchRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispersion::ImpactPoint;
    use crate::inputs::WeatherConditions;
    use crate::series::ShotOutcome;

    fn summary() -> TrajectorySummary {
        TrajectorySummary {
            time_of_flight: 42.5,
            range: 8000.0,
            max_height: 2100.0,
            impact: ImpactPoint::new(0.0, 8000.0),
            impact_velocity: 210.0,
            termination: Termination::Landed,
        }
    }

    fn series_of(impacts: &[(ImpactPoint, Termination)]) -> SeriesResult {
        let shots = impacts
            .iter()
            .enumerate()
            .map(|(index, &(impact, termination))| ShotOutcome {
                index,
                seed: index as u64,
                weather: WeatherConditions::calm(),
                turbulence_level: TurbulenceLevel::Low,
                summary: TrajectorySummary { impact, termination, ..summary() },
            })
            .collect();
        SeriesResult { master_seed: 9, shots }
    }

    #[test]
    fn test_series_record_counts_landed_shots() {
        let series = series_of(&[
            (ImpactPoint::new(0.0, 8000.0), Termination::Landed),
            (ImpactPoint::new(0.0, 9000.0), Termination::TimeCeilingReached),
        ]);
        let record = SeriesRecord::new(&LaunchParameters::default(), &series, None).unwrap();
        assert_eq!(record.dispersion, DispersionOutcome::InsufficientData { landed_shots: 1 });
        assert_eq!(record.ceiling_hits, 1);
        assert_eq!(record.shots.len(), 2);
    }

    #[test]
    fn test_series_record_propagates_invalid_impacts() {
        let series = series_of(&[
            (ImpactPoint::new(f64::NAN, 8000.0), Termination::Landed),
            (ImpactPoint::new(0.0, 8010.0), Termination::Landed),
        ]);
        let err = SeriesRecord::new(&LaunchParameters::default(), &series, None).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_generate_id_format() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_preset_conversion() {
        let launch = LaunchParameters::from_menu_units(
            320.0, 40.0, 15.0, 0.28, 6.5, 57.0, TurbulenceLevel::High,
        );
        let preset = Preset::from_launch("field gun", &launch);
        assert_eq!(preset.name, "field gun");
        assert!((preset.caliber_mm - 57.0).abs() < 1e-9);

        let back = preset.to_launch();
        assert_eq!(back.turbulence_level, TurbulenceLevel::High);
        assert!((back.caliber_diameter - launch.caliber_diameter).abs() < 1e-12);
        assert_eq!(back.initial_speed, 320.0);
    }

    #[test]
    fn test_preset_from_minimal_json() {
        let json = r#"{"name":"mortar","speed":150.0,"angle":60.0,"drag":0.4,"mass":4.2,"caliber_mm":82.0}"#;
        let preset = Preset::from_json(json).unwrap();
        assert_eq!(preset.id.len(), 32);
        assert_eq!(preset.azimuth, 0.0);
        assert_eq!(preset.turbulence, TurbulenceLevel::Low);
        assert!(preset.to_launch().validate().is_ok());

        assert!(Preset::from_json("{\"name\":\"broken\"}").is_err());
    }

    #[test]
    fn test_launch_record_fields() {
        let launch = LaunchParameters::default();
        let record = LaunchRecord::new(&launch, &summary(), Some("default".to_string()));
        assert_eq!(record.flight_time, 42.5);
        assert_eq!(record.max_distance, 8000.0);
        assert_eq!(record.max_height, 2100.0);
        assert!((record.caliber_mm - 100.0).abs() < 1e-9);
        assert!(record.timestamp > 0);
        assert_eq!(record.preset_name.as_deref(), Some("default"));
    }

    #[test]
    fn test_memory_store_rejects_duplicates() {
        let mut store = MemoryResultStore::new();
        let record = LaunchRecord::new(&LaunchParameters::default(), &summary(), None);
        let id = record.id.clone();

        assert!(store.save(record.clone()));
        assert!(!store.save(record));
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());

        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_keeps_order() {
        let mut store = MemoryResultStore::new();
        let launch = LaunchParameters::default();
        let ids: Vec<String> = (0..3)
            .map(|_| {
                let record = LaunchRecord::new(&launch, &summary(), None);
                let id = record.id.clone();
                store.save(record);
                id
            })
            .collect();
        let listed: Vec<String> = store.list().into_iter().map(|r| r.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_record_serializes_to_json() {
        let record = LaunchRecord::new(&LaunchParameters::default(), &summary(), None);
        let json = serde_json::to_string(&record).unwrap();
        let back: LaunchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.termination, Termination::Landed);
        assert_eq!(back.max_distance, 8000.0);
    }
}
