//! Shot-grouping statistics over a batch of impact points.
//!
//! Each horizontal axis is summarized independently: mean, sample standard
//! deviation (n - 1 divisor), probable deviation and relative dispersion. The
//! two relative dispersions then decide the grouping verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    HIGH_GROUPING_THRESHOLD, MIN_DISPERSION_SAMPLES, PROBABLE_DEVIATION_FACTOR,
    SATISFACTORY_GROUPING_THRESHOLD,
};
use crate::error::{ensure_finite, BallisticsError, Result};

/// Horizontal landing coordinates of one shot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactPoint {
    pub x: f64,
    pub z: f64,
}

impl ImpactPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Statistics for one horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub probable_deviation: f64,
    /// Probable deviation divided by the absolute mean, so a group centred on
    /// the negative side of an axis is judged by its magnitude; 0 when the mean
    /// is exactly 0.
    pub relative_dispersion: f64,
}

impl AxisStatistics {
    fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();
        let probable_deviation = PROBABLE_DEVIATION_FACTOR * std_dev;

        // A zero mean has no meaningful scale. Reporting 0 here is a policy
        // choice rather than the limit of the ratio.
        let relative_dispersion = if mean == 0.0 {
            0.0
        } else {
            probable_deviation / mean.abs()
        };

        Self {
            mean,
            std_dev,
            probable_deviation,
            relative_dispersion,
        }
    }
}

/// Categorical verdict on how tightly the shots grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingQuality {
    High,
    Satisfactory,
    NeedsCorrection,
}

impl GroupingQuality {
    pub fn from_relative_dispersion(relative_x: f64, relative_z: f64) -> Self {
        if relative_x < HIGH_GROUPING_THRESHOLD && relative_z < HIGH_GROUPING_THRESHOLD {
            GroupingQuality::High
        } else if relative_x < SATISFACTORY_GROUPING_THRESHOLD
            && relative_z < SATISFACTORY_GROUPING_THRESHOLD
        {
            GroupingQuality::Satisfactory
        } else {
            GroupingQuality::NeedsCorrection
        }
    }
}

impl fmt::Display for GroupingQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            GroupingQuality::High => "high",
            GroupingQuality::Satisfactory => "satisfactory",
            GroupingQuality::NeedsCorrection => "needs correction",
        };
        write!(f, "{}", label)
    }
}

/// Grouping statistics for a batch of shots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionSummary {
    pub shot_count: usize,
    pub x: AxisStatistics,
    pub z: AxisStatistics,
    pub quality: GroupingQuality,
}

impl DispersionSummary {
    pub fn mean_impact(&self) -> ImpactPoint {
        ImpactPoint::new(self.x.mean, self.z.mean)
    }
}

/// Summarize the grouping of two or more impact points.
///
/// Fewer than two points yield [`BallisticsError::InsufficientData`] instead
/// of a summary with undefined deviations. Non-finite coordinates are rejected
/// with [`BallisticsError::InvalidParameter`].
pub fn analyze(points: &[ImpactPoint]) -> Result<DispersionSummary> {
    if points.len() < MIN_DISPERSION_SAMPLES {
        return Err(BallisticsError::InsufficientData {
            required: MIN_DISPERSION_SAMPLES,
            actual: points.len(),
        });
    }
    for point in points {
        ensure_finite("impact_point.x", point.x)?;
        ensure_finite("impact_point.z", point.z)?;
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let zs: Vec<f64> = points.iter().map(|p| p.z).collect();
    let x = AxisStatistics::from_samples(&xs);
    let z = AxisStatistics::from_samples(&zs);

    Ok(DispersionSummary {
        shot_count: points.len(),
        x,
        z,
        quality: GroupingQuality::from_relative_dispersion(
            x.relative_dispersion,
            z.relative_dispersion,
        ),
    })
}
