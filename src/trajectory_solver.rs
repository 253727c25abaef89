//! Fixed-step trajectory integration.
//!
//! Explicit Euler integration of a point-mass projectile under gravity and
//! quadratic drag relative to a moving air mass. The step size is fixed so
//! that results are reproducible for a given step and random source.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atmosphere::{air_density, cross_sectional_area};
use crate::constants::{G_ACCEL_MPS2, MAX_FLIGHT_TIME_S, MIN_RELATIVE_SPEED_MPS, TIME_STEP_S};
use crate::dispersion::ImpactPoint;
use crate::error::{BallisticsError, Result};
use crate::inputs::{LaunchParameters, WeatherConditions};
use crate::turbulence::TurbulenceSource;
use crate::wind::wind_vector;

/// How an integration run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The projectile crossed the ground plane (y <= 0).
    Landed,
    /// The flight time ceiling was reached before landing. Not a failure, but
    /// the parameter combination is physically implausible.
    TimeCeilingReached,
}

/// Mutable kinematic state, owned by a single run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub steps: u64,
}

impl SimulationState {
    fn at_origin(velocity: Vector3<f64>) -> Self {
        Self {
            position: Vector3::zeros(),
            velocity,
            steps: 0,
        }
    }

    pub fn elapsed(&self, time_step: f64) -> f64 {
        self.steps as f64 * time_step
    }
}

// Sampled trajectory point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub position: Vector3<f64>,
    pub velocity_magnitude: f64,
}

/// Axis-aligned extent of a sampled path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryBounds {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl TrajectoryBounds {
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

// Trajectory result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub points: Vec<TrajectoryPoint>,
    pub time_of_flight: f64,
    pub max_height: f64,
    pub final_position: Vector3<f64>,
    pub termination: Termination,
    pub time_step: f64,
    pub air_density: f64,
}

impl TrajectoryResult {
    /// Horizontal distance from the launch point to the final position
    pub fn range(&self) -> f64 {
        self.final_position.x.hypot(self.final_position.z)
    }

    pub fn impact_point(&self) -> ImpactPoint {
        ImpactPoint::new(self.final_position.x, self.final_position.z)
    }

    pub fn landed(&self) -> bool {
        self.termination == Termination::Landed
    }

    pub fn impact_velocity(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.velocity_magnitude)
    }

    /// Extent of the path, including the launch point at the origin.
    pub fn bounds(&self) -> TrajectoryBounds {
        let mut min = Vector3::zeros();
        let mut max = Vector3::zeros();
        for point in &self.points {
            min = min.inf(&point.position);
            max = max.sup(&point.position);
        }
        TrajectoryBounds { min, max }
    }

    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary {
            time_of_flight: self.time_of_flight,
            range: self.range(),
            max_height: self.max_height,
            impact: self.impact_point(),
            impact_velocity: self.impact_velocity(),
            termination: self.termination,
        }
    }
}

/// Scalar outcome of a run, without the sampled path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub time_of_flight: f64,
    pub range: f64,
    pub max_height: f64,
    pub impact: ImpactPoint,
    pub impact_velocity: f64,
    pub termination: Termination,
}

// Trajectory integrator
#[derive(Debug, Clone)]
pub struct TrajectoryIntegrator {
    launch: LaunchParameters,
    weather: WeatherConditions,
    time_step: f64,
    max_flight_time: f64,
}

impl TrajectoryIntegrator {
    pub fn new(launch: LaunchParameters, weather: WeatherConditions) -> Self {
        Self {
            launch,
            weather,
            time_step: TIME_STEP_S,
            max_flight_time: MAX_FLIGHT_TIME_S,
        }
    }

    pub fn set_time_step(&mut self, step: f64) {
        self.time_step = step;
    }

    pub fn set_max_flight_time(&mut self, seconds: f64) {
        self.max_flight_time = seconds;
    }

    fn validate(&self) -> Result<()> {
        self.launch.validate()?;
        self.weather.validate()?;
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(BallisticsError::invalid(
                "time_step",
                self.time_step,
                "must be a positive finite number",
            ));
        }
        if !(self.max_flight_time.is_finite() && self.max_flight_time > 0.0) {
            return Err(BallisticsError::invalid(
                "max_flight_time",
                self.max_flight_time,
                "must be a positive finite number",
            ));
        }
        Ok(())
    }

    /// Initial velocity from speed, elevation and azimuth (y is up, azimuth 0 is +z).
    fn launch_velocity(&self) -> Vector3<f64> {
        let elevation = self.launch.elevation_angle.to_radians();
        let azimuth = self.launch.azimuth_angle.to_radians();
        let horizontal = self.launch.initial_speed * elevation.cos();
        Vector3::new(
            horizontal * azimuth.sin(),
            self.launch.initial_speed * elevation.sin(),
            horizontal * azimuth.cos(),
        )
    }

    /// Integrate until ground contact or the flight time ceiling.
    pub fn solve<T: TurbulenceSource + ?Sized>(&self, turbulence: &mut T) -> Result<TrajectoryResult> {
        self.validate()?;

        let density = air_density(self.weather.temperature, self.weather.altitude);
        let area = cross_sectional_area(self.launch.caliber_diameter);
        let wind = wind_vector(self.weather.wind_speed, self.weather.wind_direction);
        // Everything in the drag force except the turbulence multiplier and v²
        let drag_constant = 0.5 * self.launch.drag_coefficient * density * area;
        // The tolerance keeps 200 / 0.01 at 20000 steps despite binary rounding
        let max_steps = ((self.max_flight_time / self.time_step) - 1e-9).ceil().max(1.0) as u64;

        debug!(
            air_density = density,
            area,
            max_steps,
            "starting trajectory integration"
        );

        let mut state = SimulationState::at_origin(self.launch_velocity());
        let mut points = Vec::with_capacity(max_steps.min(4096) as usize);
        let mut max_height: f64 = 0.0;

        let termination = loop {
            let acceleration = self.acceleration(&state.velocity, &wind, drag_constant, turbulence);

            state.velocity += acceleration * self.time_step;
            state.position += state.velocity * self.time_step;
            state.steps += 1;

            let time = state.elapsed(self.time_step);
            points.push(TrajectoryPoint {
                time,
                position: state.position,
                velocity_magnitude: state.velocity.norm(),
            });
            max_height = max_height.max(state.position.y);

            if state.position.y <= 0.0 {
                break Termination::Landed;
            }
            if state.steps >= max_steps {
                break Termination::TimeCeilingReached;
            }
        };

        let time_of_flight = state.elapsed(self.time_step);
        match termination {
            Termination::Landed => debug!(
                steps = state.steps,
                time_of_flight,
                "projectile landed"
            ),
            Termination::TimeCeilingReached => warn!(
                time_of_flight,
                height = state.position.y,
                "flight time ceiling reached before landing"
            ),
        }

        Ok(TrajectoryResult {
            points,
            time_of_flight,
            max_height,
            final_position: state.position,
            termination,
            time_step: self.time_step,
            air_density: density,
        })
    }

    fn acceleration<T: TurbulenceSource + ?Sized>(
        &self,
        velocity: &Vector3<f64>,
        wind: &Vector3<f64>,
        drag_constant: f64,
        turbulence: &mut T,
    ) -> Vector3<f64> {
        let gravity = Vector3::new(0.0, -G_ACCEL_MPS2, 0.0);

        let relative_velocity = velocity - wind;
        let relative_speed = relative_velocity.norm();
        if relative_speed < MIN_RELATIVE_SPEED_MPS {
            return gravity;
        }

        let drag_force = drag_constant
            * relative_speed
            * relative_speed
            * turbulence.drag_factor(self.launch.turbulence_level);
        let drag_acceleration = drag_force / self.launch.mass;

        gravity - relative_velocity * (drag_acceleration / relative_speed)
    }
}

/// Integrate one trajectory with the default step and ceiling.
pub fn integrate<T: TurbulenceSource + ?Sized>(
    launch: &LaunchParameters,
    weather: &WeatherConditions,
    turbulence: &mut T,
) -> Result<TrajectoryResult> {
    TrajectoryIntegrator::new(launch.clone(), weather.clone()).solve(turbulence)
}
