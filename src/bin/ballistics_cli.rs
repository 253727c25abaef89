use ballistics_kernel::{
    run_series, run_series_parallel, DispersionOutcome, LaunchParameters, LaunchRecord, Preset,
    RandomizedFields, SeededTurbulence, SeriesConfig, SeriesRecord, SeriesResult, TrajectoryIntegrator,
    TrajectoryResult, TurbulenceLevel, WeatherConditions, WeatherProfile,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ballistics")]
#[command(version)]
#[command(about = "Projectile trajectory and shot dispersion calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a single trajectory
    Trajectory {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        weather: WeatherArgs,

        /// Turbulence seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Full output (show all trajectory points)
        #[arg(long)]
        full: bool,
    },

    /// Fire a series of shots and analyze the grouping
    Series {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        weather: WeatherArgs,

        /// Number of shots
        #[arg(short = 'n', long, default_value = "10")]
        shots: usize,

        /// Master seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Spread the shots over all CPU cores
        #[arg(long)]
        parallel: bool,

        /// Weather fields redrawn for every shot
        #[arg(long, value_enum, value_delimiter = ',')]
        randomize: Vec<RandomField>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display kernel information
    Info,
}

#[derive(Args, Debug, Clone)]
struct LaunchArgs {
    /// Load launch settings from a JSON preset (overrides the launch flags)
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Initial velocity (m/s)
    #[arg(short = 'v', long, default_value = "500.0")]
    velocity: f64,

    /// Elevation angle (degrees)
    #[arg(short = 'a', long, default_value = "45.0")]
    angle: f64,

    /// Azimuth (degrees, 0 = North, 90 = East)
    #[arg(long, default_value = "0.0")]
    azimuth: f64,

    /// Drag coefficient
    #[arg(short = 'c', long, default_value = "0.3")]
    drag: f64,

    /// Mass (kg)
    #[arg(short = 'm', long, default_value = "10.0")]
    mass: f64,

    /// Caliber (millimeters)
    #[arg(short = 'd', long, default_value = "100.0")]
    caliber: f64,

    /// Turbulence level
    #[arg(long, default_value = "low")]
    turbulence: TurbulenceArg,
}

#[derive(Args, Debug, Clone)]
struct WeatherArgs {
    /// Wind speed (m/s)
    #[arg(long, default_value = "0.0")]
    wind_speed: f64,

    /// Wind direction (degrees the wind blows toward, 0 = North, 90 = East)
    #[arg(long, default_value = "0.0")]
    wind_direction: f64,

    /// Temperature (Celsius)
    #[arg(long, default_value = "15.0")]
    temperature: f64,

    /// Altitude (meters)
    #[arg(long, default_value = "0.0")]
    altitude: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TurbulenceArg {
    Low,
    Medium,
    High,
}

impl From<TurbulenceArg> for TurbulenceLevel {
    fn from(arg: TurbulenceArg) -> Self {
        match arg {
            TurbulenceArg::Low => TurbulenceLevel::Low,
            TurbulenceArg::Medium => TurbulenceLevel::Medium,
            TurbulenceArg::High => TurbulenceLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RandomField {
    WindSpeed,
    WindDirection,
    Temperature,
    Altitude,
    Turbulence,
    All,
}

fn randomized_fields(fields: &[RandomField]) -> RandomizedFields {
    if fields.contains(&RandomField::All) {
        return RandomizedFields::all();
    }
    RandomizedFields {
        wind_speed: fields.contains(&RandomField::WindSpeed),
        wind_direction: fields.contains(&RandomField::WindDirection),
        temperature: fields.contains(&RandomField::Temperature),
        altitude: fields.contains(&RandomField::Altitude),
        turbulence: fields.contains(&RandomField::Turbulence),
    }
}

#[derive(Debug, Serialize)]
struct TrajectoryPointOut {
    time: f64,
    x: f64,
    y: f64,
    z: f64,
    velocity: f64,
}

#[derive(Debug, Serialize)]
struct TrajectoryOut {
    record: LaunchRecord,
    landed: bool,
    air_density: f64,
    impact_x: f64,
    impact_z: f64,
    trajectory: Vec<TrajectoryPointOut>,
}

impl LaunchArgs {
    fn resolve(&self) -> Result<(LaunchParameters, Option<String>), Box<dyn Error>> {
        match &self.preset {
            Some(path) => {
                let preset = Preset::from_json(&fs::read_to_string(path)?)?;
                Ok((preset.to_launch(), Some(preset.name)))
            }
            None => Ok((
                LaunchParameters::from_menu_units(
                    self.velocity,
                    self.angle,
                    self.azimuth,
                    self.drag,
                    self.mass,
                    self.caliber,
                    self.turbulence.into(),
                ),
                None,
            )),
        }
    }
}

impl From<&WeatherArgs> for WeatherConditions {
    fn from(args: &WeatherArgs) -> Self {
        WeatherConditions {
            wind_speed: args.wind_speed,
            wind_direction: args.wind_direction,
            temperature: args.temperature,
            altitude: args.altitude,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Trajectory { launch, weather, seed, output, full } => {
            let (params, preset_name) = launch.resolve()?;
            let mut turbulence = match seed {
                Some(seed) => SeededTurbulence::new(seed),
                None => SeededTurbulence::from_entropy(),
            };

            let solver = TrajectoryIntegrator::new(params.clone(), WeatherConditions::from(&weather));
            let result = solver.solve(&mut turbulence)?;
            let record = LaunchRecord::new(&params, &result.summary(), preset_name);

            display_trajectory(&result, record, output, full)?;
        }

        Commands::Series { launch, weather, shots, seed, parallel, randomize, output } => {
            let (params, preset_name) = launch.resolve()?;
            let profile = WeatherProfile::fixed(WeatherConditions::from(&weather))
                .with_randomized(randomized_fields(&randomize));
            let config = SeriesConfig {
                shots,
                master_seed: seed,
            };

            let series = if parallel {
                run_series_parallel(&params, &profile, &config)?
            } else {
                run_series(&params, &profile, &config)?
            };
            let record = SeriesRecord::new(&params, &series, preset_name)?;

            display_series(&series, &record, output)?;
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║        BALLISTICS KERNEL v{:<8}     ║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Fixed-step trajectory integration      ║");
            println!("║ with environmental drag.               ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Quadratic drag, 0.01 s Euler step    ║");
            println!("║ • Temperature/altitude air density     ║");
            println!("║ • Wind and seeded turbulence           ║");
            println!("║ • Series dispersion statistics         ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_trajectory(
    result: &TrajectoryResult,
    record: LaunchRecord,
    format: OutputFormat,
    full: bool,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            let impact = result.impact_point();
            let out = TrajectoryOut {
                record,
                landed: result.landed(),
                air_density: result.air_density,
                impact_x: impact.x,
                impact_z: impact.z,
                trajectory: if full {
                    result
                        .points
                        .iter()
                        .map(|p| TrajectoryPointOut {
                            time: p.time,
                            x: p.position.x,
                            y: p.position.y,
                            z: p.position.z,
                            velocity: p.velocity_magnitude,
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        OutputFormat::Csv => {
            println!("time,x,y,z,velocity");
            for p in &result.points {
                println!(
                    "{:.2},{:.3},{:.3},{:.3},{:.3}",
                    p.time, p.position.x, p.position.y, p.position.z, p.velocity_magnitude
                );
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         TRAJECTORY RESULTS             ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Range:             {:>10.2} m        ║", record.max_distance);
            println!("║ Max Height:        {:>10.2} m        ║", record.max_height);
            println!("║ Time of Flight:    {:>10.2} s        ║", record.flight_time);
            println!("║ Impact Velocity:   {:>10.2} m/s      ║", result.impact_velocity());
            println!("║ Air Density:       {:>10.4} kg/m³    ║", result.air_density);
            println!("╚════════════════════════════════════════╝");
            if !result.landed() {
                println!("WARNING: flight time ceiling reached before impact");
            }

            println!("\nTrajectory Points:");
            println!("┌──────────┬────────────┬────────────┬────────────┬──────────┐");
            println!("│ Time (s) │   X (m)    │   Y (m)    │   Z (m)    │ Vel(m/s) │");
            println!("├──────────┼────────────┼────────────┼────────────┼──────────┤");
            let step = if full { 1 } else { (result.points.len() / 10).max(1) };
            for (i, p) in result.points.iter().enumerate() {
                if i % step == 0 || i == result.points.len() - 1 {
                    println!(
                        "│ {:>8.2} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>8.2} │",
                        p.time, p.position.x, p.position.y, p.position.z, p.velocity_magnitude
                    );
                }
            }
            println!("└──────────┴────────────┴────────────┴────────────┴──────────┘");
        }
    }

    Ok(())
}

fn display_series(
    series: &SeriesResult,
    record: &SeriesRecord,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }

        OutputFormat::Csv => {
            println!("shot,seed,turbulence,flight_time,range,max_height,impact_x,impact_z,landed");
            for shot in &series.shots {
                let s = &shot.summary;
                println!(
                    "{},{},{},{:.2},{:.3},{:.3},{:.3},{:.3},{}",
                    shot.index + 1,
                    shot.seed,
                    shot.turbulence_level,
                    s.time_of_flight,
                    s.range,
                    s.max_height,
                    s.impact.x,
                    s.impact.z,
                    shot.landed()
                );
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║          SERIES SIMULATION             ║");
            println!("║ Shots: {:>6}   Seed: {:>16} ║", series.shots.len(), series.master_seed);
            println!("╠════════════════════════════════════════╣");
            match &record.dispersion {
                DispersionOutcome::Summary(summary) => {
                    println!("║ Mean Impact X:     {:>10.2} m        ║", summary.x.mean);
                    println!("║ Mean Impact Z:     {:>10.2} m        ║", summary.z.mean);
                    println!("║ Std Dev X:         {:>10.3} m        ║", summary.x.std_dev);
                    println!("║ Std Dev Z:         {:>10.3} m        ║", summary.z.std_dev);
                    println!("║ Probable Dev X:    {:>10.3} m        ║", summary.x.probable_deviation);
                    println!("║ Probable Dev Z:    {:>10.3} m        ║", summary.z.probable_deviation);
                    println!("║ Relative Disp X:   {:>10.5}          ║", summary.x.relative_dispersion);
                    println!("║ Relative Disp Z:   {:>10.5}          ║", summary.z.relative_dispersion);
                    println!("╠════════════════════════════════════════╣");
                    println!("║ Grouping: {:<28} ║", summary.quality.to_string());
                }
                DispersionOutcome::InsufficientData { landed_shots } => {
                    println!("║ Insufficient data: {:>3} landed shot(s)  ║", landed_shots);
                }
            }
            println!("╚════════════════════════════════════════╝");
            if record.ceiling_hits > 0 {
                println!(
                    "WARNING: {} shot(s) reached the flight time ceiling",
                    record.ceiling_hits
                );
            }
        }
    }

    Ok(())
}
