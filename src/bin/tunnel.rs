//! Simulates randomly arriving cars and pedestrians sharing a one-way tunnel.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossing::{Class, Coordinator, SimulationConfig, simulation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Cars spawned in each direction.
    #[arg(long, default_value_t = 100)]
    cars: usize,
    /// Pedestrians spawned.
    #[arg(long, default_value_t = 10)]
    pedestrians: usize,
    /// Mean seconds between two northbound cars.
    #[arg(long, default_value_t = 2.0)]
    north_interval: f64,
    /// Mean seconds between two southbound cars.
    #[arg(long, default_value_t = 2.0)]
    south_interval: f64,
    /// Mean seconds between two pedestrians.
    #[arg(long, default_value_t = 5.0)]
    pedestrian_interval: f64,
    /// Multiplier applied to every delay.
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,
    /// Seed of the random streams.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Builds the simulation configuration.
    fn config(&self) -> Result<SimulationConfig, String> {
        let mut config = SimulationConfig::default()
            .with_cars_per_direction(self.cars)
            .with_pedestrians(self.pedestrians)
            .with_time_scale(self.time_scale);
        for (class, secs) in [
            (Class::North, self.north_interval),
            (Class::South, self.south_interval),
            (Class::Pedestrian, self.pedestrian_interval),
        ] {
            let interval = Duration::try_from_secs_f64(secs)
                .map_err(|error| format!("invalid {class} interval {secs}: {error}"))?;
            config = config.with_interval(class, interval);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_thread_names(true))
        .init();

    let args = Args::parse();
    let config = match args.config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let coordinator = Coordinator::new();
    match simulation::run(&coordinator, &config) {
        Ok(report) => {
            println!("{report}");
            if report.final_state.is_vacant() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            tracing::error!(%error, "simulation aborted");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
