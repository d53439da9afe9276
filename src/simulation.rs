//! Simulation harness driving a [`Coordinator`] with randomly arriving cars and pedestrians.
//!
//! Each class has an arrival source that spawns one thread per entity at exponentially
//! distributed intervals. An entity requests entry, spends a uniformly distributed traversal time
//! on the crossing outside the coordinator lock, and then releases the crossing.

use std::fmt;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Class, Coordinator, CrossingState, Error, SimulationConfig};

/// Outcome of a simulation run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    /// Seed the random streams were derived from.
    pub seed: u64,
    /// Number of entities of each class that entered and left the crossing, in [`Class::ALL`]
    /// order.
    pub crossed: [usize; 3],
    /// Occupant counters after every entity has finished.
    pub final_state: CrossingState,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl Report {
    /// Returns the number of entities of the class that crossed.
    #[inline]
    #[must_use]
    pub const fn crossed(&self, class: Class) -> usize {
        self.crossed[class.index()]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed: {}", self.seed)?;
        for class in Class::ALL {
            writeln!(f, "{}: {} crossed", class.label(), self.crossed(class))?;
        }
        write!(
            f,
            "elapsed: {:.3}s, vacant at shutdown: {}",
            self.elapsed.as_secs_f64(),
            self.final_state.is_vacant()
        )
    }
}

/// Runs the simulation described by the configuration against the coordinator.
///
/// Returns once every spawned entity has left the crossing.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a thread cannot be spawned, an entity
/// panics, or an entity release is rejected by the coordinator.
///
/// # Examples
///
/// ```
/// use crossing::{Class, Coordinator, SimulationConfig, simulation};
///
/// let coordinator = Coordinator::default();
/// let config = SimulationConfig::default()
///     .with_cars_per_direction(4)
///     .with_pedestrians(2)
///     .with_time_scale(0.0001);
///
/// let report = simulation::run(&coordinator, &config).unwrap();
/// assert_eq!(report.crossed(Class::North), 4);
/// assert!(report.final_state.is_vacant());
/// ```
pub fn run(coordinator: &Coordinator, config: &SimulationConfig) -> Result<Report, Error> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        cars_per_direction = config.cars_per_direction,
        pedestrians = config.pedestrians,
        time_scale = config.time_scale,
        "starting simulation"
    );

    let started = Instant::now();
    let crossed = thread::scope(|scope| -> Result<[usize; 3], Error> {
        let mut sources = Vec::with_capacity(Class::ALL.len());
        for class in Class::ALL {
            let rng = StdRng::seed_from_u64(seed.wrapping_add(class.index() as u64));
            let source = thread::Builder::new()
                .name(format!("{}-arrivals", class.label()))
                .spawn_scoped(scope, move || generate(scope, coordinator, config, class, rng))?;
            sources.push((class, source));
        }

        let mut crossed = [0; 3];
        let mut result = Ok(());
        for (class, source) in sources {
            let outcome = source
                .join()
                .unwrap_or(Err(Error::EntityPanicked { class, id: 0 }));
            match outcome {
                Ok(count) => crossed[class.index()] = count,
                Err(error) => result = result.and(Err(error)),
            }
        }
        result.map(|()| crossed)
    })?;

    let final_state = coordinator.snapshot();
    if !final_state.is_vacant() {
        tracing::error!(?final_state, "crossing occupied after every entity finished");
    }
    let report = Report {
        seed,
        crossed,
        final_state,
        elapsed: started.elapsed(),
    };
    tracing::info!(elapsed = ?report.elapsed, "simulation finished");
    Ok(report)
}

/// Spawns the entities of the class at random intervals and waits for all of them.
///
/// Returns the number of entities that crossed.
fn generate<'scope>(
    scope: &'scope Scope<'scope, '_>,
    coordinator: &'scope Coordinator,
    config: &'scope SimulationConfig,
    class: Class,
    mut rng: StdRng,
) -> Result<usize, Error> {
    let mut entities: Vec<(usize, ScopedJoinHandle<'scope, Result<(), Error>>)> = Vec::new();
    let mut result = Ok(());
    for id in 1..=config.population(class) {
        let traversal = config.scaled(rng.gen_range(config.traversal(class).clone()));
        let spawned = thread::Builder::new()
            .name(format!("{}-{id}", class.label()))
            .spawn_scoped(scope, move || cross(coordinator, class, id, traversal));
        match spawned {
            Ok(entity) => entities.push((id, entity)),
            Err(error) => {
                result = Err(Error::Spawn(error));
                break;
            }
        }
        thread::sleep(config.scaled(exponential(&mut rng, config.interval(class))));
    }

    let mut crossed = 0;
    for (id, entity) in entities {
        match entity.join() {
            Ok(Ok(())) => crossed += 1,
            Ok(Err(error)) => result = result.and(Err(error)),
            Err(_) => result = result.and(Err(Error::EntityPanicked { class, id })),
        }
    }
    result.map(|()| crossed)
}

/// Behavior of a single entity: enter, traverse, leave.
fn cross(
    coordinator: &Coordinator,
    class: Class,
    id: usize,
    traversal: Duration,
) -> Result<(), Error> {
    tracing::info!(class = class.label(), id, "wants to enter");
    coordinator.request_entry_sync(class);
    tracing::info!(class = class.label(), id, "enters the crossing");
    thread::sleep(traversal);
    tracing::info!(class = class.label(), id, "leaving the crossing");
    if let Err(error) = coordinator.release(class) {
        tracing::error!(class = class.label(), id, %error, "release rejected");
        return Err(error);
    }
    tracing::info!(class = class.label(), id, "out of the crossing");
    Ok(())
}

/// Samples an exponentially distributed delay with the given mean.
fn exponential<R: Rng>(rng: &mut R, mean: Duration) -> Duration {
    let uniform: f64 = rng.gen_range(0.0..1.0);
    Duration::try_from_secs_f64(-(1.0 - uniform).ln() * mean.as_secs_f64())
        .unwrap_or(Duration::MAX)
}
