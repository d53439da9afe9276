//! [`SimulationConfig`] defines the traffic generated by the simulation harness.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::{Class, Error};

/// [`SimulationConfig`] defines the traffic generated by the simulation harness.
///
/// The [`Coordinator`](crate::Coordinator) itself takes no configuration; these values only drive
/// the arrival sources and the traversal delays of the simulated entities.
///
/// # Examples
///
/// ```
/// use crossing::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_cars_per_direction(8)
///     .with_pedestrians(2)
///     .with_time_scale(0.001)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of cars spawned by each of the northbound and southbound arrival sources.
    pub cars_per_direction: usize,
    /// Number of pedestrians spawned.
    pub pedestrians: usize,
    /// Mean time between two northbound car arrivals.
    pub car_interval_north: Duration,
    /// Mean time between two southbound car arrivals.
    pub car_interval_south: Duration,
    /// Mean time between two pedestrian arrivals.
    pub pedestrian_interval: Duration,
    /// Range of the time a car spends on the crossing.
    pub car_traversal: RangeInclusive<Duration>,
    /// Range of the time a pedestrian spends on the crossing.
    pub pedestrian_traversal: RangeInclusive<Duration>,
    /// Multiplier applied to every delay.
    pub time_scale: f64,
    /// Seed of the random streams; a fresh seed is drawn if `None`.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Sets the number of cars per direction.
    #[inline]
    #[must_use]
    pub fn with_cars_per_direction(mut self, cars: usize) -> Self {
        self.cars_per_direction = cars;
        self
    }

    /// Sets the number of pedestrians.
    #[inline]
    #[must_use]
    pub fn with_pedestrians(mut self, pedestrians: usize) -> Self {
        self.pedestrians = pedestrians;
        self
    }

    /// Sets the mean inter-arrival time of the class.
    #[inline]
    #[must_use]
    pub fn with_interval(mut self, class: Class, interval: Duration) -> Self {
        match class {
            Class::North => self.car_interval_north = interval,
            Class::South => self.car_interval_south = interval,
            Class::Pedestrian => self.pedestrian_interval = interval,
        }
        self
    }

    /// Sets the range of traversal times of cars.
    #[inline]
    #[must_use]
    pub fn with_car_traversal(mut self, traversal: RangeInclusive<Duration>) -> Self {
        self.car_traversal = traversal;
        self
    }

    /// Sets the range of traversal times of pedestrians.
    #[inline]
    #[must_use]
    pub fn with_pedestrian_traversal(mut self, traversal: RangeInclusive<Duration>) -> Self {
        self.pedestrian_traversal = traversal;
        self
    }

    /// Sets the multiplier applied to every delay.
    #[inline]
    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Fixes the seed of the random streams.
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the number of entities of the class to spawn.
    #[inline]
    #[must_use]
    pub fn population(&self, class: Class) -> usize {
        if class.is_car() {
            self.cars_per_direction
        } else {
            self.pedestrians
        }
    }

    /// Returns the mean inter-arrival time of the class.
    #[inline]
    #[must_use]
    pub fn interval(&self, class: Class) -> Duration {
        match class {
            Class::North => self.car_interval_north,
            Class::South => self.car_interval_south,
            Class::Pedestrian => self.pedestrian_interval,
        }
    }

    /// Returns the range of traversal times of the class.
    #[inline]
    #[must_use]
    pub fn traversal(&self, class: Class) -> &RangeInclusive<Duration> {
        if class.is_car() {
            &self.car_traversal
        } else {
            &self.pedestrian_traversal
        }
    }

    /// Checks that every delay can be sampled and scaled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the rejected field.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::SimulationConfig;
    ///
    /// assert!(SimulationConfig::default().with_time_scale(0.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(Error::InvalidConfig("time scale must be finite and positive"));
        }
        if self.car_traversal.is_empty() {
            return Err(Error::InvalidConfig("car traversal range is empty"));
        }
        if self.pedestrian_traversal.is_empty() {
            return Err(Error::InvalidConfig("pedestrian traversal range is empty"));
        }
        let longest = [
            self.car_interval_north,
            self.car_interval_south,
            self.pedestrian_interval,
            *self.car_traversal.end(),
            *self.pedestrian_traversal.end(),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        if Duration::try_from_secs_f64(longest.as_secs_f64() * self.time_scale).is_err() {
            return Err(Error::InvalidConfig("scaled delays overflow"));
        }
        Ok(())
    }

    /// Applies the time scale to a delay.
    #[inline]
    pub(crate) fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.time_scale).unwrap_or(Duration::MAX)
    }
}

impl Default for SimulationConfig {
    #[inline]
    fn default() -> Self {
        Self {
            cars_per_direction: 100,
            pedestrians: 10,
            car_interval_north: Duration::from_secs(2),
            car_interval_south: Duration::from_secs(2),
            pedestrian_interval: Duration::from_secs(5),
            car_traversal: Duration::from_millis(500)..=Duration::from_secs(1),
            pedestrian_traversal: Duration::from_secs(10)..=Duration::from_secs(30),
            time_scale: 1.0,
            seed: None,
        }
    }
}
