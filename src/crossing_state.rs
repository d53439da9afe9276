//! [`CrossingState`] counts the entities currently on the crossing.

use crate::{Class, Error};

/// Number of entities of each class currently on the crossing.
///
/// At most one class has a non-zero counter at any instant observable outside the
/// [`Coordinator`](crate::Coordinator) lock; within that class, concurrency is unbounded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CrossingState {
    /// Cars currently crossing northbound.
    occupants_north: usize,
    /// Cars currently crossing southbound.
    occupants_south: usize,
    /// Pedestrians currently crossing.
    occupants_pedestrian: usize,
}

impl CrossingState {
    /// Returns the number of northbound cars on the crossing.
    #[inline]
    #[must_use]
    pub const fn occupants_north(&self) -> usize {
        self.occupants_north
    }

    /// Returns the number of southbound cars on the crossing.
    #[inline]
    #[must_use]
    pub const fn occupants_south(&self) -> usize {
        self.occupants_south
    }

    /// Returns the number of pedestrians on the crossing.
    #[inline]
    #[must_use]
    pub const fn occupants_pedestrian(&self) -> usize {
        self.occupants_pedestrian
    }

    /// Returns the number of occupants of the class.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Class, CrossingState};
    ///
    /// let state = CrossingState::default();
    /// assert_eq!(state.occupants(Class::Pedestrian), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn occupants(&self, class: Class) -> usize {
        match class {
            Class::North => self.occupants_north,
            Class::South => self.occupants_south,
            Class::Pedestrian => self.occupants_pedestrian,
        }
    }

    /// Returns `true` if nobody is on the crossing.
    #[inline]
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        self.occupants_north == 0 && self.occupants_south == 0 && self.occupants_pedestrian == 0
    }

    /// Returns the class currently on the crossing, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Class, Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    /// assert_eq!(coordinator.snapshot().occupying_class(), None);
    ///
    /// coordinator.request_entry_car_sync(Direction::South);
    /// assert_eq!(coordinator.snapshot().occupying_class(), Some(Class::South));
    /// ```
    #[inline]
    #[must_use]
    pub fn occupying_class(&self) -> Option<Class> {
        Class::ALL
            .into_iter()
            .find(|class| self.occupants(*class) != 0)
    }

    /// Returns `true` if at most one class occupies the crossing.
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        Class::ALL
            .into_iter()
            .filter(|class| self.occupants(*class) != 0)
            .count()
            <= 1
    }

    /// Returns `true` if an entity of the class can enter right now.
    ///
    /// The admission predicate only looks at the other two classes, so entities of the same class
    /// never block each other.
    #[inline]
    pub(crate) const fn admits(&self, class: Class) -> bool {
        match class {
            Class::North => self.occupants_south == 0 && self.occupants_pedestrian == 0,
            Class::South => self.occupants_north == 0 && self.occupants_pedestrian == 0,
            Class::Pedestrian => self.occupants_north == 0 && self.occupants_south == 0,
        }
    }

    /// Registers an entity of the class as an occupant.
    #[inline]
    pub(crate) fn enter(&mut self, class: Class) {
        debug_assert!(self.admits(class));
        *self.counter_mut(class) += 1;
        debug_assert!(self.is_consistent());
    }

    /// Removes an occupant of the class.
    ///
    /// Returns `true` if the class vacated the crossing.
    pub(crate) fn leave(&mut self, class: Class) -> Result<bool, Error> {
        let counter = self.counter_mut(class);
        if *counter == 0 {
            return Err(Error::NotOccupied { class });
        }
        *counter -= 1;
        Ok(*counter == 0)
    }

    /// Returns a mutable reference to the counter of the class.
    const fn counter_mut(&mut self, class: Class) -> &mut usize {
        match class {
            Class::North => &mut self.occupants_north,
            Class::South => &mut self.occupants_south,
            Class::Pedestrian => &mut self.occupants_pedestrian,
        }
    }
}
