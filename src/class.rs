//! Traffic classes sharing the crossing.

use std::fmt;

/// Direction of a car on the crossing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Northbound.
    North,
    /// Southbound.
    South,
}

/// Class of an entity occupying the crossing.
///
/// Entities of the same class may cross concurrently, entities of different classes never do.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// Cars heading north.
    North,
    /// Cars heading south.
    South,
    /// Pedestrians, regardless of their heading.
    Pedestrian,
}

impl Direction {
    /// Both directions.
    pub const ALL: [Direction; 2] = [Direction::North, Direction::South];

    /// Returns the opposite direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// ```
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }
}

impl Class {
    /// All classes in wait queue order.
    pub const ALL: [Class; 3] = [Class::North, Class::South, Class::Pedestrian];

    /// Returns the index of the class in per-class arrays.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Class::North => 0,
            Class::South => 1,
            Class::Pedestrian => 2,
        }
    }

    /// Returns `true` if the class is a car class.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Class;
    ///
    /// assert!(Class::South.is_car());
    /// assert!(!Class::Pedestrian.is_car());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_car(self) -> bool {
        !matches!(self, Class::Pedestrian)
    }

    /// Returns the short label of the class used in thread names and log fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Class;
    ///
    /// assert_eq!(Class::North.label(), "north");
    /// assert_eq!(Class::North.to_string(), "northbound car");
    /// assert_eq!(Class::Pedestrian.to_string(), Class::Pedestrian.label());
    /// ```
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Class::North => "north",
            Class::South => "south",
            Class::Pedestrian => "pedestrian",
        }
    }
}

impl From<Direction> for Class {
    #[inline]
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Class::North,
            Direction::South => Class::South,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => f.write_str("north"),
            Direction::South => f.write_str("south"),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_car() {
            write!(f, "{}bound car", self.label())
        } else {
            f.write_str(self.label())
        }
    }
}
