//! [`Passage`] releases the crossing when dropped.

use std::fmt;

use crate::{Class, Coordinator};

/// An RAII proof that an entity is on the crossing.
///
/// The entity leaves the crossing when the [`Passage`] is dropped.
///
/// # Examples
///
/// ```
/// use crossing::{Class, Coordinator};
///
/// let coordinator = Coordinator::default();
///
/// let first = coordinator.enter_pedestrian_sync();
/// let second = coordinator.enter_pedestrian_sync();
/// assert_eq!(first.class(), Class::Pedestrian);
/// assert_eq!(coordinator.snapshot().occupants_pedestrian(), 2);
///
/// drop(first);
/// drop(second);
/// assert!(coordinator.snapshot().is_vacant());
/// ```
#[must_use = "the entity leaves the crossing immediately if the passage is dropped"]
pub struct Passage<'c> {
    /// The coordinator that admitted the entity.
    coordinator: &'c Coordinator,
    /// Class the entity was admitted as.
    class: Class,
}

impl<'c> Passage<'c> {
    /// Wraps an admission that has just been granted.
    #[inline]
    pub(crate) const fn new(coordinator: &'c Coordinator, class: Class) -> Self {
        Self { coordinator, class }
    }

    /// Returns the class the entity was admitted as.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> Class {
        self.class
    }
}

impl fmt::Debug for Passage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passage")
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

impl Drop for Passage<'_> {
    #[inline]
    fn drop(&mut self) {
        if let Err(error) = self.coordinator.release(self.class) {
            // Someone released this admission through the coordinator directly.
            tracing::error!(class = %self.class, %error, "unbalanced passage");
        }
    }
}
