//! Errors reported by the crossing and its simulation harness.

use std::io;

use crate::Class;

/// Errors reported by the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An entity released the crossing without occupying it.
    ///
    /// The occupant counters are left untouched when this is returned.
    #[error("{class} released the crossing without occupying it")]
    NotOccupied {
        /// Class of the unbalanced release.
        class: Class,
    },

    /// The simulation configuration was rejected.
    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(&'static str),

    /// A simulation thread could not be spawned.
    #[error("failed to spawn a simulation thread: {0}")]
    Spawn(#[from] io::Error),

    /// A simulated entity panicked while crossing.
    #[error("{class} {id} panicked")]
    EntityPanicked {
        /// Class of the entity.
        class: Class,
        /// Identifier of the entity within its class, `0` for the arrival source.
        id: usize,
    },
}
