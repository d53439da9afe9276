#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![doc = include_str!("../README.md")]

mod class;
pub use class::{Class, Direction};

pub mod config;
pub use config::SimulationConfig;

pub mod coordinator;
pub use coordinator::Coordinator;

mod crossing_state;
pub use crossing_state::CrossingState;

mod error;
pub use error::Error;

pub mod passage;
pub use passage::Passage;

pub mod simulation;

mod wait_queue;

#[cfg(test)]
mod tests;
