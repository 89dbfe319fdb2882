//! Simulation engine for SKIRMISH.
//!
//! Owns the hecs ECS world, runs the gameplay systems in a fixed order each
//! tick, and reports what happened as `SimEvent`s.

pub mod config;
pub mod engine;
pub mod spawner;
pub mod systems;
pub mod world_setup;

pub use skirmish_core as core;
pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
