//! Wave orchestration for SKIRMISH.
//!
//! Implements the wave director state machine and wave-plan generation.
//! No ECS dependency: spawning goes through the `Spawner` trait, which the
//! simulation crate implements over its spawn-point registry.

pub mod fsm;
pub mod plan;
pub mod spawner;

pub use fsm::{WaveDirector, WaveEvent};
pub use plan::{generate_waves, WaveConfig};
pub use spawner::Spawner;

pub use skirmish_core as core;
