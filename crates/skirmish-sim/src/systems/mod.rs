//! ECS systems that operate on the simulation world each tick.
//!
//! Systems without bookkeeping are plain functions over `&mut World`.
//! Health, combat and aggro keep queues or an RNG between calls and are
//! structs owned by the engine; everything else lives in components.

pub mod aggro;
pub mod combat;
pub mod cooldown;
pub mod health;
pub mod locomotion;
pub mod status;
