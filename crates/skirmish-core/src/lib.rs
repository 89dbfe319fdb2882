//! Core types and definitions for the SKIRMISH gameplay simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, events, enumerations, geometric types and tuning
//! constants. It contains no systems; game logic lives in `skirmish-sim`.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod types;
