//! ECS components for hecs entities.
//!
//! Components are plain data with a few intrinsic queries (readiness,
//! liveness, container lookups). Anything that mutates state across a tick
//! lives in the systems of `skirmish-sim`.

mod aggro;
mod combat;
mod locomotion;
mod resource;
mod status;

pub use aggro::{Aggro, ThreatEntry, ThreatTable};
pub use combat::{
    AutoAttack, Buff, BuffContainer, CombatProfile, CriticalHit, Health, Resistances, Team,
    WaveMember,
};
pub use locomotion::{Dash, Flight, FlightLimit, Jump, Movement};
pub use resource::{Cooldown, Mana};
pub use status::{StatusComponent, StatusEffect};

// Position and Velocity are defined in types.rs and used directly as components.
