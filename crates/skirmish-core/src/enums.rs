//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Damage channel. Resistances are keyed by this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Physical,
    Magical,
    Fire,
    Ice,
    Poison,
    Lightning,
    /// Ignores resistances entirely.
    True,
}

/// Stat a buff modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    AttackSpeed,
    MoveSpeed,
}

/// Timed status effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    // Damage over time
    Ignite,
    Poison,
    Bleed,

    // Crowd control
    Slow,
    Stun,
    Freeze,

    // Buffs
    Haste,
    Regen,
    Shield,
}

impl StatusKind {
    /// Whether independent instances of this kind may coexist on one entity.
    pub fn default_stackable(self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::Bleed)
    }
}

/// Locomotion mode selecting the max-speed rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walk,
    Run,
    Sprint,
    Crouch,
    Swim,
    Fly,
    Climb,
}

/// Wave director lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Nothing started yet (or after `reset`).
    #[default]
    Idle,
    /// Pre-delay countdown before the wave's first spawn.
    Starting,
    /// Releasing queued spawns.
    Active,
    /// All spawns released; waiting for the wave to be killed off.
    Clearing,
    /// Wave cleared; next wave is prepared on the following update.
    Complete,
    /// Every configured wave has been cleared.
    Final,
}
