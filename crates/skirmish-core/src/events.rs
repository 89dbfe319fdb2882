//! Events emitted by the simulation, in emission order, for external
//! consumers (rendering, audio, telemetry, AI decision layers).

use hecs::Entity;

use crate::enums::DamageType;

/// Everything observable that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// An attack landed and its damage was queued.
    Attacked {
        attacker: Entity,
        target: Entity,
        damage: f32,
        is_crit: bool,
    },
    /// Damage was applied to a health pool.
    Damaged {
        target: Entity,
        source: Option<Entity>,
        amount: i32,
        damage_type: DamageType,
        is_crit: bool,
        remaining: i32,
    },
    /// Healing was applied to a health pool.
    Healed {
        target: Entity,
        source: Option<Entity>,
        amount: i32,
        remaining: i32,
    },
    /// A health pool reached zero.
    Died {
        entity: Entity,
        killer: Option<Entity>,
    },
    /// An aggro holder switched targets.
    TargetChanged {
        entity: Entity,
        previous: Option<Entity>,
        current: Option<Entity>,
    },
    /// A cooldown became usable again.
    AbilityReady { entity: Entity },
    /// A wave left its pre-delay and started spawning.
    WaveStarted { wave: u32 },
    /// A wave was cleared (or skipped).
    WaveEnded { wave: u32 },
    /// The last configured wave was cleared.
    AllWavesComplete { total_kills: u32 },
}
