//! Gameplay commands from input or AI layers.
//!
//! Commands are queued and applied at the next tick boundary, before any
//! system runs. Every command maps onto a boolean-returning engine
//! operation; rejected commands are dropped.

use glam::Vec2;
use hecs::Entity;

use crate::components::{Buff, StatusEffect};
use crate::enums::MovementMode;

#[derive(Debug, Clone)]
pub enum SimCommand {
    // --- Combat ---
    Attack { attacker: Entity, target: Entity },
    ApplyBuff { entity: Entity, buff: Buff },
    ApplyStatus { entity: Entity, effect: StatusEffect },
    Taunt { taunter: Entity, target: Entity },

    // --- Resources ---
    UseAbility { entity: Entity, mana_cost: f32 },

    // --- Locomotion ---
    Move { entity: Entity, direction: Vec2 },
    SetMovementMode { entity: Entity, mode: MovementMode },
    Jump { entity: Entity },
    Dash { entity: Entity, direction: Vec2 },
    ToggleFlight { entity: Entity },

    // --- Waves ---
    StartWaves,
    SkipWave,
    ResetWaves,
}
