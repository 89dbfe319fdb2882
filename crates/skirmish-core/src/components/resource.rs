//! Ability cooldowns and mana pools.

use serde::{Deserialize, Serialize};

/// Ability cooldown, single- or multi-charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Single-charge recovery time (seconds).
    pub duration: f32,
    /// Single-charge time left (seconds).
    pub remaining: f32,
    pub charges: u32,
    pub max_charges: u32,
    /// Seconds to regenerate one charge (multi-charge only).
    pub charge_time: f32,
    /// Progress toward the next charge (seconds).
    pub charge_timer: f32,
}

impl Cooldown {
    /// A ready single-charge cooldown.
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
            charges: 1,
            max_charges: 1,
            charge_time: duration,
            charge_timer: 0.0,
        }
    }

    /// A full multi-charge cooldown.
    pub fn with_charges(max_charges: u32, charge_time: f32) -> Self {
        let max_charges = max_charges.max(1);
        Self {
            duration: charge_time,
            remaining: 0.0,
            charges: max_charges,
            max_charges,
            charge_time,
            charge_timer: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        if self.max_charges > 1 {
            self.charges > 0
        } else {
            self.remaining <= 0.0
        }
    }
}

/// Regenerating mana pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mana {
    pub current: f32,
    pub max: f32,
    /// Mana per second once the delay has elapsed.
    pub regen: f32,
    /// Seconds of no regeneration after spending mana.
    pub regen_delay: f32,
    pub delay_timer: f32,
}

impl Mana {
    pub fn new(max: f32, regen: f32, regen_delay: f32) -> Self {
        Self {
            current: max,
            max,
            regen,
            regen_delay,
            delay_timer: 0.0,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }
}
