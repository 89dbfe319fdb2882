//! Health, combat profile, crits, buffs and team markers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CRIT_MULTIPLIER;
use crate::enums::{DamageType, StatKind};

/// Integer health pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Fraction of max health remaining, 0.0 for an empty pool.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current.max(0) as f32 / self.max as f32
    }
}

/// Per-damage-type resistance in [0, 1]. Missing types resist nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resistances {
    pub values: HashMap<DamageType, f32>,
}

impl Resistances {
    pub fn with(mut self, damage_type: DamageType, resistance: f32) -> Self {
        self.values.insert(damage_type, resistance.clamp(0.0, 1.0));
        self
    }

    /// Resistance against a damage type. `True` damage is never resisted.
    pub fn get(&self, damage_type: DamageType) -> f32 {
        if damage_type == DamageType::True {
            return 0.0;
        }
        self.values
            .get(&damage_type)
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }
}

/// Offensive and defensive combat stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatProfile {
    pub attack_power: f32,
    pub defense: f32,
    /// Attacks per second. Must be > 0.
    pub attack_speed: f32,
    /// Reach for intent drivers; <= 0 means unlimited.
    pub range: f32,
    pub damage_type: DamageType,
    /// Combat clock time of the last landed attack. `None` = never attacked.
    pub last_attack_at: Option<f64>,
    pub can_attack: bool,
}

impl CombatProfile {
    pub fn new(attack_power: f32, attack_speed: f32) -> Self {
        Self {
            attack_power,
            defense: 0.0,
            attack_speed,
            range: 0.0,
            damage_type: DamageType::Physical,
            last_attack_at: None,
            can_attack: true,
        }
    }
}

/// Critical-hit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalHit {
    /// Probability in [0, 1].
    pub chance: f32,
    pub multiplier: f32,
    /// Forces the next attack to crit; cleared once consumed.
    pub guaranteed: bool,
}

impl Default for CriticalHit {
    fn default() -> Self {
        Self {
            chance: 0.0,
            multiplier: DEFAULT_CRIT_MULTIPLIER,
            guaranteed: false,
        }
    }
}

/// A named, timed stat modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    pub stat: StatKind,
    pub additive: f32,
    pub multiplicative: f32,
    /// Seconds remaining; the buff is removed once this reaches 0.
    pub remaining: f32,
    pub stacks: u32,
    pub max_stacks: u32,
}

impl Buff {
    pub fn new(name: impl Into<String>, stat: StatKind, duration: f32) -> Self {
        Self {
            name: name.into(),
            stat,
            additive: 0.0,
            multiplicative: 1.0,
            remaining: duration,
            stacks: 1,
            max_stacks: 1,
        }
    }

    pub fn additive(mut self, value: f32) -> Self {
        self.additive = value;
        self
    }

    pub fn multiplicative(mut self, value: f32) -> Self {
        self.multiplicative = value;
        self
    }

    pub fn max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self
    }
}

/// Ordered buff list. Stacking by name is enforced by the combat system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffContainer {
    pub buffs: Vec<Buff>,
}

impl BuffContainer {
    pub fn find(&self, name: &str) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.name == name)
    }

    /// Aggregate (additive, multiplicative) modifier for a stat.
    /// Stacks scale the additive part linearly and the multiplicative part
    /// geometrically.
    pub fn modifier_for(&self, stat: StatKind) -> (f32, f32) {
        self.buffs
            .iter()
            .filter(|b| b.stat == stat)
            .fold((0.0, 1.0), |(add, mul), b| {
                (
                    add + b.additive * b.stacks as f32,
                    mul * b.multiplicative.powi(b.stacks as i32),
                )
            })
    }

    /// Apply the aggregate modifier for `stat` to a base value.
    pub fn apply_to(&self, stat: StatKind, base: f32) -> f32 {
        let (add, mul) = self.modifier_for(stat);
        (base + add) * mul
    }
}

/// Entities sharing a team never build threat on each other by proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(pub u32);

/// Marks an entity whose attacks are driven by its aggro target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AutoAttack;

/// Marks an entity spawned for a wave, so its death counts toward clearing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveMember {
    pub wave: u32,
}
