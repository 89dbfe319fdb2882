//! Wave definitions and procedural wave-plan generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skirmish_core::constants::*;

/// One wave of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// 1-based wave number.
    pub wave_number: u32,
    /// Enemy type → count. Ordered so queue construction is deterministic
    /// before shuffling.
    pub enemies: BTreeMap<String, u32>,
    /// Seconds between individual spawns.
    #[serde(default = "default_spawn_delay")]
    pub spawn_delay: f32,
    /// Pre-delay before the first spawn.
    #[serde(default = "default_wave_delay")]
    pub wave_delay: f32,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default = "default_difficulty")]
    pub difficulty: f32,
}

fn default_spawn_delay() -> f32 {
    DEFAULT_SPAWN_DELAY
}

fn default_wave_delay() -> f32 {
    DEFAULT_WAVE_DELAY
}

fn default_difficulty() -> f32 {
    1.0
}

impl WaveConfig {
    pub fn new(wave_number: u32) -> Self {
        Self {
            wave_number,
            enemies: BTreeMap::new(),
            spawn_delay: DEFAULT_SPAWN_DELAY,
            wave_delay: DEFAULT_WAVE_DELAY,
            is_boss: false,
            difficulty: 1.0,
        }
    }

    pub fn with_enemy(mut self, enemy_type: impl Into<String>, count: u32) -> Self {
        self.enemies.insert(enemy_type.into(), count);
        self
    }

    /// Total enemies across all types.
    pub fn total_enemies(&self) -> u32 {
        self.enemies.values().sum()
    }
}

/// Build `count` waves from a base composition.
///
/// Wave `i` (1-based) gets `base * (1 + (i - 1) * scaling)` of each enemy
/// type, truncated. Every `BOSS_WAVE_INTERVAL`th wave is a boss wave with a
/// longer pre-delay.
pub fn generate_waves(count: u32, base: &BTreeMap<String, u32>, scaling: f32) -> Vec<WaveConfig> {
    (1..=count)
        .map(|i| {
            let factor = 1.0 + (i - 1) as f32 * scaling;
            let is_boss = i % BOSS_WAVE_INTERVAL == 0;
            let enemies = base
                .iter()
                .map(|(name, &n)| (name.clone(), (n as f32 * factor).max(0.0) as u32))
                .collect();
            let wave_delay = if is_boss {
                DEFAULT_WAVE_DELAY * BOSS_WAVE_DELAY_FACTOR
            } else {
                DEFAULT_WAVE_DELAY
            };
            WaveConfig {
                wave_number: i,
                enemies,
                spawn_delay: DEFAULT_SPAWN_DELAY,
                wave_delay,
                is_boss,
                difficulty: factor,
            }
        })
        .collect()
}
