//! Engine configuration, loadable from JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use skirmish_core::constants::*;
use skirmish_waves::{generate_waves, WaveConfig};

/// Error type for loading a `SimConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Procedural wave plan: `count` waves scaled up from `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveGeneration {
    pub count: u32,
    pub base: BTreeMap<String, u32>,
    #[serde(default)]
    pub scaling: f32,
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub taunt_bonus: f32,
    pub damage_threat_multiplier: f32,
    pub healing_threat_multiplier: f32,
    /// Explicit wave plan. Takes precedence over `generate`.
    pub waves: Vec<WaveConfig>,
    pub generate: Option<WaveGeneration>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            taunt_bonus: TAUNT_THREAT_BONUS,
            damage_threat_multiplier: DAMAGE_THREAT_MULTIPLIER,
            healing_threat_multiplier: HEALING_THREAT_MULTIPLIER,
            waves: Vec::new(),
            generate: None,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The wave plan this config describes (possibly empty).
    pub fn wave_plan(&self) -> Vec<WaveConfig> {
        if !self.waves.is_empty() {
            return self.waves.clone();
        }
        match &self.generate {
            Some(g) => generate_waves(g.count, &g.base, g.scaling),
            None => Vec::new(),
        }
    }
}
