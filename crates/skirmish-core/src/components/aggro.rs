//! Threat tables for hostile entities.
//!
//! A threat table is an owned arena of entries plus an entity → slot index,
//! so the aggro system can mutate it in place each tick without rebuilding
//! a map.

use std::collections::HashMap;

use hecs::Entity;

use crate::constants::*;
use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatEntry {
    pub entity: Entity,
    pub threat: f32,
}

/// Insertion-ordered threat table.
#[derive(Debug, Clone, Default)]
pub struct ThreatTable {
    entries: Vec<ThreatEntry>,
    index: HashMap<Entity, usize>,
}

impl ThreatTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<f32> {
        self.index.get(&entity).map(|&i| self.entries[i].threat)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ThreatEntry> {
        self.entries.iter()
    }

    /// Set an entity's threat, appending it if untracked.
    pub fn set(&mut self, entity: Entity, threat: f32) {
        match self.index.get(&entity) {
            Some(&i) => self.entries[i].threat = threat,
            None => {
                self.index.insert(entity, self.entries.len());
                self.entries.push(ThreatEntry { entity, threat });
            }
        }
    }

    /// Add to an entity's threat, appending it if untracked.
    pub fn add(&mut self, entity: Entity, amount: f32) {
        let current = self.get(entity).unwrap_or(0.0);
        self.set(entity, current + amount);
    }

    /// Insert with `threat` only if the entity is not already tracked.
    /// Returns true if inserted.
    pub fn seed(&mut self, entity: Entity, threat: f32) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.set(entity, threat);
        true
    }

    pub fn remove(&mut self, entity: Entity) -> Option<f32> {
        let i = self.index.get(&entity).copied()?;
        let removed = self.entries.remove(i);
        self.reindex();
        Some(removed.threat)
    }

    /// Keep entries matching the predicate, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut ThreatEntry) -> bool) {
        let before = self.entries.len();
        self.entries.retain_mut(|e| keep(e));
        if self.entries.len() != before {
            self.reindex();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Highest stored threat, or 0.0 for an empty table.
    pub fn max_threat(&self) -> f32 {
        self.entries.iter().map(|e| e.threat).fold(0.0, f32::max)
    }

    /// Entity with strictly greatest threat; ties keep the earliest entry.
    pub fn top(&self) -> Option<Entity> {
        let mut best: Option<&ThreatEntry> = None;
        for entry in &self.entries {
            match best {
                Some(b) if entry.threat <= b.threat => {}
                _ => best = Some(entry),
            }
        }
        best.map(|e| e.entity)
    }

    /// Keep only the `capacity` highest-threat entries.
    /// Stable: equal threats keep their relative table order.
    pub fn trim_to(&mut self, capacity: usize) {
        if self.entries.len() <= capacity {
            return;
        }
        self.entries.sort_by(|a, b| b.threat.total_cmp(&a.threat));
        self.entries.truncate(capacity);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.entity, i);
        }
    }
}

/// Aggro state for a hostile entity.
#[derive(Debug, Clone)]
pub struct Aggro {
    pub table: ThreatTable,
    pub current_target: Option<Entity>,
    /// Proximity scan radius.
    pub aggro_range: f32,
    /// Max distance from the anchor; <= 0 disables leashing.
    pub leash_range: f32,
    pub leash_anchor: Position,
    pub leashed: bool,
    /// Threat lost per second by every entry.
    pub threat_decay: f32,
    pub max_threat_memory: usize,
}

impl Aggro {
    pub fn new(aggro_range: f32, leash_range: f32, anchor: Position) -> Self {
        Self {
            table: ThreatTable::default(),
            current_target: None,
            aggro_range,
            leash_range,
            leash_anchor: anchor,
            leashed: false,
            threat_decay: DEFAULT_THREAT_DECAY,
            max_threat_memory: DEFAULT_MAX_THREAT_MEMORY,
        }
    }

    pub fn with_decay(mut self, threat_decay: f32) -> Self {
        self.threat_decay = threat_decay;
        self
    }

    pub fn with_memory(mut self, max_threat_memory: usize) -> Self {
        self.max_threat_memory = max_threat_memory;
        self
    }
}
