//! Timed status effects (damage-over-time, slows, buffs).

use crate::enums::StatusKind;

/// A single effect instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Seconds remaining.
    pub duration: f32,
    pub max_duration: f32,
    /// Seconds between ticks; <= 0 never ticks.
    pub tick_interval: f32,
    pub tick_timer: f32,
    /// Effect intensity (slow fraction, burn strength, ...).
    pub magnitude: f32,
    pub stacks: u32,
    /// Stackable effects coexist as independent instances.
    pub stackable: bool,
    pub source: Option<hecs::Entity>,
    pub damage_per_tick: f32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: f32, magnitude: f32) -> Self {
        Self {
            kind,
            duration,
            max_duration: duration,
            tick_interval: 0.0,
            tick_timer: 0.0,
            magnitude,
            stacks: 1,
            stackable: kind.default_stackable(),
            source: None,
            damage_per_tick: 0.0,
        }
    }

    /// Burning: non-stackable, 1s ticks.
    pub fn ignite(duration: f32, magnitude: f32, damage_per_tick: f32) -> Self {
        Self::new(StatusKind::Ignite, duration, magnitude).ticking(1.0, damage_per_tick)
    }

    /// Poison: stackable, 1s ticks.
    pub fn poison(duration: f32, damage_per_tick: f32) -> Self {
        Self::new(StatusKind::Poison, duration, 1.0).ticking(1.0, damage_per_tick)
    }

    /// Bleed: stackable, fast 0.5s ticks.
    pub fn bleed(duration: f32, damage_per_tick: f32) -> Self {
        Self::new(StatusKind::Bleed, duration, 1.0).ticking(0.5, damage_per_tick)
    }

    /// Movement slow; `magnitude` is the fraction of speed removed.
    pub fn slow(duration: f32, magnitude: f32) -> Self {
        Self::new(StatusKind::Slow, duration, magnitude)
    }

    pub fn ticking(mut self, interval: f32, damage_per_tick: f32) -> Self {
        self.tick_interval = interval;
        self.damage_per_tick = damage_per_tick;
        self
    }

    pub fn with_source(mut self, source: hecs::Entity) -> Self {
        self.source = Some(source);
        self
    }

    pub fn stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.duration <= 0.0
    }
}

/// All active effects on an entity, in application order.
#[derive(Debug, Clone, Default)]
pub struct StatusComponent {
    pub effects: Vec<StatusEffect>,
}

impl StatusComponent {
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Highest magnitude among instances of `kind`.
    pub fn strongest(&self, kind: StatusKind) -> Option<f32> {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude)
            .reduce(f32::max)
    }

    /// Remove every instance of `kind`; returns how many were removed.
    pub fn remove(&mut self, kind: StatusKind) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before - self.effects.len()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

