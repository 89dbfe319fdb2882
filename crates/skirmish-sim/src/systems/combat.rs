//! Combat system: attack gating, crit rolls, buff modifiers and the damage
//! reduction formulas.
//!
//! Landed attacks are forwarded to the health system's damage queue; the
//! combat system never touches `Health` itself.

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use skirmish_core::components::{Buff, BuffContainer, CombatProfile, CriticalHit};
use skirmish_core::constants::DEFENSE_CONSTANT;
use skirmish_core::enums::StatKind;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;

use crate::systems::health::HealthSystem;

/// Result of a landed attack, before defense and resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub damage: f32,
    pub is_crit: bool,
}

pub struct CombatSystem {
    /// Seconds of combat time elapsed; attack timestamps use this clock.
    clock: f64,
    rng: ChaCha8Rng,
}

impl CombatSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            clock: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Advance the clock and expire buffs that ran out.
    pub fn update(&mut self, world: &mut World, dt: f32) {
        self.clock += dt as f64;
        for (_entity, container) in world.query_mut::<&mut BuffContainer>() {
            container.buffs.retain_mut(|buff| {
                buff.remaining -= dt;
                buff.remaining > 0.0
            });
        }
    }

    pub fn can_attack(&self, world: &World, attacker: Entity) -> bool {
        let Ok(profile) = world.get::<&CombatProfile>(attacker) else {
            return false;
        };
        if !profile.can_attack {
            return false;
        }
        match profile.last_attack_at {
            None => true,
            Some(last) => self.clock - last >= attack_interval(world, attacker, &profile),
        }
    }

    /// Resolve an attack and queue its damage on `target`.
    pub fn attack(
        &mut self,
        world: &World,
        health: &mut HealthSystem,
        attacker: Entity,
        target: Entity,
        events: &mut Vec<SimEvent>,
    ) -> Option<AttackOutcome> {
        if !self.can_attack(world, attacker) || !world.contains(target) {
            return None;
        }
        let mut profile = world.get::<&mut CombatProfile>(attacker).ok()?;

        let base = profile.attack_power;
        let mut damage = match world.get::<&BuffContainer>(attacker) {
            Ok(buffs) => buffs.apply_to(StatKind::Attack, base),
            Err(_) => base,
        };

        let mut is_crit = false;
        if let Ok(mut crit) = world.get::<&mut CriticalHit>(attacker) {
            if crit.guaranteed {
                crit.guaranteed = false;
                is_crit = true;
            } else if crit.chance > 0.0 {
                is_crit = self.rng.gen::<f32>() < crit.chance;
            }
            if is_crit {
                damage *= crit.multiplier;
            }
        }

        profile.last_attack_at = Some(self.clock);
        trace!(?attacker, ?target, damage, is_crit, "attack landed");

        health.queue_damage(target, Some(attacker), damage, profile.damage_type, is_crit);
        events.push(SimEvent::Attacked {
            attacker,
            target,
            damage,
            is_crit,
        });
        Some(AttackOutcome { damage, is_crit })
    }

    /// Whether `target` is within the attacker's reach. A range <= 0 reaches
    /// everywhere; missing positions never do.
    pub fn is_in_range(&self, world: &World, attacker: Entity, target: Entity) -> bool {
        let Ok(profile) = world.get::<&CombatProfile>(attacker) else {
            return false;
        };
        if profile.range <= 0.0 {
            return true;
        }
        let (Ok(a), Ok(b)) = (
            world.get::<&Position>(attacker),
            world.get::<&Position>(target),
        ) else {
            return false;
        };
        a.distance_to(&b) <= profile.range
    }
}

/// Seconds between attacks, with AttackSpeed buffs applied.
fn attack_interval(world: &World, attacker: Entity, profile: &CombatProfile) -> f64 {
    let speed = match world.get::<&BuffContainer>(attacker) {
        Ok(buffs) => buffs.apply_to(StatKind::AttackSpeed, profile.attack_speed),
        Err(_) => profile.attack_speed,
    };
    1.0 / speed.max(f32::EPSILON) as f64
}

/// Add a buff, stacking onto an existing buff of the same name.
/// Returns false if the entity does not exist.
pub fn apply_buff(world: &mut World, entity: Entity, buff: Buff) -> bool {
    if let Ok(mut container) = world.get::<&mut BuffContainer>(entity) {
        stack_buff(&mut container, buff);
        return true;
    }
    world
        .insert_one(entity, BuffContainer { buffs: vec![buff] })
        .is_ok()
}

/// Same name: one more stack (capped) and a refreshed duration.
/// Otherwise the buff is appended.
pub fn stack_buff(container: &mut BuffContainer, buff: Buff) {
    match container.buffs.iter_mut().find(|b| b.name == buff.name) {
        Some(existing) => {
            existing.stacks = (existing.stacks + 1).min(existing.max_stacks.max(1));
            existing.remaining = buff.remaining;
        }
        None => container.buffs.push(buff),
    }
}

/// Fraction of damage removed by `defense`.
pub fn damage_reduction(defense: f32) -> f32 {
    let defense = defense.max(0.0);
    defense / (defense + DEFENSE_CONSTANT)
}

pub fn calculate_damage(base: f32, defense: f32) -> f32 {
    base * (1.0 - damage_reduction(defense))
}

/// Penetration in [0, 1] removes that fraction of defense first.
pub fn calculate_damage_with_penetration(base: f32, defense: f32, penetration: f32) -> f32 {
    let effective = (defense * (1.0 - penetration.clamp(0.0, 1.0))).max(0.0);
    calculate_damage(base, effective)
}
