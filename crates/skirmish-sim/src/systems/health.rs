//! Health system: buffers damage and heal requests, applies them once per
//! tick, and reports damage, heals and deaths.
//!
//! Queued damage clamps health to 0 at death. The immediate path does not
//! clamp, so overkill leaves `current` negative.

use hecs::{Entity, World};
use tracing::debug;

use skirmish_core::components::{Health, Resistances};
use skirmish_core::enums::DamageType;
use skirmish_core::events::SimEvent;

/// Anything that can absorb a raw damage amount.
pub trait DamageSink {
    fn apply_damage(&mut self, amount: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: f32,
    pub damage_type: DamageType,
    pub is_crit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealRequest {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: i32,
}

#[derive(Debug, Default)]
pub struct HealthSystem {
    damage_queue: Vec<DamageRequest>,
    heal_queue: Vec<HealRequest>,
}

impl HealthSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_damage(
        &mut self,
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        damage_type: DamageType,
        is_crit: bool,
    ) {
        self.damage_queue.push(DamageRequest {
            target,
            source,
            amount,
            damage_type,
            is_crit,
        });
    }

    pub fn queue_heal(&mut self, target: Entity, source: Option<Entity>, amount: i32) {
        self.heal_queue.push(HealRequest {
            target,
            source,
            amount,
        });
    }

    pub fn pending_damage(&self) -> usize {
        self.damage_queue.len()
    }

    pub fn pending_heals(&self) -> usize {
        self.heal_queue.len()
    }

    /// A sink that queues true damage against `target` with no source.
    pub fn sink(&mut self, target: Entity) -> HealthSink<'_> {
        HealthSink {
            health: self,
            target,
        }
    }

    /// Apply every queued request (damage first, then heals), then report
    /// the deaths this produced.
    pub fn update(&mut self, world: &World, events: &mut Vec<SimEvent>) {
        let mut deaths: Vec<(Entity, Option<Entity>)> = Vec::new();

        for req in self.damage_queue.drain(..) {
            let resist = resistance(world, req.target, req.damage_type);
            let Ok(mut health) = world.get::<&mut Health>(req.target) else {
                continue;
            };
            let dealt = mitigated(req.amount, resist);
            let was_alive = health.is_alive();
            health.current = health.current.saturating_sub(dealt);
            if health.current <= 0 {
                health.current = 0;
                if was_alive {
                    deaths.push((req.target, req.source));
                }
            }
            events.push(SimEvent::Damaged {
                target: req.target,
                source: req.source,
                amount: dealt,
                damage_type: req.damage_type,
                is_crit: req.is_crit,
                remaining: health.current,
            });
        }

        for req in self.heal_queue.drain(..) {
            let Ok(mut health) = world.get::<&mut Health>(req.target) else {
                continue;
            };
            let healed = heal(&mut health, req.amount);
            if healed > 0 {
                events.push(SimEvent::Healed {
                    target: req.target,
                    source: req.source,
                    amount: healed,
                    remaining: health.current,
                });
            }
        }

        for (entity, killer) in deaths {
            debug!(?entity, ?killer, "entity died");
            events.push(SimEvent::Died { entity, killer });
        }
    }

    /// Apply damage now, bypassing the queue. Returns true if this killed
    /// the target.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_damage_immediate(
        &self,
        world: &World,
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        damage_type: DamageType,
        is_crit: bool,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let resist = resistance(world, target, damage_type);
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        let dealt = mitigated(amount, resist);
        let was_alive = health.is_alive();
        health.current = health.current.saturating_sub(dealt);
        events.push(SimEvent::Damaged {
            target,
            source,
            amount: dealt,
            damage_type,
            is_crit,
            remaining: health.current,
        });

        let died = was_alive && !health.is_alive();
        if died {
            debug!(entity = ?target, killer = ?source, "entity died");
            events.push(SimEvent::Died {
                entity: target,
                killer: source,
            });
        }
        died
    }

    /// Heal now, bypassing the queue. Returns true if any health was restored.
    pub fn heal_immediate(
        &self,
        world: &World,
        target: Entity,
        source: Option<Entity>,
        amount: i32,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        let healed = heal(&mut health, amount);
        if healed > 0 {
            events.push(SimEvent::Healed {
                target,
                source,
                amount: healed,
                remaining: health.current,
            });
        }
        healed > 0
    }
}

/// Routes status-effect ticks into the health queue as true damage.
pub struct HealthSink<'a> {
    health: &'a mut HealthSystem,
    target: Entity,
}

impl DamageSink for HealthSink<'_> {
    fn apply_damage(&mut self, amount: f32) {
        self.health.queue_damage(self.target, None, amount, DamageType::True, false);
    }
}

fn resistance(world: &World, target: Entity, damage_type: DamageType) -> f32 {
    world
        .get::<&Resistances>(target)
        .map(|r| Resistances::get(&r, damage_type))
        .unwrap_or(0.0)
}

/// Damage after resistance, truncated toward zero.
fn mitigated(amount: f32, resist: f32) -> i32 {
    (amount.max(0.0) * (1.0 - resist)) as i32
}

/// Heal clamped to max. Returns the amount actually restored.
fn heal(health: &mut Health, amount: i32) -> i32 {
    if amount <= 0 || health.current >= health.max {
        return 0;
    }
    let before = health.current;
    health.current = health.current.saturating_add(amount).min(health.max);
    health.current.saturating_sub(before)
}
