//! Status effect system: expiry, periodic ticks and damage-over-time.

use hecs::{Entity, World};

use skirmish_core::components::{Health, StatusComponent, StatusEffect};
use skirmish_core::enums::StatusKind;

use crate::systems::health::{DamageSink, HealthSystem};

/// One periodic tick of an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusTick {
    pub kind: StatusKind,
    pub damage: f32,
    pub source: Option<Entity>,
}

/// Add an effect. Stackable effects always append. A non-stackable effect
/// replaces an existing one of the same kind only if at least as strong.
pub fn add_effect(component: &mut StatusComponent, effect: StatusEffect) {
    if effect.stackable {
        component.effects.push(effect);
        return;
    }
    match component
        .effects
        .iter_mut()
        .find(|e| e.kind == effect.kind && !e.stackable)
    {
        Some(existing) => {
            if effect.magnitude >= existing.magnitude {
                *existing = effect;
            }
        }
        None => component.effects.push(effect),
    }
}

/// Expire finished effects, then advance tick timers of the survivors.
pub fn update(component: &mut StatusComponent, dt: f32) -> Vec<StatusTick> {
    component.effects.retain_mut(|e| {
        e.duration -= dt;
        e.duration > 0.0
    });

    let mut ticks = Vec::new();
    for effect in &mut component.effects {
        if effect.tick_interval <= 0.0 {
            continue;
        }
        effect.tick_timer += dt;
        if effect.tick_timer >= effect.tick_interval {
            effect.tick_timer -= effect.tick_interval;
            ticks.push(StatusTick {
                kind: effect.kind,
                damage: effect.damage_per_tick,
                source: effect.source,
            });
        }
    }
    ticks
}

/// `update`, forwarding each tick's damage to `sink`.
pub fn update_and_apply(
    component: &mut StatusComponent,
    dt: f32,
    sink: &mut impl DamageSink,
) -> Vec<StatusTick> {
    let ticks = update(component, dt);
    for tick in &ticks {
        if tick.damage > 0.0 {
            sink.apply_damage(tick.damage);
        }
    }
    ticks
}

/// Update every status component. Entities with health take their
/// damage-over-time through the health queue.
pub fn run(world: &mut World, health: &mut HealthSystem, dt: f32) {
    for (entity, (status, pool)) in
        world.query_mut::<(&mut StatusComponent, Option<&Health>)>()
    {
        if pool.is_some() {
            update_and_apply(status, dt, &mut health.sink(entity));
        } else {
            update(status, dt);
        }
    }
}
