//! Cooldown and mana economy.

use hecs::{Entity, World};
use tracing::trace;

use skirmish_core::components::{Cooldown, Mana};
use skirmish_core::events::SimEvent;

/// Tick every cooldown and mana pool. Emits `AbilityReady` for cooldowns
/// that became ready during this update.
pub fn run(world: &mut World, dt: f32, events: &mut Vec<SimEvent>) {
    for (entity, cooldown) in world.query_mut::<&mut Cooldown>() {
        if tick_cooldown(cooldown, dt) {
            trace!(?entity, "ability ready");
            events.push(SimEvent::AbilityReady { entity });
        }
    }
    for (_entity, mana) in world.query_mut::<&mut Mana>() {
        tick_mana(mana, dt);
    }
}

/// Returns true on a not-ready → ready transition.
pub fn tick_cooldown(cooldown: &mut Cooldown, dt: f32) -> bool {
    let was_ready = cooldown.is_ready();

    if cooldown.max_charges > 1 {
        if cooldown.charges < cooldown.max_charges {
            if cooldown.charge_time <= 0.0 {
                cooldown.charges = cooldown.max_charges;
            } else {
                cooldown.charge_timer += dt;
                while cooldown.charge_timer >= cooldown.charge_time
                    && cooldown.charges < cooldown.max_charges
                {
                    cooldown.charge_timer -= cooldown.charge_time;
                    cooldown.charges += 1;
                }
            }
            if cooldown.charges >= cooldown.max_charges {
                cooldown.charge_timer = 0.0;
            }
        }
    } else {
        cooldown.remaining = (cooldown.remaining - dt).max(0.0);
    }

    !was_ready && cooldown.is_ready()
}

pub fn tick_mana(mana: &mut Mana, dt: f32) {
    if mana.delay_timer > 0.0 {
        mana.delay_timer = (mana.delay_timer - dt).max(0.0);
    }
    if mana.delay_timer <= 0.0 {
        mana.current = (mana.current + mana.regen * dt).clamp(0.0, mana.max);
    }
}

/// Spend one use: a charge, or the whole single-charge cooldown.
fn consume(cooldown: &mut Cooldown) {
    if cooldown.max_charges > 1 {
        cooldown.charges = cooldown.charges.saturating_sub(1);
    } else {
        cooldown.remaining = cooldown.duration;
    }
}

fn spend(mana: &mut Mana, cost: f32) {
    mana.current = (mana.current - cost).clamp(0.0, mana.max);
    mana.delay_timer = mana.regen_delay;
}

/// Consume the entity's cooldown if it is ready.
pub fn use_cooldown(world: &World, entity: Entity) -> bool {
    let Ok(mut cooldown) = world.get::<&mut Cooldown>(entity) else {
        return false;
    };
    if !cooldown.is_ready() {
        return false;
    }
    consume(&mut cooldown);
    true
}

/// Check cooldown and mana together, committing both or neither.
pub fn use_ability(world: &World, entity: Entity, mana_cost: f32) -> bool {
    let Ok(mut cooldown) = world.get::<&mut Cooldown>(entity) else {
        return false;
    };
    if !cooldown.is_ready() {
        return false;
    }

    if mana_cost > 0.0 {
        let Ok(mut mana) = world.get::<&mut Mana>(entity) else {
            return false;
        };
        if !mana.can_afford(mana_cost) {
            return false;
        }
        spend(&mut mana, mana_cost);
    }

    consume(&mut cooldown);
    true
}
