//! Tests for the gameplay systems, spawn registry and configuration.

use glam::Vec2;
use hecs::{Entity, World};

use skirmish_core::components::*;
use skirmish_core::constants::DEFAULT_FLY_SPEED;
use skirmish_core::enums::*;
use skirmish_core::events::SimEvent;
use skirmish_core::types::{Position, Velocity};

use crate::config::{ConfigError, SimConfig};
use crate::spawner::{SpawnerRegistry, WorldSpawner};
use crate::systems::aggro::AggroSystem;
use crate::systems::combat::{self, CombatSystem};
use crate::systems::health::{DamageSink, HealthSystem};
use crate::systems::{cooldown, locomotion, status};
use crate::world_setup;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn dummy(world: &mut World, hp: i32) -> Entity {
    world.spawn((Health::new(hp),))
}

// ---- Health ----

#[test]
fn test_queued_damage_applies_resistance_and_truncates() {
    let mut world = World::new();
    let target = world.spawn((
        Health::new(100),
        Resistances::default().with(DamageType::Fire, 0.5),
    ));
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_damage(target, None, 15.0, DamageType::Fire, false);
    health.queue_damage(target, None, 15.0, DamageType::True, false);
    assert_eq!(health.pending_damage(), 2);
    health.update(&world, &mut events);

    // 7 (halved, truncated) + 15 (true damage ignores resistance)
    assert_eq!(world.get::<&Health>(target).unwrap().current, 78);
    assert_eq!(health.pending_damage(), 0);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_heal_clamps_to_max() {
    let mut world = World::new();
    let target = world.spawn((Health { current: 90, max: 100 },));
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_heal(target, None, 30);
    health.update(&world, &mut events);

    assert_eq!(world.get::<&Health>(target).unwrap().current, 100);
    assert!(matches!(events[0], SimEvent::Healed { amount: 10, .. }));
}

#[test]
fn test_lethal_damage_clamps_and_dies_once() {
    let mut world = World::new();
    let target = dummy(&mut world, 20);
    let killer = dummy(&mut world, 10);
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_damage(target, Some(killer), 15.0, DamageType::Physical, false);
    health.queue_damage(target, Some(killer), 15.0, DamageType::Physical, true);
    health.update(&world, &mut events);

    assert_eq!(world.get::<&Health>(target).unwrap().current, 0);
    let deaths: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Died { .. }))
        .collect();
    assert_eq!(deaths.len(), 1, "One death per transition");
    assert_eq!(
        events.last(),
        Some(&SimEvent::Died {
            entity: target,
            killer: Some(killer),
        }),
        "Deaths are reported after all damage"
    );
}

#[test]
fn test_damage_applies_before_heals() {
    let mut world = World::new();
    let target = world.spawn((Health { current: 50, max: 100 },));
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_heal(target, None, 100);
    health.queue_damage(target, None, 30.0, DamageType::Physical, false);
    health.update(&world, &mut events);

    // 50 - 30 = 20, then healed to max.
    assert!(matches!(events[0], SimEvent::Damaged { remaining: 20, .. }));
    assert!(matches!(events[1], SimEvent::Healed { amount: 80, remaining: 100, .. }));
}

#[test]
fn test_immediate_overkill_goes_negative() {
    let mut world = World::new();
    let target = dummy(&mut world, 10);
    let health = HealthSystem::new();
    let mut events = Vec::new();

    assert!(health.apply_damage_immediate(
        &world,
        target,
        None,
        25.0,
        DamageType::Physical,
        false,
        &mut events
    ));
    assert_eq!(world.get::<&Health>(target).unwrap().current, -15);
    assert!(!health.apply_damage_immediate(
        &world,
        target,
        None,
        5.0,
        DamageType::Physical,
        false,
        &mut events
    ));
    assert!(health.heal_immediate(&world, target, None, 20, &mut events));
    assert_eq!(world.get::<&Health>(target).unwrap().current, 5);
}

#[test]
fn test_huge_heal_clamps_without_overflow() {
    let mut world = World::new();
    let target = world.spawn((Health { current: 50, max: 100 },));
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_heal(target, None, i32::MAX);
    health.update(&world, &mut events);

    assert_eq!(world.get::<&Health>(target).unwrap().current, 100);
    assert!(matches!(events[0], SimEvent::Healed { amount: 50, .. }));

    // Deep overkill, then a full heal.
    world.get::<&mut Health>(target).unwrap().current = -1000;
    assert!(health.heal_immediate(&world, target, None, i32::MAX, &mut events));
    assert_eq!(world.get::<&Health>(target).unwrap().current, 100);
    assert!(matches!(events[1], SimEvent::Healed { amount: 1100, .. }));
}

#[test]
fn test_repeated_huge_damage_saturates() {
    let mut world = World::new();
    let target = dummy(&mut world, 100);
    let health = HealthSystem::new();
    let mut events = Vec::new();

    let mut hit = |world: &World| {
        health.apply_damage_immediate(
            world,
            target,
            None,
            f32::MAX,
            DamageType::True,
            false,
            &mut events,
        )
    };
    assert!(hit(&world));
    assert!(!hit(&world));
    assert_eq!(world.get::<&Health>(target).unwrap().current, i32::MIN);

    let mut health = HealthSystem::new();
    let other = dummy(&mut world, 100);
    health.queue_damage(other, None, f32::MAX, DamageType::True, false);
    health.queue_damage(other, None, f32::MAX, DamageType::True, false);
    health.update(&world, &mut events);
    assert_eq!(world.get::<&Health>(other).unwrap().current, 0);
}

#[test]
fn test_queue_for_missing_health_is_noop() {
    let mut world = World::new();
    let rock = world.spawn((Position::default(),));
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    health.queue_damage(rock, None, 50.0, DamageType::Physical, false);
    health.queue_heal(rock, None, 50);
    health.update(&world, &mut events);
    assert!(events.is_empty());
    assert_eq!(health.pending_heals(), 0);
}

#[test]
fn test_health_sink_queues_true_damage() {
    let mut world = World::new();
    let target = world.spawn((
        Health::new(100),
        Resistances::default().with(DamageType::Poison, 1.0),
    ));
    let mut health = HealthSystem::new();
    health.sink(target).apply_damage(12.0);

    let mut events = Vec::new();
    health.update(&world, &mut events);
    assert_eq!(world.get::<&Health>(target).unwrap().current, 88);
}

// ---- Combat ----

#[test]
fn test_attack_speed_gates_attacks() {
    let mut world = World::new();
    let attacker = world.spawn((CombatProfile::new(10.0, 2.0),));
    let target = dummy(&mut world, 100);
    let mut combat = CombatSystem::new(1);
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    assert!(combat.can_attack(&world, attacker), "Never attacked: ready");
    let outcome = combat
        .attack(&world, &mut health, attacker, target, &mut events)
        .unwrap();
    assert_eq!(outcome.damage, 10.0);
    assert!(!outcome.is_crit);
    assert!(combat
        .attack(&world, &mut health, attacker, target, &mut events)
        .is_none());

    combat.update(&mut world, 0.25);
    assert!(!combat.can_attack(&world, attacker));
    combat.update(&mut world, 0.25);
    assert!(combat.can_attack(&world, attacker));

    assert_eq!(health.pending_damage(), 1);
    assert_eq!(events.len(), 1);
}

#[test]
fn test_attack_speed_buff_shortens_interval() {
    let mut world = World::new();
    let hasted = world.spawn((
        CombatProfile::new(10.0, 1.0),
        BuffContainer {
            buffs: vec![Buff::new("frenzy", StatKind::AttackSpeed, 10.0).multiplicative(2.0)],
        },
    ));
    let plain = world.spawn((CombatProfile::new(10.0, 1.0),));
    let target = dummy(&mut world, 100);
    let mut combat = CombatSystem::new(1);
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    assert!(combat.attack(&world, &mut health, hasted, target, &mut events).is_some());
    assert!(combat.attack(&world, &mut health, plain, target, &mut events).is_some());

    combat.update(&mut world, 0.5);
    assert!(combat.can_attack(&world, hasted));
    assert!(!combat.can_attack(&world, plain));
}

#[test]
fn test_attack_requires_profile_flag_and_target() {
    let mut world = World::new();
    let mut profile = CombatProfile::new(10.0, 1.0);
    profile.can_attack = false;
    let disarmed = world.spawn((profile,));
    let unarmed = world.spawn(());
    let target = dummy(&mut world, 10);
    let combat = CombatSystem::new(1);

    assert!(!combat.can_attack(&world, disarmed));
    assert!(!combat.can_attack(&world, unarmed));

    let armed = world.spawn((CombatProfile::new(10.0, 1.0),));
    world.despawn(target).unwrap();
    let mut combat = combat;
    let mut health = HealthSystem::new();
    assert!(combat
        .attack(&world, &mut health, armed, target, &mut Vec::new())
        .is_none());
}

#[test]
fn test_guaranteed_crit_is_consumed() {
    let mut world = World::new();
    let attacker = world.spawn((
        CombatProfile::new(10.0, 100.0),
        CriticalHit {
            chance: 0.0,
            multiplier: 3.0,
            guaranteed: true,
        },
    ));
    let target = dummy(&mut world, 100);
    let mut combat = CombatSystem::new(1);
    let mut health = HealthSystem::new();
    let mut events = Vec::new();

    let first = combat
        .attack(&world, &mut health, attacker, target, &mut events)
        .unwrap();
    assert!(first.is_crit);
    assert_eq!(first.damage, 30.0);
    assert!(!world.get::<&CriticalHit>(attacker).unwrap().guaranteed);

    combat.update(&mut world, 1.0);
    let second = combat
        .attack(&world, &mut health, attacker, target, &mut events)
        .unwrap();
    assert!(!second.is_crit);
    assert_eq!(second.damage, 10.0);
}

#[test]
fn test_crit_rolls_are_seeded() {
    let rolls = |seed| {
        let mut world = World::new();
        let attacker = world.spawn((
            CombatProfile::new(10.0, 100.0),
            CriticalHit {
                chance: 0.5,
                ..Default::default()
            },
        ));
        let target = dummy(&mut world, 10_000);
        let mut combat = CombatSystem::new(seed);
        let mut health = HealthSystem::new();
        let mut crits = Vec::new();
        for _ in 0..32 {
            combat.update(&mut world, 1.0);
            let outcome = combat
                .attack(&world, &mut health, attacker, target, &mut Vec::new())
                .unwrap();
            crits.push(outcome.is_crit);
        }
        crits
    };
    assert_eq!(rolls(7), rolls(7));
    assert!(rolls(7).contains(&true) && rolls(7).contains(&false));
}

#[test]
fn test_attack_buff_modifies_damage() {
    let mut world = World::new();
    let attacker = world.spawn((CombatProfile::new(10.0, 1.0),));
    let target = dummy(&mut world, 100);
    assert!(combat::apply_buff(
        &mut world,
        attacker,
        Buff::new("rage", StatKind::Attack, 5.0)
            .additive(5.0)
            .multiplicative(1.5),
    ));

    let mut combat = CombatSystem::new(1);
    let mut health = HealthSystem::new();
    let outcome = combat
        .attack(&world, &mut health, attacker, target, &mut Vec::new())
        .unwrap();
    assert_eq!(outcome.damage, 22.5);
}

#[test]
fn test_buff_stacking_caps_and_refreshes() {
    let mut world = World::new();
    let entity = world.spawn((BuffContainer::default(),));
    let buff = || Buff::new("fury", StatKind::Attack, 2.0).additive(1.0).max_stacks(2);

    combat::apply_buff(&mut world, entity, buff());
    let mut combat = CombatSystem::new(1);
    combat.update(&mut world, 1.5);
    combat::apply_buff(&mut world, entity, buff());
    combat::apply_buff(&mut world, entity, buff());

    {
        let container = world.get::<&BuffContainer>(entity).unwrap();
        assert_eq!(container.buffs.len(), 1);
        let fury = container.find("fury").unwrap();
        assert_eq!(fury.stacks, 2, "Capped at max_stacks");
        assert_eq!(fury.remaining, 2.0, "Duration refreshed");
    }

    combat.update(&mut world, 2.0);
    assert!(world.get::<&BuffContainer>(entity).unwrap().buffs.is_empty());
}

#[test]
fn test_damage_reduction_formulas() {
    assert_eq!(combat::calculate_damage(100.0, 0.0), 100.0);
    assert_eq!(combat::calculate_damage(100.0, 100.0), 50.0);
    assert!(approx(
        combat::calculate_damage_with_penetration(100.0, 100.0, 0.5),
        100.0 * (1.0 - 50.0 / 150.0)
    ));
    assert_eq!(
        combat::calculate_damage_with_penetration(100.0, 100.0, 1.0),
        100.0
    );
}

#[test]
fn test_is_in_range() {
    let mut world = World::new();
    let mut profile = CombatProfile::new(10.0, 1.0);
    profile.range = 10.0;
    let attacker = world.spawn((profile, Position::new(0.0, 0.0)));
    let near = world.spawn((Position::new(6.0, 8.0),));
    let far = world.spawn((Position::new(20.0, 0.0),));
    let nowhere = world.spawn(());
    let combat = CombatSystem::new(1);

    assert!(combat.is_in_range(&world, attacker, near));
    assert!(!combat.is_in_range(&world, attacker, far));
    assert!(!combat.is_in_range(&world, attacker, nowhere));

    world.get::<&mut CombatProfile>(attacker).unwrap().range = 0.0;
    assert!(combat.is_in_range(&world, attacker, far), "Range 0 is unlimited");
}

// ---- Status effects ----

#[test]
fn test_non_stackable_keeps_strongest() {
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::ignite(5.0, 0.3, 2.0));
    status::add_effect(&mut component, StatusEffect::ignite(5.0, 0.2, 2.0));
    assert_eq!(component.count(StatusKind::Ignite), 1);
    assert_eq!(component.strongest(StatusKind::Ignite), Some(0.3));

    status::add_effect(&mut component, StatusEffect::ignite(5.0, 0.5, 2.0));
    assert_eq!(component.count(StatusKind::Ignite), 1);
    assert_eq!(component.strongest(StatusKind::Ignite), Some(0.5));
}

#[test]
fn test_equal_magnitude_replaces() {
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::slow(1.0, 0.4));
    status::add_effect(&mut component, StatusEffect::slow(9.0, 0.4));
    assert_eq!(component.effects[0].duration, 9.0);
}

#[test]
fn test_stackable_effects_coexist() {
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::poison(3.0, 1.0));
    status::add_effect(&mut component, StatusEffect::poison(3.0, 1.0));
    status::add_effect(&mut component, StatusEffect::bleed(3.0, 1.0));
    assert_eq!(component.count(StatusKind::Poison), 2);
    assert_eq!(component.effects.len(), 3);
}

#[test]
fn test_status_expires_before_ticking() {
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::poison(3.0, 4.0));

    let mut total_ticks = 0;
    for _ in 0..5 {
        total_ticks += status::update(&mut component, 1.0).len();
    }
    // Ticks at t=1 and t=2; at t=3 the effect expires first.
    assert_eq!(total_ticks, 2);
    assert!(component.is_empty());
}

#[test]
fn test_zero_interval_never_ticks() {
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::slow(10.0, 0.5));
    for _ in 0..5 {
        assert!(status::update(&mut component, 1.0).is_empty());
    }
    assert!(component.has(StatusKind::Slow));
}

#[test]
fn test_update_and_apply_feeds_sink() {
    struct Total(f32);
    impl DamageSink for Total {
        fn apply_damage(&mut self, amount: f32) {
            self.0 += amount;
        }
    }

    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::bleed(2.0, 3.0));
    let mut sink = Total(0.0);
    for _ in 0..4 {
        status::update_and_apply(&mut component, 0.5, &mut sink);
    }
    // Bleed ticks every 0.5s; the 4th update expires it first.
    assert_eq!(sink.0, 9.0);
}

#[test]
fn test_status_run_routes_dot_to_health() {
    let mut world = World::new();
    let mut component = StatusComponent::default();
    status::add_effect(&mut component, StatusEffect::poison(10.0, 5.0));
    let target = world.spawn((Health::new(100), component));
    let bare = world.spawn((StatusComponent::default(),));
    let mut health = HealthSystem::new();

    status::run(&mut world, &mut health, 1.0);
    assert_eq!(health.pending_damage(), 1);
    health.update(&world, &mut Vec::new());

    assert_eq!(world.get::<&Health>(target).unwrap().current, 95);
    assert!(world.get::<&StatusComponent>(bare).unwrap().is_empty());
}

// ---- Cooldowns and mana ----

#[test]
fn test_single_charge_cooldown() {
    let mut world = World::new();
    let caster = world.spawn((Cooldown::new(2.0),));
    let mut events = Vec::new();

    assert!(cooldown::use_cooldown(&world, caster));
    assert!(!world.get::<&Cooldown>(caster).unwrap().is_ready());
    assert!(!cooldown::use_cooldown(&world, caster));

    cooldown::run(&mut world, 1.0, &mut events);
    assert!(events.is_empty());
    cooldown::run(&mut world, 1.0, &mut events);
    assert_eq!(events, vec![SimEvent::AbilityReady { entity: caster }]);

    cooldown::run(&mut world, 1.0, &mut events);
    assert_eq!(events.len(), 1, "Ready fires on the transition only");
}

#[test]
fn test_multi_charge_regenerates() {
    let mut cd = Cooldown::with_charges(3, 1.0);
    cd.charges = 0;
    assert!(!cd.is_ready());

    assert!(cooldown::tick_cooldown(&mut cd, 1.0));
    assert_eq!(cd.charges, 1);
    assert!(!cooldown::tick_cooldown(&mut cd, 2.5));
    assert_eq!(cd.charges, 3);
    assert_eq!(cd.charge_timer, 0.0, "Timer resets once full");
}

#[test]
fn test_mana_regen_waits_for_delay() {
    let mut mana = Mana::new(100.0, 10.0, 1.0);
    mana.current = 50.0;
    mana.delay_timer = 1.0;

    cooldown::tick_mana(&mut mana, 0.5);
    assert_eq!(mana.current, 50.0);
    cooldown::tick_mana(&mut mana, 0.5);
    assert_eq!(mana.current, 55.0, "Regen resumes once the delay hits 0");
    for _ in 0..10 {
        cooldown::tick_mana(&mut mana, 1.0);
    }
    assert_eq!(mana.current, 100.0);
}

#[test]
fn test_use_ability_is_atomic() {
    let mut world = World::new();
    let mut mana = Mana::new(100.0, 10.0, 2.0);
    mana.current = 20.0;
    let caster = world.spawn((Cooldown::new(5.0), mana));

    assert!(!cooldown::use_ability(&world, caster, 30.0));
    assert!(world.get::<&Cooldown>(caster).unwrap().is_ready());
    assert_eq!(world.get::<&Mana>(caster).unwrap().current, 20.0);

    assert!(cooldown::use_ability(&world, caster, 15.0));
    assert!(!world.get::<&Cooldown>(caster).unwrap().is_ready());
    {
        let mana = world.get::<&Mana>(caster).unwrap();
        assert_eq!(mana.current, 5.0);
        assert_eq!(mana.delay_timer, 2.0);
    }

    let no_cooldown = world.spawn((Mana::new(10.0, 0.0, 0.0),));
    assert!(!cooldown::use_ability(&world, no_cooldown, 0.0));
    let no_mana = world.spawn((Cooldown::new(1.0),));
    assert!(!cooldown::use_ability(&world, no_mana, 5.0));
    assert!(cooldown::use_ability(&world, no_mana, 0.0));
}

// ---- Aggro ----

fn holder(world: &mut World, aggro: Aggro) -> Entity {
    world.spawn((aggro,))
}

#[test]
fn test_taunt_takes_top_threat() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let c = world.spawn(());
    let e = holder(
        &mut world,
        Aggro::new(100.0, 0.0, Position::default()).with_decay(0.0),
    );
    {
        let mut aggro = world.get::<&mut Aggro>(e).unwrap();
        aggro.table.set(a, 10.0);
        aggro.table.set(b, 30.0);
    }

    let mut system = AggroSystem::default();
    assert!(system.taunt(&world, c, e));
    assert_eq!(
        world.get::<&Aggro>(e).unwrap().table.get(c),
        Some(30.0 + 9999.0)
    );

    let mut events = Vec::new();
    system.update(&world, 0.1, &mut events);
    assert_eq!(world.get::<&Aggro>(e).unwrap().current_target, Some(c));
    assert_eq!(
        events,
        vec![SimEvent::TargetChanged {
            entity: e,
            previous: None,
            current: Some(c),
        }]
    );
}

#[test]
fn test_decay_removes_exhausted_threat() {
    let mut world = World::new();
    let x = world.spawn(());
    let y = world.spawn(());
    let h = holder(
        &mut world,
        Aggro::new(10.0, 0.0, Position::default()).with_decay(10.0),
    );
    {
        let mut aggro = world.get::<&mut Aggro>(h).unwrap();
        aggro.table.set(x, 5.0);
        aggro.table.set(y, 20.0);
    }

    AggroSystem::default().update(&world, 1.0, &mut Vec::new());
    let aggro = world.get::<&Aggro>(h).unwrap();
    assert!(!aggro.table.contains(x));
    assert_eq!(aggro.table.get(y), Some(10.0));
    assert_eq!(aggro.current_target, Some(y));
}

#[test]
fn test_threat_memory_is_capped() {
    let mut world = World::new();
    let others: Vec<Entity> = (0..5).map(|_| world.spawn(())).collect();
    let h = holder(
        &mut world,
        Aggro::new(10.0, 0.0, Position::default())
            .with_decay(0.0)
            .with_memory(3),
    );
    {
        let mut aggro = world.get::<&mut Aggro>(h).unwrap();
        for (i, &other) in others.iter().enumerate() {
            aggro.table.set(other, (i + 1) as f32);
        }
    }

    AggroSystem::default().update(&world, 0.1, &mut Vec::new());
    let aggro = world.get::<&Aggro>(h).unwrap();
    assert_eq!(aggro.table.len(), 3);
    assert_eq!(aggro.current_target, Some(others[4]));
    assert!(!aggro.table.contains(others[0]));
}

#[test]
fn test_proximity_scan_skips_allies_and_dead() {
    let mut world = World::new();
    let h = world.spawn((
        Position::new(0.0, 0.0),
        Aggro::new(10.0, 0.0, Position::default()).with_decay(0.0),
        Team(1),
    ));
    let ally = world.spawn((Position::new(1.0, 0.0), Team(1)));
    let enemy = world.spawn((Position::new(2.0, 0.0), Team(0), Health::new(10)));
    let corpse = world.spawn((
        Position::new(3.0, 0.0),
        Team(0),
        Health { current: 0, max: 10 },
    ));
    let distant = world.spawn((Position::new(50.0, 0.0), Team(0)));

    AggroSystem::default().update(&world, 0.1, &mut Vec::new());
    let aggro = world.get::<&Aggro>(h).unwrap();
    assert!(aggro.table.contains(enemy));
    assert_eq!(aggro.table.get(enemy), Some(1.0));
    for skipped in [ally, corpse, distant] {
        assert!(!aggro.table.contains(skipped));
    }
}

#[test]
fn test_leash_clears_and_recovers() {
    let mut world = World::new();
    let h = world.spawn((
        Position::new(0.0, 0.0),
        Aggro::new(10.0, 50.0, Position::new(0.0, 0.0)).with_decay(0.0),
    ));
    let t = world.spawn((Position::new(5.0, 0.0), Health::new(10)));
    let mut system = AggroSystem::default();
    let mut events = Vec::new();

    system.update(&world, 0.1, &mut events);
    assert_eq!(world.get::<&Aggro>(h).unwrap().current_target, Some(t));

    world.get::<&mut Position>(h).unwrap().x = 60.0;
    events.clear();
    system.update(&world, 0.1, &mut events);
    {
        let aggro = world.get::<&Aggro>(h).unwrap();
        assert!(aggro.leashed);
        assert!(aggro.table.is_empty());
        assert_eq!(aggro.current_target, None);
    }
    assert_eq!(
        events,
        vec![SimEvent::TargetChanged {
            entity: h,
            previous: Some(t),
            current: None,
        }]
    );

    // Threat against a leashed entity is discarded.
    system.add_damage_threat(h, t, 50.0);
    world.get::<&mut Position>(h).unwrap().x = 20.0;
    events.clear();
    system.update(&world, 0.1, &mut events);
    assert!(events.is_empty());
    assert!(world.get::<&Aggro>(h).unwrap().table.is_empty());
    assert_eq!(system.pending_threat(), 0);

    // Back within half the aggro range of the anchor.
    world.get::<&mut Position>(h).unwrap().x = 4.0;
    system.update(&world, 0.1, &mut events);
    let aggro = world.get::<&Aggro>(h).unwrap();
    assert!(!aggro.leashed);
    assert_eq!(aggro.current_target, Some(t));
}

#[test]
fn test_prune_drops_despawned_and_dead() {
    let mut world = World::new();
    let gone = world.spawn(());
    let dead = world.spawn((Health { current: 0, max: 5 },));
    let h = holder(
        &mut world,
        Aggro::new(10.0, 0.0, Position::default()).with_decay(0.0),
    );
    {
        let mut aggro = world.get::<&mut Aggro>(h).unwrap();
        aggro.table.set(gone, 5.0);
        aggro.table.set(dead, 5.0);
    }
    world.despawn(gone).unwrap();

    AggroSystem::default().update(&world, 0.1, &mut Vec::new());
    assert!(world.get::<&Aggro>(h).unwrap().table.is_empty());
}

#[test]
fn test_damage_and_healing_threat() {
    let mut world = World::new();
    let attacker = world.spawn(());
    let ally = world.spawn(());
    let healer = world.spawn(());
    let h = holder(
        &mut world,
        Aggro::new(10.0, 0.0, Position::default()).with_decay(0.0),
    );
    world.get::<&mut Aggro>(h).unwrap().table.set(ally, 1.0);

    let mut system = AggroSystem::default();
    system.add_damage_threat(h, attacker, 12.0);
    system.add_healing_threat(healer, ally, 20.0);
    assert_eq!(system.pending_threat(), 2);

    system.update(&world, 0.1, &mut Vec::new());
    let aggro = world.get::<&Aggro>(h).unwrap();
    assert_eq!(aggro.table.get(attacker), Some(12.0));
    assert_eq!(aggro.table.get(healer), Some(10.0));
    assert_eq!(aggro.current_target, Some(attacker));
}

// ---- Locomotion ----

#[test]
fn test_jump_once_until_landing() {
    let mut jump = Jump::default();
    assert!(locomotion::try_jump(&mut jump));
    assert!(jump.is_jumping);
    assert_eq!(jump.vertical_velocity, -jump.jump_force);
    assert!(!locomotion::try_jump(&mut jump));

    assert!(locomotion::land(&mut jump), "Failed attempt was buffered");
    locomotion::land(&mut jump);
    assert!(jump.grounded);
    assert_eq!(jump.jumps_remaining, 1);
    assert!(locomotion::try_jump(&mut jump));
}

#[test]
fn test_double_jump() {
    let mut jump = Jump::default().with_max_jumps(2);
    assert!(locomotion::try_jump(&mut jump));
    assert!(locomotion::try_jump(&mut jump));
    assert!(!locomotion::try_jump(&mut jump));
    assert_eq!(jump.jumps_remaining, 0);
}

#[test]
fn test_jump_buffer_expires() {
    let mut world = World::new();
    let mut jump = Jump::default();
    locomotion::try_jump(&mut jump);
    locomotion::try_jump(&mut jump);
    let e = world.spawn((Velocity::default(), jump));

    locomotion::run(&mut world, 0.5);
    let mut jump = world.get::<&mut Jump>(e).unwrap();
    assert_eq!(jump.jump_buffer_timer, 0.0);
    assert!(!locomotion::land(&mut jump));
}

#[test]
fn test_coyote_window() {
    let mut jump = Jump::default().with_max_jumps(0);
    locomotion::leave_ground(&mut jump);
    assert!(!jump.grounded);
    assert_eq!(jump.coyote_timer, jump.coyote_time);
    assert!(locomotion::try_jump(&mut jump), "Within coyote time");

    let mut late = Jump::default().with_max_jumps(0);
    locomotion::leave_ground(&mut late);
    let mut world = World::new();
    let e = world.spawn((Velocity::default(), late));
    locomotion::run(&mut world, 0.2);
    let mut late = world.get::<&mut Jump>(e).unwrap();
    assert!(!locomotion::try_jump(&mut late));
}

#[test]
fn test_gravity_and_terminal_velocity() {
    let mut world = World::new();
    let mut jump = Jump::default();
    locomotion::try_jump(&mut jump);
    let e = world.spawn((Velocity::default(), jump));

    locomotion::run(&mut world, 0.1);
    assert!(approx(world.get::<&Velocity>(e).unwrap().y, -322.0));

    world.get::<&mut Jump>(e).unwrap().vertical_velocity = 890.0;
    locomotion::run(&mut world, 0.1);
    let jump = world.get::<&Jump>(e).unwrap();
    assert_eq!(jump.vertical_velocity, jump.terminal_velocity);
    assert!(jump.is_falling);
}

#[test]
fn test_dash_overrides_then_cools_down() {
    let mut world = World::new();
    let e = world.spawn((
        Position::default(),
        Velocity::default(),
        Movement::default(),
        Dash::default(),
    ));
    assert!(locomotion::try_dash(
        &mut world.get::<&mut Dash>(e).unwrap(),
        Vec2::X
    ));
    assert!(!locomotion::try_dash(
        &mut world.get::<&mut Dash>(e).unwrap(),
        Vec2::X
    ));

    locomotion::run(&mut world, 0.05);
    assert_eq!(*world.get::<&Velocity>(e).unwrap(), Velocity::new(600.0, 0.0));
    assert!(approx(world.get::<&Position>(e).unwrap().x, 30.0));

    locomotion::run(&mut world, 0.2);
    assert_eq!(*world.get::<&Velocity>(e).unwrap(), Velocity::default());
    assert!(!locomotion::try_dash(
        &mut world.get::<&mut Dash>(e).unwrap(),
        Vec2::X
    ));

    locomotion::run(&mut world, 1.0);
    assert!(locomotion::try_dash(
        &mut world.get::<&mut Dash>(e).unwrap(),
        Vec2::NEG_Y
    ));
}

#[test]
fn test_fuel_flight_drains_and_regenerates() {
    let mut world = World::new();
    let e = world.spawn((Velocity::default(), Flight::fuel_based(10.0, 5.0, 1.0)));
    assert!(locomotion::toggle_flight(
        &mut world.get::<&mut Flight>(e).unwrap()
    ));

    locomotion::run(&mut world, 1.0);
    assert!(world.get::<&Flight>(e).unwrap().is_flying);
    locomotion::run(&mut world, 1.0);
    {
        let flight = world.get::<&Flight>(e).unwrap();
        assert!(!flight.is_flying, "Auto-stops when fuel runs out");
        assert_eq!(flight.fuel, 0.0);
    }
    assert!(!locomotion::start_flight(
        &mut world.get::<&mut Flight>(e).unwrap()
    ));

    locomotion::run(&mut world, 1.0);
    assert_eq!(world.get::<&Flight>(e).unwrap().fuel, 1.0);
}

#[test]
fn test_duration_flight_stops() {
    let mut flight = Flight::duration_based(1.0);
    assert!(locomotion::start_flight(&mut flight));
    let mut world = World::new();
    let e = world.spawn((Velocity::default(), flight));

    locomotion::run(&mut world, 0.6);
    assert!(world.get::<&Flight>(e).unwrap().is_flying);
    locomotion::run(&mut world, 0.6);
    let mut flight = world.get::<&mut Flight>(e).unwrap();
    assert!(!flight.is_flying);
    assert!(!locomotion::start_flight(&mut flight));
    locomotion::reset_flight_on_landing(&mut flight);
    assert!(locomotion::start_flight(&mut flight));
}

#[test]
fn test_acceleration_and_deceleration() {
    let mut world = World::new();
    let mut movement = Movement::default();
    movement.set_intent(Vec2::new(3.0, 0.0));
    let e = world.spawn((Position::default(), Velocity::default(), movement));

    locomotion::run(&mut world, 0.1);
    assert!(approx(world.get::<&Velocity>(e).unwrap().x, 90.0));
    locomotion::run(&mut world, 0.1);
    assert!(approx(world.get::<&Velocity>(e).unwrap().x, 120.0), "Clamped");
    assert!(approx(world.get::<&Position>(e).unwrap().x, 21.0));

    world.get::<&mut Movement>(e).unwrap().set_intent(Vec2::ZERO);
    locomotion::run(&mut world, 0.1);
    assert_eq!(world.get::<&Velocity>(e).unwrap().x, 0.0, "Snaps to zero");
}

#[test]
fn test_slow_and_move_speed_buffs_scale_top_speed() {
    let mut world = World::new();
    let mut movement = Movement::default();
    movement.set_intent(Vec2::X);
    let slowed = world.spawn((
        Velocity::default(),
        movement.clone(),
        StatusComponent {
            effects: vec![StatusEffect::slow(10.0, 0.3), StatusEffect::slow(10.0, 0.5)],
        },
    ));
    let hasted = world.spawn((
        Velocity::default(),
        movement,
        BuffContainer {
            buffs: vec![Buff::new("swift", StatKind::MoveSpeed, 10.0).multiplicative(1.5)],
        },
    ));

    for _ in 0..5 {
        locomotion::run(&mut world, 0.1);
    }

    // Strongest slow wins: 120 * 0.5.
    assert!(approx(world.get::<&Velocity>(slowed).unwrap().x, 60.0));
    assert!(approx(world.get::<&Velocity>(hasted).unwrap().x, 180.0));
    assert!(approx(locomotion::effective_max_speed(100.0, None, None), 100.0));
}

#[test]
fn test_flying_uses_fly_speed_and_ignores_gravity() {
    let mut world = World::new();
    let mut movement = Movement::default();
    movement.set_intent(Vec2::NEG_Y);
    let mut flight = Flight::unlimited();
    locomotion::start_flight(&mut flight);
    let mut jump = Jump::default();
    jump.grounded = false;
    let e = world.spawn((Velocity::default(), movement, flight, jump));

    for _ in 0..10 {
        locomotion::run(&mut world, 0.1);
    }
    let v = *world.get::<&Velocity>(e).unwrap();
    assert!(approx(v.y, -DEFAULT_FLY_SPEED));
    assert_eq!(world.get::<&Jump>(e).unwrap().vertical_velocity, 0.0);
}

// ---- Spawner registry ----

#[test]
fn test_spawn_points_respect_active_flag() {
    let mut registry = SpawnerRegistry::new();
    world_setup::register_enemy_factories(&mut registry);
    registry.add_spawn_point("a", world_setup::GOBLIN, Position::new(1.0, 0.0));
    registry.add_spawn_point("b", world_setup::GOBLIN, Position::new(2.0, 0.0));

    assert_eq!(registry.find_spawn_point("goblin").unwrap().id, "a");
    registry.set_active("a", false);
    registry.set_active("nope", false);
    assert_eq!(registry.find_spawn_point("goblin").unwrap().id, "b");
    registry.set_active("b", false);
    assert!(registry.find_spawn_point("goblin").is_none());
    assert!(registry.find_spawn_point("dragon").is_none());
}

#[test]
fn test_spawn_now_tags_wave_member() {
    let mut world = World::new();
    let mut registry = SpawnerRegistry::new();
    world_setup::register_enemy_factories(&mut registry);
    registry.add_spawn_point("gate", world_setup::ORC, Position::new(5.0, 5.0));
    registry.add_spawn_point("void", "dragon", Position::default());

    let orc = registry.spawn_now(&mut world, "gate", 3).unwrap();
    assert_eq!(*world.get::<&WaveMember>(orc).unwrap(), WaveMember { wave: 3 });
    assert_eq!(*world.get::<&Position>(orc).unwrap(), Position::new(5.0, 5.0));
    assert!(registry.spawn_now(&mut world, "void", 3).is_none(), "No factory");
    assert!(registry.spawn_now(&mut world, "missing", 3).is_none());

    let mut spawner = WorldSpawner::new(&registry, &mut world, 4);
    use skirmish_waves::Spawner;
    let point = spawner.find_spawn_point("orc").unwrap();
    assert!(spawner.spawn_now(&point));
    let spawned = spawner.into_spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(world.get::<&WaveMember>(spawned[0]).unwrap().wave, 4);
}

// ---- Config ----

#[test]
fn test_config_defaults_and_generation() {
    let config = SimConfig::from_json_str(
        r#"{ "seed": 9, "generate": { "count": 3, "base": { "goblin": 2 }, "scaling": 0.5 } }"#,
    )
    .unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.taunt_bonus, 9999.0);
    let plan = config.wave_plan();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan[2].enemies["goblin"], 4);

    assert!(SimConfig::default().wave_plan().is_empty());
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        SimConfig::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        SimConfig::load("/definitely/not/here.json"),
        Err(ConfigError::Io(_))
    ));
}
