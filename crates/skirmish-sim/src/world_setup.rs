//! Entity spawn factories for setting up an arena.
//!
//! Creates the player and enemy archetypes with appropriate component
//! bundles, and registers the enemy factories with a spawner registry.

use hecs::{EntityBuilder, World};

use skirmish_core::components::*;
use skirmish_core::constants::*;
use skirmish_core::enums::DamageType;
use skirmish_core::types::{Position, Velocity};

use crate::spawner::SpawnerRegistry;

/// Enemy types the default arena knows how to build.
pub const GOBLIN: &str = "goblin";
pub const ORC: &str = "orc";

/// Set up the default arena: the player at `origin` plus goblin and orc
/// spawn points on either side of it.
pub fn setup_arena(
    world: &mut World,
    registry: &mut SpawnerRegistry,
    origin: Position,
) -> hecs::Entity {
    register_enemy_factories(registry);
    registry.add_spawn_point("west_gate", GOBLIN, Position::new(origin.x - 30.0, origin.y));
    registry.add_spawn_point("east_gate", GOBLIN, Position::new(origin.x + 30.0, origin.y));
    registry.add_spawn_point("north_gate", ORC, Position::new(origin.x, origin.y - 40.0));
    spawn_player(world, origin)
}

pub fn register_enemy_factories(registry: &mut SpawnerRegistry) {
    registry.register_factory(GOBLIN, spawn_goblin);
    registry.register_factory(ORC, spawn_orc);
}

/// Spawn the player with every combat and locomotion component.
pub fn spawn_player(world: &mut World, position: Position) -> hecs::Entity {
    let mut combat = CombatProfile::new(25.0, 2.0);
    combat.defense = 20.0;
    combat.range = 60.0;

    let mut builder = EntityBuilder::new();
    builder
        .add_bundle((position, Velocity::default(), Health::new(500), combat))
        .add(CriticalHit {
            chance: 0.1,
            ..Default::default()
        })
        .add(BuffContainer::default())
        .add(StatusComponent::default())
        .add(Cooldown::new(4.0))
        .add(Mana::new(100.0, 5.0, 1.5))
        // Proximity-only threat: the player never leashes.
        .add(Aggro::new(60.0, 0.0, position))
        .add(AutoAttack)
        .add(Team(PLAYER_TEAM))
        .add_bundle((
            Movement::default(),
            Jump::default(),
            Dash::default(),
            Flight::default(),
        ));
    world.spawn(builder.build())
}

/// Weak melee enemy, leashed to where it spawned.
pub fn spawn_goblin(world: &mut World, position: Position) -> hecs::Entity {
    let mut combat = CombatProfile::new(6.0, 1.0);
    combat.range = 40.0;

    world.spawn((
        position,
        Velocity::default(),
        Health::new(40),
        combat,
        StatusComponent::default(),
        Aggro::new(200.0, 400.0, position),
        AutoAttack,
        Team(ENEMY_TEAM),
        Movement::default(),
    ))
}

/// Slow, tough enemy that shrugs off physical damage.
pub fn spawn_orc(world: &mut World, position: Position) -> hecs::Entity {
    let mut combat = CombatProfile::new(14.0, 0.5);
    combat.range = 50.0;
    combat.defense = 40.0;

    world.spawn((
        position,
        Velocity::default(),
        Health::new(120),
        combat,
        Resistances::default().with(DamageType::Physical, 0.25),
        StatusComponent::default(),
        Aggro::new(250.0, 500.0, position).with_decay(0.5),
        AutoAttack,
        Team(ENEMY_TEAM),
        Movement {
            base_speed: DEFAULT_BASE_SPEED * 0.75,
            ..Default::default()
        },
    ))
}
