//! Spawn points and enemy factories, exposed to the wave director through
//! the `Spawner` trait.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::{debug, warn};

use skirmish_core::components::WaveMember;
use skirmish_core::types::Position;
use skirmish_waves::Spawner;

/// Builds one enemy of a type at a position.
pub type SpawnFactory = Box<dyn Fn(&mut World, Position) -> Entity + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub id: String,
    pub enemy_type: String,
    pub position: Position,
    pub active: bool,
}

#[derive(Default)]
pub struct SpawnerRegistry {
    factories: HashMap<String, SpawnFactory>,
    /// Registration order; the first active match wins.
    points: Vec<SpawnPoint>,
}

impl SpawnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for an enemy type.
    pub fn register_factory<F>(&mut self, enemy_type: impl Into<String>, factory: F)
    where
        F: Fn(&mut World, Position) -> Entity + Send + Sync + 'static,
    {
        self.factories.insert(enemy_type.into(), Box::new(factory));
    }

    pub fn has_factory(&self, enemy_type: &str) -> bool {
        self.factories.contains_key(enemy_type)
    }

    /// Add an active spawn point, replacing any point with the same id.
    pub fn add_spawn_point(
        &mut self,
        id: impl Into<String>,
        enemy_type: impl Into<String>,
        position: Position,
    ) {
        let point = SpawnPoint {
            id: id.into(),
            enemy_type: enemy_type.into(),
            position,
            active: true,
        };
        match self.points.iter_mut().find(|p| p.id == point.id) {
            Some(existing) => *existing = point,
            None => self.points.push(point),
        }
    }

    /// Enable or disable a spawn point. Unknown ids are ignored.
    pub fn set_active(&mut self, id: &str, active: bool) {
        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.active = active;
        }
    }

    pub fn spawn_point(&self, id: &str) -> Option<&SpawnPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.points
    }

    /// First active spawn point producing `enemy_type`.
    pub fn find_spawn_point(&self, enemy_type: &str) -> Option<&SpawnPoint> {
        self.points
            .iter()
            .find(|p| p.active && p.enemy_type == enemy_type)
    }

    /// Spawn at a point right away, tagging the entity with its wave.
    pub fn spawn_now(&self, world: &mut World, id: &str, wave: u32) -> Option<Entity> {
        let point = self.spawn_point(id)?;
        if !point.active {
            return None;
        }
        let Some(factory) = self.factories.get(&point.enemy_type) else {
            warn!(enemy_type = %point.enemy_type, spawn_point = id, "no factory registered");
            return None;
        };
        let entity = factory(world, point.position);
        world.insert_one(entity, WaveMember { wave }).ok()?;
        debug!(?entity, enemy_type = %point.enemy_type, spawn_point = id, wave, "spawned");
        Some(entity)
    }
}

/// Borrows the registry and world for one wave-director update.
pub struct WorldSpawner<'a> {
    registry: &'a SpawnerRegistry,
    world: &'a mut World,
    wave: u32,
    spawned: Vec<Entity>,
}

impl<'a> WorldSpawner<'a> {
    pub fn new(registry: &'a SpawnerRegistry, world: &'a mut World, wave: u32) -> Self {
        Self {
            registry,
            world,
            wave,
            spawned: Vec::new(),
        }
    }

    /// Entities spawned through this adapter, in order.
    pub fn into_spawned(self) -> Vec<Entity> {
        self.spawned
    }
}

impl Spawner for WorldSpawner<'_> {
    fn find_spawn_point(&self, enemy_type: &str) -> Option<String> {
        self.registry
            .find_spawn_point(enemy_type)
            .map(|p| p.id.clone())
    }

    fn spawn_now(&mut self, spawn_point: &str) -> bool {
        match self.registry.spawn_now(self.world, spawn_point, self.wave) {
            Some(entity) => {
                self.spawned.push(entity);
                true
            }
            None => false,
        }
    }
}
