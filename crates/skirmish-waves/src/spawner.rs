//! Spawning collaborator used by the wave director.

/// Anything that can place an enemy into the world at a named spawn point.
pub trait Spawner {
    /// Id of an active spawn point that produces `enemy_type`, if any.
    fn find_spawn_point(&self, enemy_type: &str) -> Option<String>;

    /// Spawn at the given point. Returns false if nothing was spawned.
    fn spawn_now(&mut self, spawn_point: &str) -> bool;
}
