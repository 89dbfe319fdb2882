//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes queued commands,
//! and runs every system in a fixed order each tick:
//! locomotion → cooldowns → status effects → combat → health → aggro →
//! waves. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::{Entity, World};
use tracing::debug;

use skirmish_core::commands::SimCommand;
use skirmish_core::components::{
    Aggro, AutoAttack, Buff, Dash, Flight, Health, Jump, Movement, StatusComponent, StatusEffect,
    WaveMember,
};
use skirmish_core::enums::{DamageType, MovementMode, WavePhase};
use skirmish_core::events::SimEvent;
use skirmish_core::types::SimTime;
use skirmish_waves::{WaveConfig, WaveDirector, WaveEvent};

use crate::config::SimConfig;
use crate::spawner::{SpawnerRegistry, WorldSpawner};
use crate::systems;
use crate::systems::aggro::AggroSystem;
use crate::systems::combat::{AttackOutcome, CombatSystem};
use crate::systems::health::HealthSystem;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    health: HealthSystem,
    combat: CombatSystem,
    aggro: AggroSystem,
    waves: WaveDirector,
    spawner: SpawnerRegistry,
    command_queue: VecDeque<SimCommand>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            health: HealthSystem::new(),
            combat: CombatSystem::new(config.seed),
            aggro: AggroSystem::new(
                config.damage_threat_multiplier,
                config.healing_threat_multiplier,
                config.taunt_bonus,
            ),
            // Separate stream so crit rolls don't shift wave shuffles.
            waves: WaveDirector::new(config.wave_plan(), config.seed.wrapping_add(1)),
            spawner: SpawnerRegistry::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds. Returns every event produced
    /// since the last tick or drain, in emission order.
    pub fn tick(&mut self, dt: f32) -> Vec<SimEvent> {
        self.process_commands();
        self.run_systems(dt);
        self.time.advance(dt);
        std::mem::take(&mut self.events)
    }

    /// Take events produced outside a tick (immediate damage, wave skips).
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for spawning and external collaborators.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn spawner(&self) -> &SpawnerRegistry {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut SpawnerRegistry {
        &mut self.spawner
    }

    /// World and spawn registry together, for arena setup.
    pub fn setup_parts(&mut self) -> (&mut World, &mut SpawnerRegistry) {
        (&mut self.world, &mut self.spawner)
    }

    pub fn waves(&self) -> &WaveDirector {
        &self.waves
    }

    pub fn health(&self) -> &HealthSystem {
        &self.health
    }

    pub fn combat(&self) -> &CombatSystem {
        &self.combat
    }

    pub fn aggro(&self) -> &AggroSystem {
        &self.aggro
    }

    // ---- Health ----

    pub fn queue_damage(
        &mut self,
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        damage_type: DamageType,
        is_crit: bool,
    ) {
        self.health.queue_damage(target, source, amount, damage_type, is_crit);
    }

    pub fn queue_heal(&mut self, target: Entity, source: Option<Entity>, amount: i32) {
        self.health.queue_heal(target, source, amount);
    }

    /// Damage right now. Returns true if the target died.
    pub fn apply_damage_immediate(
        &mut self,
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        damage_type: DamageType,
        is_crit: bool,
    ) -> bool {
        let from = self.events.len();
        let died = self.health.apply_damage_immediate(
            &self.world,
            target,
            source,
            amount,
            damage_type,
            is_crit,
            &mut self.events,
        );
        self.route_health_events(from);
        died
    }

    /// Heal right now. Returns true if any health was restored.
    pub fn heal_immediate(&mut self, target: Entity, source: Option<Entity>, amount: i32) -> bool {
        let from = self.events.len();
        let healed = self
            .health
            .heal_immediate(&self.world, target, source, amount, &mut self.events);
        self.route_health_events(from);
        healed
    }

    // ---- Combat ----

    pub fn can_attack(&self, attacker: Entity) -> bool {
        self.combat.can_attack(&self.world, attacker)
    }

    pub fn attack(&mut self, attacker: Entity, target: Entity) -> Option<AttackOutcome> {
        self.combat.attack(
            &self.world,
            &mut self.health,
            attacker,
            target,
            &mut self.events,
        )
    }

    pub fn apply_buff(&mut self, entity: Entity, buff: Buff) -> bool {
        systems::combat::apply_buff(&mut self.world, entity, buff)
    }

    /// Add a status effect, attaching a `StatusComponent` if needed.
    pub fn apply_status(&mut self, entity: Entity, effect: StatusEffect) -> bool {
        if let Ok(mut status) = self.world.get::<&mut StatusComponent>(entity) {
            systems::status::add_effect(&mut status, effect);
            return true;
        }
        let mut status = StatusComponent::default();
        systems::status::add_effect(&mut status, effect);
        self.world.insert_one(entity, status).is_ok()
    }

    // ---- Aggro ----

    pub fn taunt(&mut self, taunter: Entity, target: Entity) -> bool {
        self.aggro.taunt(&self.world, taunter, target)
    }

    pub fn current_target(&self, entity: Entity) -> Option<Entity> {
        self.world
            .get::<&Aggro>(entity)
            .ok()
            .and_then(|aggro| aggro.current_target)
    }

    // ---- Resources ----

    pub fn use_ability(&mut self, entity: Entity, mana_cost: f32) -> bool {
        systems::cooldown::use_ability(&self.world, entity, mana_cost)
    }

    // ---- Locomotion ----

    /// Set movement intent. A zero direction stops.
    pub fn set_move_intent(&mut self, entity: Entity, direction: Vec2) -> bool {
        match self.world.get::<&mut Movement>(entity) {
            Ok(mut movement) => {
                movement.set_intent(direction);
                true
            }
            Err(_) => false,
        }
    }

    /// Switch walk/run/sprint/etc. Takes effect on the next locomotion pass.
    pub fn set_movement_mode(&mut self, entity: Entity, mode: MovementMode) -> bool {
        match self.world.get::<&mut Movement>(entity) {
            Ok(mut movement) => {
                movement.mode = mode;
                true
            }
            Err(_) => false,
        }
    }

    pub fn try_jump(&mut self, entity: Entity) -> bool {
        match self.world.get::<&mut Jump>(entity) {
            Ok(mut jump) => systems::locomotion::try_jump(&mut jump),
            Err(_) => false,
        }
    }

    /// Report ground contact. Returns true if a buffered jump fired.
    pub fn land(&mut self, entity: Entity) -> bool {
        if let Ok(mut flight) = self.world.get::<&mut Flight>(entity) {
            systems::locomotion::reset_flight_on_landing(&mut flight);
        }
        match self.world.get::<&mut Jump>(entity) {
            Ok(mut jump) => systems::locomotion::land(&mut jump),
            Err(_) => false,
        }
    }

    pub fn leave_ground(&mut self, entity: Entity) {
        if let Ok(mut jump) = self.world.get::<&mut Jump>(entity) {
            systems::locomotion::leave_ground(&mut jump);
        }
    }

    /// Dash along `direction`, or along the facing for a zero direction.
    pub fn try_dash(&mut self, entity: Entity, direction: Vec2) -> bool {
        let direction = if direction == Vec2::ZERO {
            self.world
                .get::<&Movement>(entity)
                .map(|m| m.facing)
                .unwrap_or(Vec2::X)
        } else {
            direction
        };
        match self.world.get::<&mut Dash>(entity) {
            Ok(mut dash) => systems::locomotion::try_dash(&mut dash, direction),
            Err(_) => false,
        }
    }

    /// Returns whether the entity is flying afterwards.
    pub fn toggle_flight(&mut self, entity: Entity) -> bool {
        let Ok(mut flight) = self.world.get::<&mut Flight>(entity) else {
            return false;
        };
        let flying = systems::locomotion::toggle_flight(&mut flight);
        if flying {
            if let Ok(mut jump) = self.world.get::<&mut Jump>(entity) {
                jump.vertical_velocity = 0.0;
                jump.grounded = false;
                jump.is_jumping = false;
                jump.is_falling = false;
            }
        }
        flying
    }

    // ---- Waves ----

    /// Replace the wave plan. Only allowed while the director is idle.
    pub fn set_waves(&mut self, waves: Vec<WaveConfig>) -> bool {
        self.waves.set_waves(waves)
    }

    pub fn start_waves(&mut self) -> bool {
        self.waves.start_waves()
    }

    pub fn skip_wave(&mut self) -> bool {
        let skipped = self.waves.skip_wave();
        self.collect_wave_events();
        skipped
    }

    /// Back to `Idle`. Survivors of the abandoned run lose their wave tag.
    pub fn reset_waves(&mut self) -> bool {
        if !self.waves.reset() {
            return false;
        }
        let tagged: Vec<Entity> = self
            .world
            .query::<&WaveMember>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in tagged {
            let _ = self.world.remove_one::<WaveMember>(entity);
        }
        true
    }

    pub fn wave_phase(&self) -> WavePhase {
        self.waves.phase()
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command. Rejected commands are dropped.
    fn handle_command(&mut self, command: SimCommand) {
        let accepted = match command {
            SimCommand::Attack { attacker, target } => self.attack(attacker, target).is_some(),
            SimCommand::ApplyBuff { entity, buff } => self.apply_buff(entity, buff),
            SimCommand::ApplyStatus { entity, effect } => self.apply_status(entity, effect),
            SimCommand::Taunt { taunter, target } => self.taunt(taunter, target),
            SimCommand::UseAbility { entity, mana_cost } => self.use_ability(entity, mana_cost),
            SimCommand::Move { entity, direction } => self.set_move_intent(entity, direction),
            SimCommand::SetMovementMode { entity, mode } => self.set_movement_mode(entity, mode),
            SimCommand::Jump { entity } => self.try_jump(entity),
            SimCommand::Dash { entity, direction } => self.try_dash(entity, direction),
            SimCommand::ToggleFlight { entity } => {
                self.toggle_flight(entity);
                true
            }
            SimCommand::StartWaves => self.start_waves(),
            SimCommand::SkipWave => self.skip_wave(),
            SimCommand::ResetWaves => self.reset_waves(),
        };
        if !accepted {
            debug!(tick = self.time.tick, "command rejected");
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        // 1. Locomotion (jump → dash → flight → accel → integrate)
        systems::locomotion::run(&mut self.world, dt);
        // 2. Cooldowns and mana
        systems::cooldown::run(&mut self.world, dt, &mut self.events);
        // 3. Status effects (DOT into the health queue)
        systems::status::run(&mut self.world, &mut self.health, dt);
        // 4. Combat (clock, buff expiry, aggro-driven attacks)
        self.combat.update(&mut self.world, dt);
        self.run_auto_attacks();
        // 5. Health
        let from = self.events.len();
        self.health.update(&self.world, &mut self.events);
        self.route_health_events(from);
        // 6. Aggro
        self.aggro.update(&self.world, dt, &mut self.events);
        // 7. Waves
        let wave = self.waves.current_wave();
        let mut spawner = WorldSpawner::new(&self.spawner, &mut self.world, wave);
        self.waves.update(dt, &mut spawner);
        self.collect_wave_events();
    }

    /// Entities with `AutoAttack` hit their aggro target when able.
    fn run_auto_attacks(&mut self) {
        let intents: Vec<(Entity, Entity)> = {
            let mut query = self
                .world
                .query::<(&AutoAttack, &Aggro, Option<&Health>)>();
            query
                .iter()
                .filter(|(_, (_, _, health))| health.map_or(true, |h| h.is_alive()))
                .filter_map(|(entity, (_, aggro, _))| aggro.current_target.map(|t| (entity, t)))
                .collect()
        };

        for (attacker, target) in intents {
            if self.combat.can_attack(&self.world, attacker)
                && self.combat.is_in_range(&self.world, attacker, target)
            {
                self.attack(attacker, target);
            }
        }
    }

    /// Feed health events from `from` onward into aggro and the wave
    /// director.
    fn route_health_events(&mut self, from: usize) {
        for event in &self.events[from..] {
            match *event {
                SimEvent::Damaged {
                    target,
                    source: Some(source),
                    amount,
                    ..
                } => self.aggro.add_damage_threat(target, source, amount as f32),
                SimEvent::Healed {
                    target,
                    source: Some(source),
                    amount,
                    ..
                } => self.aggro.add_healing_threat(source, target, amount as f32),
                SimEvent::Died { entity, .. } => {
                    // The tag goes with the first death; stale waves don't count.
                    let member = self.world.remove_one::<WaveMember>(entity).ok();
                    if member.is_some_and(|m| m.wave == self.waves.current_wave()) {
                        self.waves.enemy_killed();
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_wave_events(&mut self) {
        for event in self.waves.drain_events() {
            let event = match event {
                WaveEvent::Started { wave } => SimEvent::WaveStarted { wave },
                WaveEvent::Ended { wave } => SimEvent::WaveEnded { wave },
                WaveEvent::AllComplete { total_kills } => {
                    SimEvent::AllWavesComplete { total_kills }
                }
                WaveEvent::Spawned { .. } | WaveEvent::SpawnDropped { .. } => continue,
            };
            self.events.push(event);
        }
    }
}
