//! Wave director finite state machine.
//!
//! `Idle → Starting → Active → Clearing → Complete → (Starting | Final)`.
//! Transitions only move forward; `reset` and `skip_wave` are the explicit
//! exceptions. Alive counts are reported by the caller through
//! `enemy_killed`, the director never inspects the world.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use skirmish_core::enums::WavePhase;

use crate::plan::WaveConfig;
use crate::spawner::Spawner;

/// Output of the director, drained by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveEvent {
    Started {
        wave: u32,
    },
    Spawned {
        wave: u32,
        enemy_type: String,
        spawn_point: String,
    },
    /// No active spawn point could take this enemy.
    SpawnDropped {
        wave: u32,
        enemy_type: String,
    },
    Ended {
        wave: u32,
    },
    AllComplete {
        total_kills: u32,
    },
}

pub struct WaveDirector {
    waves: Vec<WaveConfig>,
    current: usize,
    phase: WavePhase,
    /// Pre-delay countdown in `Starting`, spawn countdown in `Active`.
    timer: f32,
    spawn_queue: VecDeque<String>,
    alive: u32,
    total_kills: u32,
    rng: ChaCha8Rng,
    events: Vec<WaveEvent>,
}

impl WaveDirector {
    pub fn new(waves: Vec<WaveConfig>, seed: u64) -> Self {
        Self {
            waves,
            current: 0,
            phase: WavePhase::Idle,
            timer: 0.0,
            spawn_queue: VecDeque::new(),
            alive: 0,
            total_kills: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn waves(&self) -> &[WaveConfig] {
        &self.waves
    }

    /// Replace the wave plan. Only allowed while idle.
    pub fn set_waves(&mut self, waves: Vec<WaveConfig>) -> bool {
        if self.phase != WavePhase::Idle {
            return false;
        }
        self.waves = waves;
        true
    }

    /// Wave number of the wave in progress (0 before the first start).
    pub fn current_wave(&self) -> u32 {
        match self.phase {
            WavePhase::Idle => 0,
            _ => self
                .waves
                .get(self.current)
                .map(|w| w.wave_number)
                .unwrap_or(0),
        }
    }

    pub fn alive(&self) -> u32 {
        self.alive
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }

    /// Spawns still waiting to be released in the current wave.
    pub fn queued(&self) -> usize {
        self.spawn_queue.len()
    }

    /// Seconds left on the current countdown.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Begin the first configured wave. Fails unless idle with a plan.
    pub fn start_waves(&mut self) -> bool {
        if self.phase != WavePhase::Idle || self.waves.is_empty() {
            return false;
        }
        self.total_kills = 0;
        self.prepare_wave(0);
        true
    }

    /// Count one enemy death attributed to the current wave.
    pub fn enemy_killed(&mut self) {
        self.alive = self.alive.saturating_sub(1);
        self.total_kills += 1;
    }

    /// Back to `Idle`, dropping all progress.
    pub fn reset(&mut self) -> bool {
        if self.phase == WavePhase::Idle {
            return false;
        }
        self.phase = WavePhase::Idle;
        self.current = 0;
        self.timer = 0.0;
        self.spawn_queue.clear();
        self.alive = 0;
        self.total_kills = 0;
        debug!("wave director reset");
        true
    }

    /// Abandon the current wave as if it had been cleared.
    pub fn skip_wave(&mut self) -> bool {
        match self.phase {
            WavePhase::Idle | WavePhase::Final => false,
            WavePhase::Complete => {
                self.advance();
                true
            }
            WavePhase::Starting | WavePhase::Active | WavePhase::Clearing => {
                self.spawn_queue.clear();
                self.alive = 0;
                self.complete_wave();
                true
            }
        }
    }

    /// Advance the state machine by `dt` seconds.
    pub fn update(&mut self, dt: f32, spawner: &mut impl Spawner) {
        match self.phase {
            WavePhase::Idle | WavePhase::Final => {}
            WavePhase::Starting => self.update_starting(dt, spawner),
            WavePhase::Active => self.update_active(dt, spawner),
            WavePhase::Clearing => self.update_clearing(),
            WavePhase::Complete => self.advance(),
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<WaveEvent> {
        std::mem::take(&mut self.events)
    }

    fn update_starting(&mut self, dt: f32, spawner: &mut impl Spawner) {
        self.timer -= dt;
        if self.timer > 0.0 {
            return;
        }
        let wave = self.current_wave();
        debug!(wave, queued = self.spawn_queue.len(), "wave started");
        self.events.push(WaveEvent::Started { wave });
        self.phase = WavePhase::Active;
        // First spawn is released on entering Active.
        self.timer = 0.0;
        self.update_active(0.0, spawner);
    }

    fn update_active(&mut self, dt: f32, spawner: &mut impl Spawner) {
        self.timer -= dt;
        if self.timer <= 0.0 {
            if let Some(enemy_type) = self.spawn_queue.pop_front() {
                self.release(enemy_type, spawner);
                self.timer = self.waves[self.current].spawn_delay;
            }
        }

        if self.spawn_queue.is_empty() {
            self.phase = WavePhase::Clearing;
            self.update_clearing();
        }
    }

    fn update_clearing(&mut self) {
        if self.alive == 0 {
            self.complete_wave();
        }
    }

    fn release(&mut self, enemy_type: String, spawner: &mut impl Spawner) {
        let wave = self.current_wave();
        let Some(spawn_point) = spawner.find_spawn_point(&enemy_type) else {
            warn!(wave, enemy_type = %enemy_type, "no active spawn point for enemy type");
            self.events.push(WaveEvent::SpawnDropped { wave, enemy_type });
            return;
        };

        if spawner.spawn_now(&spawn_point) {
            self.alive += 1;
            self.events.push(WaveEvent::Spawned {
                wave,
                enemy_type,
                spawn_point,
            });
        } else {
            warn!(wave, spawn_point = %spawn_point, "spawn point refused spawn");
            self.events.push(WaveEvent::SpawnDropped { wave, enemy_type });
        }
    }

    fn complete_wave(&mut self) {
        let wave = self.current_wave();
        debug!(wave, total_kills = self.total_kills, "wave complete");
        self.phase = WavePhase::Complete;
        self.events.push(WaveEvent::Ended { wave });
    }

    /// Leave `Complete`: prepare the next wave or finish.
    fn advance(&mut self) {
        let next = self.current + 1;
        if next < self.waves.len() {
            self.prepare_wave(next);
        } else {
            debug!(total_kills = self.total_kills, "all waves complete");
            self.phase = WavePhase::Final;
            self.events.push(WaveEvent::AllComplete {
                total_kills: self.total_kills,
            });
        }
    }

    fn prepare_wave(&mut self, index: usize) {
        let config = &self.waves[index];
        let mut queue: Vec<String> = Vec::with_capacity(config.total_enemies() as usize);
        for (enemy_type, &count) in &config.enemies {
            for _ in 0..count {
                queue.push(enemy_type.clone());
            }
        }
        queue.shuffle(&mut self.rng);

        self.current = index;
        self.timer = config.wave_delay;
        self.spawn_queue = queue.into();
        self.alive = 0;
        self.phase = WavePhase::Starting;
        debug!(
            wave = config.wave_number,
            boss = config.is_boss,
            delay = config.wave_delay,
            "wave prepared"
        );
    }
}
