//! Simulation constants and tuning parameters.

/// Default tick rate for fixed-step drivers (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Combat ---

/// Defense constant in `defense / (defense + K)` damage reduction.
pub const DEFENSE_CONSTANT: f32 = 100.0;

/// Default critical-hit damage multiplier.
pub const DEFAULT_CRIT_MULTIPLIER: f32 = 2.0;

// --- Aggro ---

/// Threat seeded for an entity first noticed inside aggro range.
pub const BASELINE_THREAT: f32 = 1.0;

/// Bonus added on top of the current max threat by a taunt.
pub const TAUNT_THREAT_BONUS: f32 = 9999.0;

/// Default threat generated per point of damage.
pub const DAMAGE_THREAT_MULTIPLIER: f32 = 1.0;

/// Default threat generated per point of healing.
pub const HEALING_THREAT_MULTIPLIER: f32 = 0.5;

/// Threat lost per second.
pub const DEFAULT_THREAT_DECAY: f32 = 1.0;

/// Threat table capacity.
pub const DEFAULT_MAX_THREAT_MEMORY: usize = 8;

// --- Locomotion ---

pub const DEFAULT_BASE_SPEED: f32 = 120.0;
pub const DEFAULT_RUN_SPEED: f32 = 200.0;
pub const DEFAULT_SPRINT_SPEED: f32 = 280.0;
pub const DEFAULT_ACCELERATION: f32 = 900.0;
pub const DEFAULT_DECELERATION: f32 = 1200.0;

/// Max-speed factors applied to base speed per mode.
pub const CROUCH_SPEED_FACTOR: f32 = 0.5;
pub const SWIM_SPEED_FACTOR: f32 = 0.6;
pub const CLIMB_SPEED_FACTOR: f32 = 0.4;

/// Gravity in world units per second squared (positive is downward).
pub const DEFAULT_GRAVITY: f32 = 980.0;
pub const DEFAULT_TERMINAL_VELOCITY: f32 = 900.0;
pub const DEFAULT_JUMP_FORCE: f32 = 420.0;
pub const DEFAULT_COYOTE_TIME: f32 = 0.1;
pub const DEFAULT_JUMP_BUFFER_TIME: f32 = 0.12;

pub const DEFAULT_DASH_SPEED: f32 = 600.0;
pub const DEFAULT_DASH_DURATION: f32 = 0.15;
pub const DEFAULT_DASH_COOLDOWN: f32 = 0.8;

pub const DEFAULT_FLY_SPEED: f32 = 160.0;
pub const DEFAULT_MAX_FUEL: f32 = 100.0;
pub const DEFAULT_FUEL_DRAIN: f32 = 25.0;
pub const DEFAULT_FUEL_REGEN: f32 = 15.0;

// --- Waves ---

/// Default seconds between spawns inside a wave.
pub const DEFAULT_SPAWN_DELAY: f32 = 1.0;

/// Default pre-delay before a wave starts spawning.
pub const DEFAULT_WAVE_DELAY: f32 = 5.0;

/// Every Nth generated wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Boss waves get this multiple of the normal pre-delay.
pub const BOSS_WAVE_DELAY_FACTOR: f32 = 2.0;

// --- Teams ---

pub const PLAYER_TEAM: u32 = 0;
pub const ENEMY_TEAM: u32 = 1;
