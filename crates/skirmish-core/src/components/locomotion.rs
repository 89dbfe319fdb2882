//! Locomotion components: ground movement, jumping, dashing, flight.
//!
//! Each is optional; the locomotion system only drives the parts an entity
//! has attached.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::MovementMode;

/// Acceleration-model movement toward a desired heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub mode: MovementMode,
    pub base_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    pub speed_multiplier: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Intent: accelerate toward `heading` while set.
    pub is_moving: bool,
    pub heading: Vec2,
    /// Last non-zero heading (used for dashes without a direction).
    pub facing: Vec2,
    /// Velocity produced by the acceleration model.
    pub velocity: Vec2,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            mode: MovementMode::Walk,
            base_speed: DEFAULT_BASE_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            speed_multiplier: 1.0,
            acceleration: DEFAULT_ACCELERATION,
            deceleration: DEFAULT_DECELERATION,
            is_moving: false,
            heading: Vec2::ZERO,
            facing: Vec2::X,
            velocity: Vec2::ZERO,
        }
    }
}

impl Movement {
    /// Max ground speed for the current mode.
    pub fn max_speed(&self) -> f32 {
        let base = match self.mode {
            MovementMode::Walk | MovementMode::Fly => self.base_speed,
            MovementMode::Run => self.run_speed,
            MovementMode::Sprint => self.sprint_speed,
            MovementMode::Crouch => self.base_speed * CROUCH_SPEED_FACTOR,
            MovementMode::Swim => self.base_speed * SWIM_SPEED_FACTOR,
            MovementMode::Climb => self.base_speed * CLIMB_SPEED_FACTOR,
        };
        base * self.speed_multiplier
    }

    /// Set the movement intent. A zero direction stops moving.
    pub fn set_intent(&mut self, direction: Vec2) {
        let dir = direction.normalize_or_zero();
        self.is_moving = dir != Vec2::ZERO;
        self.heading = dir;
        if self.is_moving {
            self.facing = dir;
        }
    }
}

/// Gravity, multi-jump, coyote time and jump buffering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jump {
    pub jump_force: f32,
    pub max_jumps: u32,
    pub jumps_remaining: u32,
    /// Positive is downward.
    pub vertical_velocity: f32,
    pub base_gravity: f32,
    pub gravity_scale: f32,
    pub terminal_velocity: f32,
    pub grounded: bool,
    pub is_jumping: bool,
    pub is_falling: bool,
    pub coyote_time: f32,
    pub coyote_timer: f32,
    pub jump_buffer_time: f32,
    pub jump_buffer_timer: f32,
}

impl Default for Jump {
    fn default() -> Self {
        Self {
            jump_force: DEFAULT_JUMP_FORCE,
            max_jumps: 1,
            jumps_remaining: 1,
            vertical_velocity: 0.0,
            base_gravity: DEFAULT_GRAVITY,
            gravity_scale: 1.0,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            grounded: true,
            is_jumping: false,
            is_falling: false,
            coyote_time: DEFAULT_COYOTE_TIME,
            coyote_timer: 0.0,
            jump_buffer_time: DEFAULT_JUMP_BUFFER_TIME,
            jump_buffer_timer: 0.0,
        }
    }
}

impl Jump {
    pub fn with_max_jumps(mut self, max_jumps: u32) -> Self {
        self.max_jumps = max_jumps;
        self.jumps_remaining = max_jumps;
        self
    }

    pub fn gravity(&self) -> f32 {
        self.base_gravity * self.gravity_scale
    }
}

/// Fixed-speed, fixed-duration burst.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dash {
    pub speed: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub timer: f32,
    pub cooldown_timer: f32,
    pub direction: Vec2,
    pub is_dashing: bool,
    pub charges: u32,
    pub max_charges: u32,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            speed: DEFAULT_DASH_SPEED,
            duration: DEFAULT_DASH_DURATION,
            cooldown: DEFAULT_DASH_COOLDOWN,
            timer: 0.0,
            cooldown_timer: 0.0,
            direction: Vec2::ZERO,
            is_dashing: false,
            charges: 1,
            max_charges: 1,
        }
    }
}

/// What ends a flight on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightLimit {
    /// Drains fuel while flying, regenerates while grounded.
    Fuel {
        max_fuel: f32,
        drain_per_sec: f32,
        regen_per_sec: f32,
    },
    /// Cumulative seconds of flight before auto-stop.
    Duration { fly_duration: f32 },
    Unlimited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub fly_speed: f32,
    pub is_flying: bool,
    pub limit: FlightLimit,
    pub fuel: f32,
    /// Cumulative flight seconds (duration-limited flight).
    pub fly_timer: f32,
}

impl Flight {
    pub fn fuel_based(max_fuel: f32, drain_per_sec: f32, regen_per_sec: f32) -> Self {
        Self {
            fly_speed: DEFAULT_FLY_SPEED,
            is_flying: false,
            limit: FlightLimit::Fuel {
                max_fuel,
                drain_per_sec,
                regen_per_sec,
            },
            fuel: max_fuel,
            fly_timer: 0.0,
        }
    }

    pub fn duration_based(fly_duration: f32) -> Self {
        Self {
            fly_speed: DEFAULT_FLY_SPEED,
            is_flying: false,
            limit: FlightLimit::Duration { fly_duration },
            fuel: 0.0,
            fly_timer: 0.0,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            fly_speed: DEFAULT_FLY_SPEED,
            is_flying: false,
            limit: FlightLimit::Unlimited,
            fuel: 0.0,
            fly_timer: 0.0,
        }
    }
}

impl Default for Flight {
    fn default() -> Self {
        Self::fuel_based(DEFAULT_MAX_FUEL, DEFAULT_FUEL_DRAIN, DEFAULT_FUEL_REGEN)
    }
}
