//! Locomotion system: jump, dash and flight state machines plus the
//! acceleration model, composed into each entity's `Velocity`.
//!
//! Ground contact is reported from outside through [`land`] and
//! [`leave_ground`]; this system has no collision model.

use glam::Vec2;
use hecs::World;

use skirmish_core::components::{
    BuffContainer, Dash, Flight, FlightLimit, Jump, Movement, StatusComponent,
};
use skirmish_core::enums::{StatKind, StatusKind};
use skirmish_core::types::{Position, Velocity};

// ---- Jump ----

/// Jump if grounded, within coyote time, or with air jumps left.
/// A failed attempt is buffered and fires on the next landing.
pub fn try_jump(jump: &mut Jump) -> bool {
    let allowed = jump.grounded || jump.coyote_timer > 0.0 || jump.jumps_remaining > 0;
    if !allowed {
        jump.jump_buffer_timer = jump.jump_buffer_time;
        return false;
    }
    jump.jumps_remaining = jump.jumps_remaining.saturating_sub(1);
    jump.vertical_velocity = -jump.jump_force;
    jump.grounded = false;
    jump.is_jumping = true;
    jump.is_falling = false;
    jump.coyote_timer = 0.0;
    jump.jump_buffer_timer = 0.0;
    true
}

/// Touch down. Returns true if a buffered jump fired.
pub fn land(jump: &mut Jump) -> bool {
    jump.grounded = true;
    jump.vertical_velocity = 0.0;
    jump.is_jumping = false;
    jump.is_falling = false;
    jump.jumps_remaining = jump.max_jumps;
    jump.coyote_timer = 0.0;

    if jump.jump_buffer_timer > 0.0 {
        jump.jump_buffer_timer = 0.0;
        return try_jump(jump);
    }
    false
}

/// Walk off a ledge: airborne without jumping, coyote window open.
pub fn leave_ground(jump: &mut Jump) {
    if !jump.grounded {
        return;
    }
    jump.grounded = false;
    jump.coyote_timer = jump.coyote_time;
}

fn update_jump(jump: &mut Jump, dt: f32, gravity_suspended: bool) {
    jump.jump_buffer_timer = (jump.jump_buffer_timer - dt).max(0.0);
    if jump.grounded {
        return;
    }
    jump.coyote_timer = (jump.coyote_timer - dt).max(0.0);
    if !gravity_suspended {
        jump.vertical_velocity =
            (jump.vertical_velocity + jump.gravity() * dt).min(jump.terminal_velocity);
    }
    if jump.vertical_velocity > 0.0 {
        jump.is_falling = true;
        jump.is_jumping = false;
    }
}

// ---- Dash ----

/// Start a dash along `direction`.
pub fn try_dash(dash: &mut Dash, direction: Vec2) -> bool {
    let direction = direction.normalize_or_zero();
    if dash.is_dashing || dash.charges == 0 || dash.cooldown_timer > 0.0 || direction == Vec2::ZERO
    {
        return false;
    }
    dash.is_dashing = true;
    dash.timer = dash.duration;
    dash.direction = direction;
    dash.charges -= 1;
    true
}

fn update_dash(dash: &mut Dash, dt: f32, can_refill: bool) {
    if dash.is_dashing {
        dash.timer -= dt;
        if dash.timer <= 0.0 {
            dash.timer = 0.0;
            dash.is_dashing = false;
            dash.cooldown_timer = dash.cooldown;
        }
    } else if dash.cooldown_timer > 0.0 {
        dash.cooldown_timer = (dash.cooldown_timer - dt).max(0.0);
    }

    if can_refill && !dash.is_dashing {
        dash.charges = dash.max_charges;
    }
}

// ---- Flight ----

pub fn start_flight(flight: &mut Flight) -> bool {
    if flight.is_flying {
        return false;
    }
    let can_fly = match flight.limit {
        FlightLimit::Fuel { .. } => flight.fuel > 0.0,
        FlightLimit::Duration { fly_duration } => flight.fly_timer < fly_duration,
        FlightLimit::Unlimited => true,
    };
    if can_fly {
        flight.is_flying = true;
    }
    can_fly
}

pub fn stop_flight(flight: &mut Flight) -> bool {
    let was_flying = flight.is_flying;
    flight.is_flying = false;
    was_flying
}

/// Returns whether the entity is flying afterwards.
pub fn toggle_flight(flight: &mut Flight) -> bool {
    if flight.is_flying {
        stop_flight(flight);
        false
    } else {
        start_flight(flight)
    }
}

/// Landing restores duration-limited flight time.
pub fn reset_flight_on_landing(flight: &mut Flight) {
    if let FlightLimit::Duration { .. } = flight.limit {
        flight.fly_timer = 0.0;
    }
}

fn update_flight(flight: &mut Flight, dt: f32, grounded: bool) {
    if flight.is_flying {
        match flight.limit {
            FlightLimit::Fuel { drain_per_sec, .. } => {
                flight.fuel -= drain_per_sec * dt;
                if flight.fuel <= 0.0 {
                    flight.fuel = 0.0;
                    flight.is_flying = false;
                }
            }
            FlightLimit::Duration { fly_duration } => {
                flight.fly_timer += dt;
                if flight.fly_timer >= fly_duration {
                    flight.is_flying = false;
                }
            }
            FlightLimit::Unlimited => {}
        }
    } else if grounded {
        if let FlightLimit::Fuel {
            max_fuel,
            regen_per_sec,
            ..
        } = flight.limit
        {
            flight.fuel = (flight.fuel + regen_per_sec * dt).min(max_fuel);
        }
    }
}

// ---- Acceleration model ----

/// Top speed after MoveSpeed buffs and the strongest slow.
pub fn effective_max_speed(
    base: f32,
    buffs: Option<&BuffContainer>,
    status: Option<&StatusComponent>,
) -> f32 {
    let speed = buffs.map_or(base, |b| b.apply_to(StatKind::MoveSpeed, base));
    let slow = status
        .and_then(|s| s.strongest(StatusKind::Slow))
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    (speed * (1.0 - slow)).max(0.0)
}

fn update_movement(movement: &mut Movement, dt: f32, max_speed: f32) {
    if movement.is_moving {
        let accelerated = movement.velocity + movement.heading * movement.acceleration * dt;
        movement.velocity = accelerated.clamp_length_max(max_speed);
    } else {
        let step = movement.deceleration * dt;
        let speed = movement.velocity.length();
        movement.velocity = if speed <= step {
            Vec2::ZERO
        } else {
            movement.velocity - movement.velocity / speed * step
        };
    }
}

/// Run locomotion for every entity with a `Velocity`, then integrate
/// positions.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (velocity, mut movement, mut jump, mut dash, mut flight, buffs, status)) in world
        .query_mut::<(
            &mut Velocity,
            Option<&mut Movement>,
            Option<&mut Jump>,
            Option<&mut Dash>,
            Option<&mut Flight>,
            Option<&BuffContainer>,
            Option<&StatusComponent>,
        )>()
    {
        let dashing = dash.as_ref().is_some_and(|d| d.is_dashing);
        let flying = flight.as_ref().is_some_and(|f| f.is_flying);

        // 1. jump
        if let Some(jump) = jump.as_deref_mut() {
            update_jump(jump, dt, dashing || flying);
        }
        let grounded = jump.as_ref().map_or(true, |j| j.grounded);

        // 2. dash
        if let Some(dash) = dash.as_deref_mut() {
            update_dash(dash, dt, grounded);
        }

        // 3. flight
        if let Some(flight) = flight.as_deref_mut() {
            update_flight(flight, dt, grounded);
        }
        let flying = flight.as_ref().is_some_and(|f| f.is_flying);

        // 4. acceleration
        if let Some(movement) = movement.as_deref_mut() {
            let base = match flight.as_deref() {
                Some(f) if f.is_flying => f.fly_speed * movement.speed_multiplier,
                _ => movement.max_speed(),
            };
            update_movement(movement, dt, effective_max_speed(base, buffs, status));
        }

        // Compose: a dash overrides everything, otherwise jump owns the
        // vertical axis unless flying.
        let composed = match dash.as_deref() {
            Some(d) if d.is_dashing => d.direction * d.speed,
            _ => {
                let mut v = movement.as_deref().map_or(Vec2::ZERO, |m| m.velocity);
                if let Some(j) = jump.as_deref() {
                    if !flying {
                        v.y = j.vertical_velocity;
                    }
                }
                v
            }
        };
        *velocity = Velocity::from(composed);
    }

    // 5. integrate
    integrate(world, dt);
}

fn integrate(world: &mut World, dt: f32) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        *pos = Position::from(pos.as_vec2() + vel.as_vec2() * dt);
    }
}
