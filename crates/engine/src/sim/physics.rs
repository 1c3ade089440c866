//! Per-character kinematics and the room ring topology.

use crate::config::SimConfig;
use crate::input::{Action, ActionSet, SpeedTier};
use crate::model::Body;

pub const GROUND_EPSILON: f32 = 0.001;

pub fn is_grounded(body: &Body) -> bool {
    body.y <= GROUND_EPSILON && body.vy <= GROUND_EPSILON
}

/// Turns an intent into horizontal acceleration, clamping to the tier speed
/// on the ground and skidding to a stop when there is no heading.
pub fn resolve_horizontal(body: &mut Body, intent: &ActionSet, grounded: bool, config: &SimConfig) {
    body.ax = 0.0;
    match intent.horizontal() {
        Some((heading, tier)) => {
            let (speed, accel) = match tier {
                SpeedTier::Fast => (config.run_speed, config.run_accel),
                SpeedTier::Slow => (config.walk_speed, config.walk_accel),
            };
            let same_way = body.vx * heading > 0.0;
            if same_way && body.vx.abs() >= speed {
                if grounded {
                    body.vx = heading * speed;
                }
            } else {
                body.ax = heading * accel;
            }
        }
        None if grounded => {
            if body.vx > 0.0 {
                body.ax = -config.run_accel;
            } else if body.vx < 0.0 {
                body.ax = config.run_accel;
            }
        }
        None => {}
    }
}

pub fn resolve_vertical(body: &mut Body, intent: &ActionSet, grounded: bool, config: &SimConfig) {
    if grounded && intent.contains(Action::Jump) {
        body.vy = config.jump_speed;
    }
    body.ay = if grounded { 0.0 } else { -config.gravity };
}

/// Horizontal then vertical intent resolution against one grounded test.
pub fn resolve_intent(body: &mut Body, intent: &ActionSet, config: &SimConfig) {
    let grounded = is_grounded(body);
    resolve_horizontal(body, intent, grounded, config);
    resolve_vertical(body, intent, grounded, config);
}

/// Integrates one velocity component. A step that would carry the velocity
/// past zero settles it at exactly zero.
pub fn perform_accel(v: f32, a: f32, dt: f32) -> f32 {
    let dv = a * dt;
    let next = v + dv;
    if next.abs() < dv.abs() {
        0.0
    } else {
        next
    }
}

/// Moves `x` back into `[0, room_width]` with a one-room step, then reduces
/// the room index into `[0, room_count)`.
pub fn wrap_room(x: f32, room_index: i32, room_width: f32, room_count: usize) -> (f32, i32) {
    let (x, room_index) = if x < 0.0 {
        (x + room_width, room_index - 1)
    } else if x > room_width {
        (x - room_width, room_index + 1)
    } else {
        (x, room_index)
    };
    (x, room_index.rem_euclid(room_count as i32))
}

/// Velocity, position, room wrap and floor clamp for one tick.
pub fn integrate(body: &mut Body, dt: f32, room_width: f32, room_count: usize) {
    body.vx = perform_accel(body.vx, body.ax, dt);
    body.vy = perform_accel(body.vy, body.ay, dt);
    body.x += body.vx * dt;
    body.y += body.vy * dt;
    let (x, room_index) = wrap_room(body.x, body.room_index, room_width, room_count);
    body.x = x;
    body.room_index = room_index;
    if body.y < GROUND_EPSILON && body.vy < 0.0 {
        body.y = 0.0;
        body.vy = 0.0;
    }
}
