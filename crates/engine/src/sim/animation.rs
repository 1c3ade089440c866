use crate::model::{AnimationKind, AnimationState, Body, Direction, World};

use super::physics::is_grounded;

/// Next animation state from the current kinematics. Direction only changes
/// on a definite velocity sign; time restarts whenever the kind changes.
pub fn derive(previous: AnimationState, body: &Body, grounded: bool, carried: bool, dt: f32) -> AnimationState {
    let direction = if body.vx > 0.0 {
        Direction::Right
    } else if body.vx < 0.0 {
        Direction::Left
    } else {
        previous.direction
    };

    let moving = body.vx != 0.0;
    let slowing = moving && body.ax != 0.0 && body.vx * body.ax < 0.0;
    let kind = if carried {
        AnimationKind::Stand
    } else if !grounded {
        AnimationKind::Jump
    } else if slowing {
        AnimationKind::Skid
    } else if moving {
        AnimationKind::Run
    } else {
        AnimationKind::Stand
    };

    let time = if kind == previous.kind {
        previous.time + dt
    } else {
        0.0
    };
    AnimationState { direction, kind, time }
}

pub fn animate_all(world: &mut World, dt: f32) {
    for crew in world.crew.iter_mut() {
        let grounded = is_grounded(&crew.body);
        crew.animation = derive(crew.animation, &crew.body, grounded, crew.is_carried(), dt);
    }
    let player = &mut world.player;
    let grounded = is_grounded(&player.body);
    player.animation = derive(player.animation, &player.body, grounded, false, dt);
}
