//! Pickup, carry, throw and button presses for the player.

use tracing::info;

use super::physics::is_grounded;
use super::SimError;
use crate::config::SimConfig;
use crate::input::Action;
use crate::model::{Body, Direction, EntityId, Rect, World};

/// How far behind the actor's facing line a target may sit and still count
/// as in front.
pub const FACING_TOLERANCE: f32 = 0.2;

fn faces(actor: &Body, facing: Direction, target_x: f32) -> bool {
    (target_x - actor.x) * facing.sign() >= -FACING_TOLERANCE
}

fn reaches(actor: &Body, facing: Direction, target_room: i32, target_rect: &Rect, target_x: f32) -> bool {
    actor.room_index == target_room
        && actor.rect().overlaps(target_rect)
        && faces(actor, facing, target_x)
}

/// Writes the trailing pose of a carried body.
pub fn trail(carrier: &Body, facing: Direction, carried: &mut Body) {
    carried.x = carrier.x + facing.sign() * carrier.width * 0.5;
    carried.y = carrier.y + 0.2 * carrier.height;
    carried.vx = carrier.vx;
    carried.vy = carrier.vy;
    carried.room_index = carrier.room_index;
}

/// Picks up the nearest eligible crew member in depth order.
pub fn try_pickup(world: &mut World, config: &SimConfig) -> Result<Option<EntityId>, SimError> {
    let player = &world.player;
    if !player.intent.contains(Action::Act)
        || player.role.carrier.carrying.is_some()
        || !is_grounded(&player.body)
    {
        return Ok(None);
    }

    let mut picked = None;
    for id in world.depth.iter_ascending() {
        if !world.carriable.contains(id) {
            continue;
        }
        let crew = world.crew.get(id)?;
        if is_grounded(&crew.body)
            && reaches(
                &player.body,
                player.animation.direction,
                crew.body.room_index,
                &crew.body.rect(),
                crew.body.x,
            )
        {
            picked = Some(id);
            break;
        }
    }
    let Some(id) = picked else {
        return Ok(None);
    };

    let carrier_id = world.player.id;
    let crew = world.crew.get_mut(id)?;
    crew.role.carriable.carried_by = Some(carrier_id);
    world.carriable.refresh(crew)?;
    world.player.role.carrier.carrying = Some(id);
    world.player.intent.remove(Action::Act);
    let depth = world.depth.depth_of(id)?;
    world.depth.update(id, Some(depth - config.carry_depth_nudge))?;
    info!(carrier = %carrier_id, carried = %id, "crew_picked_up");
    Ok(Some(id))
}

fn carried_crew(world: &World) -> Result<Option<EntityId>, SimError> {
    let Some(id) = world.player.role.carrier.carrying else {
        return Ok(None);
    };
    let crew = world.crew.get(id)?;
    if crew.role.carriable.carried_by != Some(world.player.id) {
        return Err(SimError::CarryLinkBroken {
            carrier: world.player.id,
            carried: id,
        });
    }
    Ok(Some(id))
}

/// Overwrites the carried crew member's pose from the carrier.
pub fn slave_carried(world: &mut World) -> Result<(), SimError> {
    let Some(id) = carried_crew(world)? else {
        return Ok(());
    };
    let carrier = &world.player;
    let crew = world.crew.get_mut(id)?;
    trail(&carrier.body, carrier.animation.direction, &mut crew.body);
    Ok(())
}

/// Releases the carried crew member with an impulse shaped by the held
/// directions, or by the facing direction when none is held.
pub fn try_throw(world: &mut World, config: &SimConfig) -> Result<Option<EntityId>, SimError> {
    if !world.player.intent.contains(Action::Act) {
        return Ok(None);
    }
    let Some(id) = carried_crew(world)? else {
        return Ok(None);
    };

    let player = &mut world.player;
    let intent = player.intent;
    let crew = world.crew.get_mut(id)?;
    let body = &mut crew.body;
    body.vy += config.throw_y_speed;
    let mut directed = false;
    if intent.wants_left() {
        body.vx -= config.throw_x_speed;
        directed = true;
    }
    if intent.wants_right() {
        body.vx += config.throw_x_speed;
        directed = true;
    }
    if intent.contains(Action::Up) {
        body.vy += 0.5 * config.throw_x_speed;
        directed = true;
    }
    if !directed {
        body.vx += player.animation.direction.sign() * 0.5 * config.throw_x_speed;
    }
    let (vx, vy) = (body.vx, body.vy);

    crew.role.carriable.carried_by = None;
    world.carriable.refresh(crew)?;
    player.role.carrier.carrying = None;
    player.intent.remove(Action::Act);
    world.depth.update(id, None)?;
    info!(carrier = %player.id, carried = %id, vx, vy, "crew_thrown");
    Ok(Some(id))
}

/// Presses the first pressable button in reach and queues its event on the
/// notify target's spawner.
pub fn try_press(world: &mut World) -> Result<Option<EntityId>, SimError> {
    let player = &world.player;
    if !player.intent.contains(Action::Act) || !is_grounded(&player.body) {
        return Ok(None);
    }

    let mut pressed = None;
    for (id, target) in world.pressable.iter() {
        let item = world.furniture.get(id)?;
        if reaches(
            &player.body,
            player.animation.direction,
            item.room_index,
            &item.rect(),
            item.x,
        ) {
            pressed = Some((id, *target));
            break;
        }
    }
    let Some((button_id, target_id)) = pressed else {
        return Ok(None);
    };

    let item = world.furniture.get_mut(button_id)?;
    let Some(button) = item.button.as_mut() else {
        return Ok(None);
    };
    button.press();
    let event = button.event;
    world.pressable.refresh(item)?;

    let target = world.furniture.get_mut(target_id)?;
    let spawner = target
        .spawner
        .as_mut()
        .ok_or(SimError::NotifyTargetNotSpawner {
            button: button_id,
            target: target_id,
        })?;
    spawner.enqueue(event);
    world.spawning.refresh(target)?;
    world.player.intent.remove(Action::Act);
    info!(button = %button_id, target = %target_id, event = ?event, "button_pressed");
    Ok(Some(button_id))
}

/// Re-attaches the carried crew member after integration so it shares the
/// carrier's room even when the carrier has just wrapped.
pub fn anchor_carried(world: &mut World) -> Result<(), SimError> {
    slave_carried(world)
}

/// Every carried crew member must be linked both ways to the single carrier
/// and stand in its room.
pub fn check_carry(world: &World) -> Result<(), SimError> {
    let carrier = &world.player;
    for crew in world.crew.iter() {
        let Some(by) = crew.role.carriable.carried_by else {
            continue;
        };
        if by != carrier.id || carrier.role.carrier.carrying != Some(crew.id) {
            return Err(SimError::CarryLinkBroken {
                carrier: by,
                carried: crew.id,
            });
        }
        if crew.body.room_index != carrier.body.room_index {
            return Err(SimError::CarryRoomMismatch {
                carried: crew.id,
                carried_room: crew.body.room_index,
                carrier_room: carrier.body.room_index,
            });
        }
    }
    carried_crew(world)?;
    Ok(())
}
