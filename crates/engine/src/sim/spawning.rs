use rand::Rng;
use tracing::info;

use super::ai;
use super::SimError;
use crate::config::SimConfig;
use crate::model::{Body, EntityId, SpawnEvent, World};

/// Pops one queued event from every busy spawner and materializes it. New
/// crew drop in from the ceiling of the spawner's room.
pub fn spawn_pending<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    config: &SimConfig,
) -> Result<Vec<EntityId>, SimError> {
    let busy: Vec<EntityId> = world.spawning.iter().map(|(id, _)| id).collect();
    let mut spawned = Vec::with_capacity(busy.len());
    for spawner_id in busy {
        let item = world.furniture.get_mut(spawner_id)?;
        let Some(event) = item
            .spawner
            .as_mut()
            .and_then(|spawner| spawner.pending.pop_front())
        else {
            continue;
        };
        let (x, room_index) = (item.x, item.room_index);
        world.spawning.refresh(item)?;

        match event {
            SpawnEvent::Crew(kind) => {
                let body = Body::at_rest(
                    x,
                    config.room_height,
                    config.character_width,
                    config.character_height,
                    room_index,
                );
                let id = world.add_crew(kind, body, ai::initial_state(rng, config))?;
                info!(spawner = %spawner_id, id = %id, kind = ?kind, room = room_index, "crew_spawned");
                spawned.push(id);
            }
        }
    }
    Ok(spawned)
}

/// Advances every running furniture timer by `dt`.
pub fn advance_timers(world: &mut World, dt: f32) -> Result<(), SimError> {
    for item in world.furniture.iter_mut() {
        let flipped = item
            .button
            .as_mut()
            .is_some_and(|button| button.advance(dt));
        if let Some(spawner) = item.spawner.as_mut() {
            spawner.advance(dt);
        }
        if flipped {
            world.pressable.refresh(item)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::CooloffPolicy;
    use crate::index::DepthOrder;
    use crate::model::{Button, CrewKind, Furniture, Room, RoomKind, Spawner};
    use crate::sprite_keys::ImageKey;

    fn world_with_pad(policy: CooloffPolicy) -> (World, EntityId, EntityId) {
        let mut world = World::new(
            vec![Room { kind: RoomKind::Engine }, Room { kind: RoomKind::Store }],
            Body::at_rest(1.0, 0.0, 1.0, 1.0, 0),
            DepthOrder::new(0.0..0.25, 8),
        )
        .expect("world");
        let pad = world.allocate_id();
        let button = world.allocate_id();
        world
            .insert_furniture(Furniture {
                id: pad,
                key: "pad".to_string(),
                kind: ImageKey::new("teleporter").expect("key"),
                x: 5.0,
                width: 1.0,
                height: 1.0,
                room_index: 1,
                button: None,
                spawner: Some(Spawner::new(1.0, policy)),
            })
            .expect("pad");
        world
            .insert_furniture(Furniture {
                id: button,
                key: "call".to_string(),
                kind: ImageKey::new("button").expect("key"),
                x: 2.0,
                width: 0.5,
                height: 1.0,
                room_index: 0,
                button: Some(Button::new(SpawnEvent::Crew(CrewKind::Science), pad, 1.0, policy)),
                spawner: None,
            })
            .expect("button");
        (world, button, pad)
    }

    fn queue(world: &mut World, pad: EntityId, events: usize) {
        let item = world.furniture.get_mut(pad).expect("pad");
        let spawner = item.spawner.as_mut().expect("spawner");
        for _ in 0..events {
            spawner.enqueue(SpawnEvent::Crew(CrewKind::Security));
        }
        world.spawning.refresh(item).expect("refresh");
    }

    #[test]
    fn one_event_per_spawner_per_tick() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let (mut world, _, pad) = world_with_pad(CooloffPolicy::KeepRunning);
        queue(&mut world, pad, 2);

        let first = spawn_pending(&mut world, &mut rng, &config).expect("spawn");
        assert_eq!(first.len(), 1);
        assert_eq!(world.spawning.get(pad), Some(&1));
        let second = spawn_pending(&mut world, &mut rng, &config).expect("spawn");
        assert_eq!(second.len(), 1);
        assert!(!world.spawning.contains(pad));
        assert!(spawn_pending(&mut world, &mut rng, &config).expect("spawn").is_empty());
        assert_eq!(world.crew.len(), 2);
    }

    #[test]
    fn spawned_crew_fall_from_ceiling_of_spawner_room() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let (mut world, _, pad) = world_with_pad(CooloffPolicy::KeepRunning);
        queue(&mut world, pad, 1);
        let ids = spawn_pending(&mut world, &mut rng, &config).expect("spawn");
        let crew = world.crew.get(ids[0]).expect("crew");
        assert_eq!(crew.body.x, 5.0);
        assert_eq!(crew.body.y, config.room_height);
        assert_eq!(crew.body.room_index, 1);
        assert_eq!(crew.role.kind, CrewKind::Security);
        assert!(world.carriable.contains(ids[0]));
        assert!(world.depth.contains(ids[0]));
    }

    #[test]
    fn timers_rearm_button_after_window() {
        let (mut world, button, _) = world_with_pad(CooloffPolicy::KeepRunning);
        let item = world.furniture.get_mut(button).expect("button");
        item.button.as_mut().expect("button").press();
        world.pressable.refresh(item).expect("refresh");
        assert!(!world.pressable.contains(button));

        advance_timers(&mut world, 0.6).expect("advance");
        assert!(!world.pressable.contains(button));
        advance_timers(&mut world, 0.6).expect("advance");
        assert!(world.pressable.contains(button));
    }

    #[test]
    fn latched_button_stays_out_of_view() {
        let (mut world, button, _) = world_with_pad(CooloffPolicy::Latched);
        let item = world.furniture.get_mut(button).expect("button");
        item.button.as_mut().expect("button").press();
        world.pressable.refresh(item).expect("refresh");
        for _ in 0..10 {
            advance_timers(&mut world, 0.5).expect("advance");
        }
        assert!(!world.pressable.contains(button));
    }
}
