use std::iter;

use tracing::debug;

use super::{
    AiState, Body, CharacterRef, CrewKind, CrewMember, EntityId, EntityIdAllocator, Furniture,
    Player, Room,
};
use crate::index::{DepthOrder, FilteredView, IdIndex, IndexError};
use crate::layout::LayoutError;

fn carriable_now(crew: &CrewMember) -> Option<()> {
    (!crew.is_carried()).then_some(())
}

fn pressable_button(furniture: &Furniture) -> Option<EntityId> {
    furniture
        .button()
        .filter(|button| button.is_pressable())
        .map(|button| button.notify_target)
}

fn queued_spawns(furniture: &Furniture) -> Option<usize> {
    furniture
        .spawner()
        .map(|spawner| spawner.pending.len())
        .filter(|queued| *queued > 0)
}

/// The whole simulated state: one player, the crew and furniture arenas, the
/// room ring, and the indices kept over them.
#[derive(Debug)]
pub struct World {
    pub(crate) player: Player,
    pub(crate) crew: IdIndex<CrewMember>,
    pub(crate) furniture: IdIndex<Furniture>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) depth: DepthOrder,
    pub(crate) carriable: FilteredView<CrewMember, ()>,
    pub(crate) pressable: FilteredView<Furniture, EntityId>,
    pub(crate) spawning: FilteredView<Furniture, usize>,
    allocator: EntityIdAllocator,
}

impl World {
    pub fn new(rooms: Vec<Room>, player_body: Body, mut depth: DepthOrder) -> Result<Self, LayoutError> {
        if rooms.is_empty() {
            return Err(LayoutError::NoRooms);
        }
        let mut allocator = EntityIdAllocator::default();
        let player = Player::new(allocator.allocate(), player_body);
        depth.insert(player.id, None);
        Ok(Self {
            player,
            crew: IdIndex::new(),
            furniture: IdIndex::new(),
            rooms,
            depth,
            carriable: FilteredView::new(carriable_now),
            pressable: FilteredView::new(pressable_button),
            spawning: FilteredView::new(queued_spawns),
            allocator,
        })
    }

    pub fn allocate_id(&mut self) -> EntityId {
        self.allocator.allocate()
    }

    pub fn add_crew(&mut self, kind: CrewKind, body: Body, ai: AiState) -> Result<EntityId, IndexError> {
        let id = self.allocate_id();
        let member = CrewMember::new(id, kind, body, ai);
        self.carriable.watch(&member)?;
        self.crew.insert(member);
        self.depth.insert(id, None);
        debug!(id = %id, kind = ?kind, room = body.room_index, "crew_added");
        Ok(id)
    }

    pub fn remove_crew(&mut self, id: EntityId) -> Result<CrewMember, IndexError> {
        let member = self.crew.remove(id)?;
        self.carriable.unwatch(id)?;
        self.depth.remove(id)?;
        if self.player.role.carrier.carrying == Some(id) {
            self.player.role.carrier.carrying = None;
        }
        Ok(member)
    }

    /// Bulk-loads the static furniture set in place of the current arena and
    /// watches every item. Later duplicates of an id are dropped.
    pub fn load_furniture(&mut self, items: impl IntoIterator<Item = Furniture>) -> Result<(), IndexError> {
        for id in self.furniture.ids() {
            self.pressable.unwatch(id)?;
            self.spawning.unwatch(id)?;
        }
        let loaded = IdIndex::from_items(items);
        self.pressable.watch_all(loaded.iter())?;
        self.spawning.watch_all(loaded.iter())?;
        self.furniture = loaded;
        Ok(())
    }

    /// Inserting an id that is already present changes nothing.
    pub fn insert_furniture(&mut self, furniture: Furniture) -> Result<EntityId, IndexError> {
        let id = furniture.id;
        if self.furniture.has(id) {
            return Ok(id);
        }
        self.pressable.watch(&furniture)?;
        self.spawning.watch(&furniture)?;
        self.furniture.insert(furniture);
        Ok(id)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn player_id(&self) -> EntityId {
        self.player.id
    }

    pub fn crew(&self) -> &IdIndex<CrewMember> {
        &self.crew
    }

    pub fn crew_member(&self, id: EntityId) -> Result<&CrewMember, IndexError> {
        self.crew.get(id)
    }

    pub fn furniture(&self) -> &IdIndex<Furniture> {
        &self.furniture
    }

    pub fn furniture_item(&self, id: EntityId) -> Result<&Furniture, IndexError> {
        self.furniture.get(id)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Room at a ring position; any integer is accepted.
    pub fn room(&self, room_index: i32) -> &Room {
        let wrapped = room_index.rem_euclid(self.rooms.len() as i32);
        &self.rooms[wrapped as usize]
    }

    pub fn depth(&self) -> &DepthOrder {
        &self.depth
    }

    pub fn carriable_view(&self) -> &FilteredView<CrewMember, ()> {
        &self.carriable
    }

    pub fn pressable_view(&self) -> &FilteredView<Furniture, EntityId> {
        &self.pressable
    }

    pub fn spawning_view(&self) -> &FilteredView<Furniture, usize> {
        &self.spawning
    }

    pub fn character(&self, id: EntityId) -> Result<CharacterRef<'_>, IndexError> {
        if id == self.player.id {
            return Ok(CharacterRef::Player(&self.player));
        }
        self.crew.get(id).map(CharacterRef::Crew)
    }

    /// Crew in insertion order, then the player.
    pub fn characters(&self) -> impl Iterator<Item = CharacterRef<'_>> + '_ {
        self.crew
            .iter()
            .map(CharacterRef::Crew)
            .chain(iter::once(CharacterRef::Player(&self.player)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CooloffPolicy;
    use crate::model::{Button, RoomKind, SpawnEvent, Spawner};
    use crate::sprite_keys::ImageKey;

    fn world() -> World {
        World::new(
            vec![Room { kind: RoomKind::Bridge }, Room { kind: RoomKind::Engine }],
            Body::at_rest(3.0, 0.0, 1.0, 1.0, 0),
            DepthOrder::new(0.0..0.25, 5),
        )
        .expect("world")
    }

    fn furniture(world: &mut World, key: &str) -> Furniture {
        Furniture {
            id: world.allocate_id(),
            key: key.to_string(),
            kind: ImageKey::new("console").expect("key"),
            x: 4.0,
            width: 1.0,
            height: 1.0,
            room_index: 0,
            button: None,
            spawner: None,
        }
    }

    #[test]
    fn rejects_empty_room_ring() {
        let result = World::new(Vec::new(), Body::default(), DepthOrder::new(0.0..1.0, 1));
        assert!(matches!(result, Err(LayoutError::NoRooms)));
    }

    #[test]
    fn added_crew_joins_arena_views_and_depth() {
        let mut world = world();
        let id = world
            .add_crew(CrewKind::Science, Body::at_rest(1.0, 0.0, 1.0, 1.0, 1), AiState::default())
            .expect("add");
        assert!(world.crew().has(id));
        assert!(world.carriable_view().contains(id));
        assert!(world.depth().contains(id));
        assert_eq!(world.depth().len(), 2, "player plus one crew member");
    }

    #[test]
    fn removed_crew_is_unwatched_everywhere() {
        let mut world = world();
        let id = world
            .add_crew(CrewKind::Security, Body::default(), AiState::default())
            .expect("add");
        world.player.role.carrier.carrying = Some(id);
        world.remove_crew(id).expect("remove");
        assert!(!world.carriable_view().is_watching(id));
        assert!(!world.depth().contains(id));
        assert_eq!(world.player().role.carrier.carrying, None);
        assert!(world.crew_member(id).is_err());
    }

    #[test]
    fn characters_iterate_crew_then_player() {
        let mut world = world();
        let a = world.add_crew(CrewKind::Engineering, Body::default(), AiState::default()).expect("a");
        let b = world.add_crew(CrewKind::Science, Body::default(), AiState::default()).expect("b");
        let order: Vec<_> = world.characters().map(CharacterRef::id).collect();
        assert_eq!(order, vec![a, b, world.player_id()]);
    }

    #[test]
    fn furniture_views_track_components() {
        let mut world = world();
        let mut pad = furniture(&mut world, "pad");
        pad.spawner = Some(Spawner::new(1.0, CooloffPolicy::KeepRunning));
        let pad_id = pad.id;
        let mut knob = furniture(&mut world, "knob");
        knob.button = Some(Button::new(
            SpawnEvent::Crew(CrewKind::Engineering),
            pad_id,
            1.0,
            CooloffPolicy::KeepRunning,
        ));
        let knob_id = knob.id;
        world.insert_furniture(pad).expect("pad");
        world.insert_furniture(knob).expect("knob");

        assert_eq!(world.pressable_view().get(knob_id), Some(&pad_id));
        assert!(!world.spawning_view().contains(pad_id), "empty queue");
    }

    #[test]
    fn bulk_loaded_furniture_replaces_arena_and_views() {
        let mut world = world();
        let mut old_pad = furniture(&mut world, "old_pad");
        old_pad.spawner = Some(Spawner::new(1.0, CooloffPolicy::KeepRunning));
        let old_id = old_pad.id;
        world.insert_furniture(old_pad).expect("old pad");

        let pad = furniture(&mut world, "pad");
        let pad_id = pad.id;
        let mut knob = furniture(&mut world, "knob");
        knob.button = Some(Button::new(
            SpawnEvent::Crew(CrewKind::Science),
            pad_id,
            1.0,
            CooloffPolicy::KeepRunning,
        ));
        let knob_id = knob.id;
        world.load_furniture([pad, knob]).expect("load");

        assert_eq!(world.furniture().len(), 2);
        assert!(!world.furniture().has(old_id));
        assert!(!world.spawning_view().is_watching(old_id));
        assert!(world.spawning_view().is_watching(pad_id));
        assert_eq!(world.pressable_view().get(knob_id), Some(&pad_id));
    }

    #[test]
    fn room_lookup_wraps() {
        let world = world();
        assert_eq!(world.room(-1).kind, RoomKind::Engine);
        assert_eq!(world.room(2).kind, RoomKind::Bridge);
    }
}
