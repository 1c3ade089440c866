mod body;
mod character;
mod furniture;
mod ids;
mod room;
mod world;

pub use body::{Body, Direction, Rect};
pub use character::{
    AiState, AnimationKind, AnimationState, Carriable, Carrier, Character, CharacterRef, CrewKind,
    CrewMember, CrewRole, Interactor, Player, PlayerRole,
};
pub use furniture::{Button, Cooloff, Furniture, SpawnEvent, Spawner};
pub use ids::{EntityId, EntityIdAllocator};
pub use room::{Room, RoomKind};
pub use world::World;
