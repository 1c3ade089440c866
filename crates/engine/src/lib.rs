//! Fixed-timestep simulation core for a ring of ship rooms: a player, a
//! wandering crew, carry and throw, buttons that summon crew through
//! spawners, and draw-list assembly.

pub mod config;
pub mod index;
pub mod input;
pub mod layout;
pub mod model;
pub mod render;
pub mod sim;
mod sprite_keys;

pub use config::{CooloffPolicy, SimConfig};
pub use index::{DepthOrder, FilteredView, IdIndex, Identified, IndexError};
pub use input::{Action, ActionSet, SpeedTier};
pub use layout::{ButtonDesc, CrewSpawn, FurnitureDesc, LayoutError, PlayerSpawn, WorldLayout};
pub use model::{
    AnimationKind, AnimationState, Body, CharacterRef, CrewKind, Direction, EntityId, Furniture,
    Rect, RoomKind, SpawnEvent, World,
};
pub use render::{ColorTag, DrawCommand, RecolorSpec};
pub use sim::{SimError, Simulation, TickReport};
pub use sprite_keys::{validate_sprite_key, ImageKey, SpriteKeyError};
