//! Static world layout as read at world-init, and world construction from it.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::SimConfig;
use crate::index::{DepthOrder, IndexError};
use crate::model::{
    Body, Button, CrewKind, EntityId, Furniture, Room, RoomKind, SpawnEvent, Spawner, World,
};
use crate::sim::ai;
use crate::sprite_keys::{ImageKey, SpriteKeyError};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout must contain at least one room")]
    NoRooms,
    #[error("invalid config field {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{what} '{name}' is placed in room {room}, but the ring has {room_count} rooms")]
    RoomOutOfRange {
        what: &'static str,
        name: String,
        room: i32,
        room_count: usize,
    },
    #[error("furniture key '{0}' is declared twice")]
    DuplicateFurnitureKey(String),
    #[error("button '{button}' notifies unknown furniture '{target}'")]
    UnknownNotifyTarget { button: String, target: String },
    #[error("button '{button}' notifies '{target}', which has no spawner")]
    TargetWithoutSpawner { button: String, target: String },
    #[error("furniture '{key}' has invalid type '{kind}': {source}")]
    InvalidFurnitureType {
        key: String,
        kind: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("furniture '{key}' must have a positive width and height")]
    NonPositiveSize { key: String },
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldLayout {
    pub rooms: Vec<RoomKind>,
    #[serde(default)]
    pub player: PlayerSpawn,
    #[serde(default)]
    pub crew: Vec<CrewSpawn>,
    #[serde(default)]
    pub furniture: Vec<FurnitureDesc>,
    #[serde(default)]
    pub config: SimConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSpawn {
    pub x: f32,
    #[serde(default)]
    pub room: i32,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self { x: 3.0, room: 0 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrewSpawn {
    pub kind: CrewKind,
    pub x: f32,
    #[serde(default)]
    pub room: i32,
}

fn unit_length() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FurnitureDesc {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    #[serde(default = "unit_length")]
    pub width: f32,
    #[serde(default = "unit_length")]
    pub height: f32,
    #[serde(default)]
    pub room: i32,
    #[serde(default)]
    pub button: Option<ButtonDesc>,
    #[serde(default)]
    pub spawner: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonDesc {
    pub event: SpawnEvent,
    pub target: String,
}

impl WorldLayout {
    pub fn new(rooms: Vec<RoomKind>) -> Self {
        Self {
            rooms,
            player: PlayerSpawn::default(),
            crew: Vec::new(),
            furniture: Vec::new(),
            config: SimConfig::default(),
        }
    }

    fn check_room(&self, what: &'static str, name: &str, room: i32) -> Result<(), LayoutError> {
        if room < 0 || room as usize >= self.rooms.len() {
            return Err(LayoutError::RoomOutOfRange {
                what,
                name: name.to_string(),
                room,
                room_count: self.rooms.len(),
            });
        }
        Ok(())
    }

    /// Builds the initial world. Random draws (default depths, AI countdowns)
    /// come from `rng`.
    pub fn build(&self, rng: &mut StdRng) -> Result<World, LayoutError> {
        let config = &self.config;
        if let Some((field, reason)) = config.invalid_field() {
            return Err(LayoutError::InvalidConfig { field, reason });
        }
        if self.rooms.is_empty() {
            return Err(LayoutError::NoRooms);
        }
        self.check_room("player", "player", self.player.room)?;

        let rooms = self.rooms.iter().map(|kind| Room { kind: *kind }).collect();
        let depth = DepthOrder::with_rng(
            config.depth_min..config.depth_max,
            StdRng::seed_from_u64(rng.gen()),
        );
        let player_body = Body::at_rest(
            self.player.x,
            0.0,
            config.character_width,
            config.character_height,
            self.player.room,
        );
        let mut world = World::new(rooms, player_body, depth)?;

        for (slot, spawn) in self.crew.iter().enumerate() {
            self.check_room("crew", &format!("crew[{slot}]"), spawn.room)?;
            let body = Body::at_rest(
                spawn.x,
                0.0,
                config.character_width,
                config.character_height,
                spawn.room,
            );
            world.add_crew(spawn.kind, body, ai::initial_state(rng, config))?;
        }

        let mut ids = Vec::with_capacity(self.furniture.len());
        let mut ids_by_key: HashMap<&str, (EntityId, bool)> = HashMap::new();
        for desc in &self.furniture {
            self.check_room("furniture", &desc.key, desc.room)?;
            if !(desc.width > 0.0 && desc.height > 0.0) {
                return Err(LayoutError::NonPositiveSize {
                    key: desc.key.clone(),
                });
            }
            let id = world.allocate_id();
            if ids_by_key
                .insert(desc.key.as_str(), (id, desc.spawner))
                .is_some()
            {
                return Err(LayoutError::DuplicateFurnitureKey(desc.key.clone()));
            }
            ids.push(id);
        }

        let mut furniture = Vec::with_capacity(self.furniture.len());
        for (desc, id) in self.furniture.iter().zip(ids) {
            let kind =
                ImageKey::new(desc.kind.clone()).map_err(|source| LayoutError::InvalidFurnitureType {
                    key: desc.key.clone(),
                    kind: desc.kind.clone(),
                    source,
                })?;
            let button = match &desc.button {
                Some(button) => {
                    let (target, has_spawner) = ids_by_key
                        .get(button.target.as_str())
                        .copied()
                        .ok_or_else(|| LayoutError::UnknownNotifyTarget {
                            button: desc.key.clone(),
                            target: button.target.clone(),
                        })?;
                    if !has_spawner {
                        return Err(LayoutError::TargetWithoutSpawner {
                            button: desc.key.clone(),
                            target: button.target.clone(),
                        });
                    }
                    Some(Button::new(
                        button.event,
                        target,
                        config.button_cooloff,
                        config.cooloff_policy,
                    ))
                }
                None => None,
            };
            let spawner = desc
                .spawner
                .then(|| Spawner::new(config.spawner_cooloff, config.cooloff_policy));
            furniture.push(Furniture {
                id,
                key: desc.key.clone(),
                kind,
                x: desc.x,
                width: desc.width,
                height: desc.height,
                room_index: desc.room,
                button,
                spawner,
            });
        }
        world.load_furniture(furniture)?;

        info!(
            rooms = world.room_count(),
            crew = world.crew().len(),
            furniture = world.furniture().len(),
            "world_built"
        );
        Ok(world)
    }
}
