//! The per-tick simulation pipeline.

pub mod ai;
pub mod animation;
pub mod interaction;
pub mod physics;
pub mod spawning;
mod tick;

use thiserror::Error;

use crate::index::IndexError;
use crate::model::EntityId;

pub use tick::{Simulation, TickReport};

/// Invariant violations that abort the current tick.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("carry link between {carrier} and {carried} does not point back")]
    CarryLinkBroken { carrier: EntityId, carried: EntityId },
    #[error("carried {carried} is in room {carried_room}, its carrier in room {carrier_room}")]
    CarryRoomMismatch {
        carried: EntityId,
        carried_room: i32,
        carrier_room: i32,
    },
    #[error("{id} holds both speed tiers of one side")]
    ConflictingIntent { id: EntityId },
    #[error("button {button} notifies {target}, which has no spawner")]
    NotifyTargetNotSpawner { button: EntityId, target: EntityId },
}
