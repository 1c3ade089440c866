//! Incrementally maintained indices over the entity arenas.
//!
//! Nothing here observes mutation on its own: the call sites that mutate an
//! arena also tell the affected indices, one entity at a time.

mod depth_order;
mod filtered_view;
mod id_index;

pub use depth_order::DepthOrder;
pub use filtered_view::FilteredView;
pub use id_index::{IdIndex, Identified};

use thiserror::Error;

use crate::model::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("entity {0} is not present in the index")]
    NotFound(EntityId),
    #[error("entity {0} is already watched by this view")]
    AlreadyWatched(EntityId),
    #[error("entity {0} is not watched by this view")]
    NotWatched(EntityId),
}
