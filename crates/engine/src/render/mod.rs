//! Turns world state into an ordered list of draw commands in room-local
//! units. Scaling to pixels is the drawing surface's job.

mod draw_list;
mod recolor;
mod sprites;

use crate::model::{CrewKind, EntityId, Rect, RoomKind};
use crate::sprite_keys::ImageKey;

pub use draw_list::{assemble, room_distance, shadow};
pub use recolor::{crew_recolor, recolor_variant};
pub use sprites::{body_image, frame_index, SpriteSet, SHADOW_IMAGE};

/// Symbolic colors; the surface owns the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Room(RoomKind),
    Floor,
    Player,
    Crew(CrewKind),
    Shadow,
    Furniture,
}

/// Palette swap applied to a body image: the tint plus a per-entity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecolorSpec {
    pub base: ColorTag,
    pub variant: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        color: ColorTag,
        rect: Rect,
    },
    DrawImage {
        image: ImageKey,
        rect: Rect,
        flip: bool,
        opacity: Option<f32>,
        recolor: Option<RecolorSpec>,
        /// Painted as a rectangle when the image cannot be resolved.
        fallback: ColorTag,
        source: Option<EntityId>,
    },
}

impl DrawCommand {
    pub fn rect(&self) -> &Rect {
        match self {
            DrawCommand::FillRect { rect, .. } | DrawCommand::DrawImage { rect, .. } => rect,
        }
    }

    pub fn source(&self) -> Option<EntityId> {
        match self {
            DrawCommand::FillRect { .. } => None,
            DrawCommand::DrawImage { source, .. } => *source,
        }
    }
}
