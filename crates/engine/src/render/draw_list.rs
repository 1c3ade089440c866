use super::recolor::crew_recolor;
use super::sprites::{body_image, SpriteSet, SHADOW_IMAGE};
use super::{ColorTag, DrawCommand};
use crate::config::SimConfig;
use crate::index::IndexError;
use crate::model::{Body, CharacterRef, Rect, World};
use crate::sprite_keys::ImageKey;

/// Shortest signed ring distance from `viewer` to `room`, in
/// `[-room_count / 2, room_count / 2]`.
pub fn room_distance(room: i32, viewer: i32, room_count: usize) -> i32 {
    let count = room_count.max(1) as i32;
    let distance = (room - viewer).rem_euclid(count);
    if distance > count / 2 {
        distance - count
    } else {
        distance
    }
}

/// Floor shadow under a body: narrower and fainter the higher it is.
pub fn shadow(body: &Body) -> (Rect, f32) {
    let scale = ((16.0 - body.y) / 16.0).max(0.0);
    let fade = (2.0 - body.y).max(0.0) / 2.0;
    let half = scale * body.width * 0.5;
    let rect = Rect {
        x0: body.x - half,
        y0: -0.2 * body.width,
        x1: body.x + half,
        y1: body.height - 0.2 * body.width,
    };
    (rect, 0.5 * fade * fade)
}

fn in_view(rect: &Rect, room_width: f32, margin: f32) -> bool {
    rect.x1 >= -margin && rect.x0 <= room_width + margin
}

/// Background, floor strip and furniture, then every visible character
/// farthest first, each as a shadow followed by its body.
pub fn assemble(world: &World, config: &SimConfig) -> Result<Vec<DrawCommand>, IndexError> {
    let viewer = world.player().body.room_index;
    let room_count = world.room_count();
    let room_width = config.room_width;
    let mut commands = Vec::with_capacity(2 + world.furniture().len() + 2 * world.depth().len());

    commands.push(DrawCommand::FillRect {
        color: ColorTag::Room(world.room(viewer).kind),
        rect: Rect {
            x0: 0.0,
            y0: 0.0,
            x1: room_width,
            y1: config.room_height,
        },
    });
    commands.push(DrawCommand::FillRect {
        color: ColorTag::Floor,
        rect: Rect {
            x0: 0.0,
            y0: 0.0,
            x1: room_width,
            y1: config.floor_height,
        },
    });

    for item in world.furniture().iter() {
        let dx = room_distance(item.room_index, viewer, room_count) as f32 * room_width;
        let rect = item.rect().offset(dx, config.floor_height);
        if !in_view(&rect, room_width, item.width) {
            continue;
        }
        let image = if item.shows_alt() {
            item.kind.variant("alt")
        } else {
            item.kind.clone()
        };
        commands.push(DrawCommand::DrawImage {
            image,
            rect,
            flip: false,
            opacity: None,
            recolor: None,
            fallback: ColorTag::Furniture,
            source: Some(item.id),
        });
    }

    for id in world.depth().iter_descending() {
        let character = world.character(id)?;
        let body = character.body();
        let dx = room_distance(body.room_index, viewer, room_count) as f32 * room_width;
        let body_rect = body.rect().offset(dx, 0.0);
        if !in_view(&body_rect, room_width, body.width) {
            continue;
        }
        let lift = config.floor_height + world.depth().depth_of(id)? * config.depth_scale;

        let (shadow_rect, opacity) = shadow(body);
        commands.push(DrawCommand::DrawImage {
            image: ImageKey::trusted(SHADOW_IMAGE.to_string()),
            rect: shadow_rect.offset(dx, lift),
            flip: false,
            opacity: Some(opacity),
            recolor: None,
            fallback: ColorTag::Shadow,
            source: Some(id),
        });

        let (set, fallback, recolor) = match character {
            CharacterRef::Crew(crew) => (
                SpriteSet::Crew(crew.role.kind),
                ColorTag::Crew(crew.role.kind),
                Some(crew_recolor(id, crew.role.kind)),
            ),
            CharacterRef::Player(_) => (SpriteSet::Player, ColorTag::Player, None),
        };
        let (image, flip) = body_image(set, character.animation(), config.anim_fps);
        commands.push(DrawCommand::DrawImage {
            image,
            rect: body_rect.offset(0.0, lift),
            flip,
            opacity: None,
            recolor,
            fallback,
            source: Some(id),
        });
    }
    Ok(commands)
}
