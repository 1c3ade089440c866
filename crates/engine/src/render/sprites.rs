use crate::model::{AnimationKind, AnimationState, CrewKind, Direction};
use crate::sprite_keys::ImageKey;

pub const SHADOW_IMAGE: &str = "shadow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Stand,
    Run0,
}

impl Frame {
    const fn token(self) -> &'static str {
        match self {
            Frame::Stand => "stand",
            Frame::Run0 => "run_0",
        }
    }
}

const fn frames(kind: AnimationKind) -> &'static [Frame] {
    match kind {
        AnimationKind::Run => &[Frame::Stand, Frame::Run0],
        AnimationKind::Stand | AnimationKind::Skid => &[Frame::Stand],
        AnimationKind::Jump => &[Frame::Run0],
    }
}

/// Which character art a body is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSet {
    Player,
    Crew(CrewKind),
}

impl SpriteSet {
    const fn prefix(self) -> &'static str {
        match self {
            SpriteSet::Player => "player/cap",
            SpriteSet::Crew(CrewKind::Engineering) => "crew/eng",
            SpriteSet::Crew(CrewKind::Science) => "crew/sci",
            SpriteSet::Crew(CrewKind::Security) => "crew/sec",
        }
    }
}

pub fn frame_index(time: f32, fps: f32, frame_count: usize) -> usize {
    let step = (time.max(0.0) * fps + 0.25).floor() as usize;
    step % frame_count.max(1)
}

/// Right-facing image for the current frame, and whether to mirror it.
pub fn body_image(set: SpriteSet, animation: &AnimationState, fps: f32) -> (ImageKey, bool) {
    let frames = frames(animation.kind);
    let frame = frames[frame_index(animation.time, fps, frames.len())];
    let key = ImageKey::trusted(format!("{}/{}", set.prefix(), frame.token()));
    (key, animation.direction == Direction::Left)
}
