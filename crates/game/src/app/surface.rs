use std::collections::{HashMap, VecDeque};

use crewship_engine::{ColorTag, CrewKind, DrawCommand, ImageKey, RecolorSpec, Rect, RoomKind};
use tracing::{debug, trace};

pub(crate) const PIXELS_PER_UNIT: f32 = 75.0;
const RECOLOR_CACHE_CAPACITY: usize = 64;

/// Consumer of a tick's draw list.
pub(crate) trait DrawSurface {
    fn present(&mut self, commands: &[DrawCommand]);
}

pub(crate) fn palette(tag: ColorTag) -> [u8; 3] {
    match tag {
        ColorTag::Room(RoomKind::Bridge) => [0xee, 0xee, 0xee],
        ColorTag::Room(RoomKind::Engine) => [0xff, 0xee, 0xee],
        ColorTag::Room(RoomKind::Store) => [0xee, 0xff, 0xee],
        ColorTag::Floor => [96, 96, 104],
        ColorTag::Player => [154, 205, 50],
        ColorTag::Crew(CrewKind::Engineering) => [223, 208, 0],
        ColorTag::Crew(CrewKind::Science) => [49, 61, 172],
        ColorTag::Crew(CrewKind::Security) => [223, 0, 0],
        ColorTag::Shadow => [50, 50, 50],
        ColorTag::Furniture => [140, 140, 150],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: i32,
    pub(crate) y0: i32,
    pub(crate) x1: i32,
    pub(crate) y1: i32,
}

/// Room units to pixels, y flipped so the floor is at the bottom.
pub(crate) fn to_pixels(rect: &Rect, surface_height_px: i32) -> PixelRect {
    let px = |units: f32| (units * PIXELS_PER_UNIT).round() as i32;
    PixelRect {
        x0: px(rect.x0),
        y0: surface_height_px - px(rect.y1),
        x1: px(rect.x1),
        y1: surface_height_px - px(rect.y0),
    }
}

fn tint(spec: RecolorSpec) -> [u8; 3] {
    let base = palette(spec.base);
    let jitter = spec.variant.to_le_bytes();
    let mut out = [0u8; 3];
    for channel in 0..3 {
        let offset = i16::from(jitter[channel] % 33) - 16;
        out[channel] = (i16::from(base[channel]) + offset).clamp(0, 255) as u8;
    }
    out
}

/// Bounded cache of resolved recolors, evicting the oldest entry first.
#[derive(Debug)]
pub(crate) struct RecolorCache {
    capacity: usize,
    entries: HashMap<(ImageKey, RecolorSpec), [u8; 3]>,
    order: VecDeque<(ImageKey, RecolorSpec)>,
    hits: u64,
    misses: u64,
}

impl RecolorCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub(crate) fn resolve(&mut self, image: &ImageKey, spec: RecolorSpec) -> [u8; 3] {
        let key = (image.clone(), spec);
        if let Some(color) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return *color;
        }
        self.misses = self.misses.saturating_add(1);
        let color = tint(spec);
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key.clone(), color);
        self.order.push_back(key);
        color
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrameStats {
    pub(crate) fills: usize,
    pub(crate) images: usize,
    pub(crate) recolored: usize,
    pub(crate) flipped: usize,
}

/// Headless surface that rasterizes nothing and traces each command in
/// pixel space.
#[derive(Debug)]
pub(crate) struct TraceSurface {
    height_px: i32,
    recolors: RecolorCache,
    frames: u64,
    last_frame: FrameStats,
}

impl TraceSurface {
    pub(crate) fn new(room_height: f32) -> Self {
        Self {
            height_px: (room_height * PIXELS_PER_UNIT).round() as i32,
            recolors: RecolorCache::new(RECOLOR_CACHE_CAPACITY),
            frames: 0,
            last_frame: FrameStats::default(),
        }
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    pub(crate) fn recolors(&self) -> &RecolorCache {
        &self.recolors
    }
}

impl DrawSurface for TraceSurface {
    fn present(&mut self, commands: &[DrawCommand]) {
        let mut stats = FrameStats::default();
        for command in commands {
            match command {
                DrawCommand::FillRect { color, rect } => {
                    stats.fills += 1;
                    let px = to_pixels(rect, self.height_px);
                    trace!(color = ?palette(*color), x0 = px.x0, y0 = px.y0, x1 = px.x1, y1 = px.y1, "draw_fill");
                }
                DrawCommand::DrawImage {
                    image,
                    rect,
                    flip,
                    opacity,
                    recolor,
                    fallback,
                    ..
                } => {
                    stats.images += 1;
                    if *flip {
                        stats.flipped += 1;
                    }
                    let tint = match recolor {
                        Some(spec) => {
                            stats.recolored += 1;
                            self.recolors.resolve(image, *spec)
                        }
                        None => palette(*fallback),
                    };
                    let px = to_pixels(rect, self.height_px);
                    trace!(
                        image = %image,
                        flip = *flip,
                        opacity = opacity.unwrap_or(1.0),
                        tint = ?tint,
                        x0 = px.x0,
                        y0 = px.y0,
                        x1 = px.x1,
                        y1 = px.y1,
                        "draw_image"
                    );
                }
            }
        }
        self.frames = self.frames.saturating_add(1);
        self.last_frame = stats;
        debug!(
            frame = self.frames,
            fills = stats.fills,
            images = stats.images,
            recolored = stats.recolored,
            "frame_presented"
        );
    }
}

#[cfg(test)]
mod tests {
    use crewship_engine::EntityId;

    use super::*;

    fn spec(kind: CrewKind, variant: u32) -> RecolorSpec {
        RecolorSpec {
            base: ColorTag::Crew(kind),
            variant,
        }
    }

    fn key(raw: &str) -> ImageKey {
        ImageKey::new(raw).expect("key")
    }

    #[test]
    fn pixels_flip_vertically() {
        let rect = Rect {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 0.5,
        };
        let px = to_pixels(&rect, 188);
        assert_eq!(px, PixelRect { x0: 0, y0: 150, x1: 75, y1: 188 });
    }

    #[test]
    fn tint_stays_near_base_color() {
        let base = palette(ColorTag::Crew(CrewKind::Science));
        let tinted = tint(spec(CrewKind::Science, 0xdead_beef));
        for channel in 0..3 {
            let delta = (i16::from(base[channel]) - i16::from(tinted[channel])).abs();
            assert!(delta <= 16, "channel {channel} moved by {delta}");
        }
    }

    #[test]
    fn cache_hits_on_repeat_and_stays_bounded() {
        let mut cache = RecolorCache::new(2);
        let image = key("crew/eng/stand");
        let first = cache.resolve(&image, spec(CrewKind::Engineering, 1));
        let again = cache.resolve(&image, spec(CrewKind::Engineering, 1));
        assert_eq!(first, again);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        cache.resolve(&image, spec(CrewKind::Engineering, 2));
        cache.resolve(&image, spec(CrewKind::Engineering, 3));
        assert_eq!(cache.len(), 2);
        cache.resolve(&image, spec(CrewKind::Engineering, 1));
        assert_eq!(cache.misses(), 4, "oldest entry was evicted");
    }

    #[test]
    fn trace_surface_counts_commands() {
        let mut surface = TraceSurface::new(2.5);
        let rect = Rect {
            x0: 1.0,
            y0: 0.25,
            x1: 2.0,
            y1: 1.25,
        };
        let commands = vec![
            DrawCommand::FillRect {
                color: ColorTag::Room(RoomKind::Store),
                rect,
            },
            DrawCommand::DrawImage {
                image: key("crew/sec/run_0"),
                rect,
                flip: true,
                opacity: None,
                recolor: Some(spec(CrewKind::Security, 9)),
                fallback: ColorTag::Crew(CrewKind::Security),
                source: Some(EntityId(4)),
            },
        ];
        surface.present(&commands);
        surface.present(&commands);
        assert_eq!(surface.frames(), 2);
        assert_eq!(
            surface.last_frame(),
            FrameStats {
                fills: 1,
                images: 1,
                recolored: 1,
                flipped: 1,
            }
        );
        assert_eq!(surface.recolors().hits(), 1);
    }
}
