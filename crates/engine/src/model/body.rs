#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Axis-aligned rectangle, `x0 <= x1` and `y0 <= y1`, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Horizontally centered on `x`, standing on `y`.
    pub fn standing(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x0: x - width * 0.5,
            y0: y,
            x1: x + width * 0.5,
            y1: y + height,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

/// Kinematic state shared by every character. `y` is height above the floor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub width: f32,
    pub height: f32,
    pub room_index: i32,
}

impl Body {
    pub fn at_rest(x: f32, y: f32, width: f32, height: f32, room_index: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            room_index,
            ..Self::default()
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::standing(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::standing(0.0, 0.0, 1.0, 1.0);
        let b = Rect::standing(1.0, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        let c = Rect::standing(0.9, 0.5, 1.0, 1.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn standing_rect_is_centered() {
        let rect = Body::at_rest(3.0, 0.5, 1.0, 2.0, 0).rect();
        assert_eq!(
            rect,
            Rect {
                x0: 2.5,
                y0: 0.5,
                x1: 3.5,
                y1: 2.5
            }
        );
    }
}
