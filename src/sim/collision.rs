//! Axis-aligned collision tests
//!
//! Hitboxes are shrunk on every side before testing, so near misses read as
//! misses on a small touch screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HITBOX_PAD_X, HITBOX_PAD_Y};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Overlap of two rectangles along each axis after shrinking both by `pad`
///
/// Each component is the smaller of the two edge-to-edge penetrations on that
/// axis; it is positive only where the inset rectangles overlap.
pub fn inset_overlap(a: &Rect, b: &Rect, pad: Vec2) -> Vec2 {
    let x = ((a.right() - pad.x) - (b.left() + pad.x)).min((b.right() - pad.x) - (a.left() + pad.x));
    let y = ((a.bottom() - pad.y) - (b.top() + pad.y)).min((b.bottom() - pad.y) - (a.top() + pad.y));
    Vec2::new(x, y)
}

/// True iff the inset rectangles overlap on both axes
pub fn inset_collision(a: &Rect, b: &Rect, pad: Vec2) -> bool {
    let overlap = inset_overlap(a, b, pad);
    overlap.x > 0.0 && overlap.y > 0.0
}

/// Collision test used between the bike and everything on the road
#[inline]
pub fn check_collision(bike: &Rect, other: &Rect) -> bool {
    inset_collision(bike, other, Vec2::new(HITBOX_PAD_X, HITBOX_PAD_Y))
}
