//! Axis-aligned box geometry in integer screen pixels
//!
//! Every entity occupies a `Rect`. `x`/`y` is the top-left corner, `y` grows
//! downward, and the right/bottom edges are exclusive.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.center_y())
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Move the box by `delta`
    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Copy of the box moved by `delta`
    pub fn translated(mut self, delta: IVec2) -> Self {
        self.translate(delta);
        self
    }

    /// Copy of the box grown downward by `extra` pixels
    pub fn extended_down(mut self, extra: i32) -> Self {
        self.h += extra;
        self
    }

    /// Strict overlap test: boxes that only share an edge do not intersect,
    /// and an empty box intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Width of the horizontal overlap of the two boxes (negative when apart)
    pub fn overlap_width(&self, other: &Rect) -> i32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Horizontal overlap left after trimming `gap` from both sides.
    ///
    /// Positive means the contact is wide enough to be a floor/ceiling hit.
    pub fn trimmed_overlap_width(&self, other: &Rect, gap: i32) -> i32 {
        self.overlap_width(other) - 2 * gap
    }
}
