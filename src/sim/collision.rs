//! Collision detection
//!
//! Axis-aligned boxes only. Each entity's visual box is shrunk by an inset
//! before testing so near misses against sprite padding don't end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Character, Obstacle};

/// Axis-aligned rectangle (top-left origin, y grows downward)
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

    /// Shrink inward by `inset` on each side
    pub fn shrink(&self, inset: &Inset) -> Rect {
        Rect {
            pos: self.pos + Vec2::new(inset.left, inset.top),
            size: self.size - Vec2::new(inset.left + inset.right, inset.top + inset.bottom),
        }
    }

    /// True if both extents are positive
    #[inline]
    pub fn has_area(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Strict overlap on both axes. Touching edges do not count, and a
    /// rectangle without area never overlaps anything.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.has_area()
            && other.has_area()
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Per-side inward margin applied to a visual box to get its hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inset {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Inset {
    pub const fn uniform(margin: f32) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        }
    }

    /// True if a box of the given size keeps a positive area after shrinking
    pub fn leaves_area(&self, width: f32, height: f32) -> bool {
        width - self.left - self.right > 0.0 && height - self.top - self.bottom > 0.0
    }
}

/// Character hitbox for the current position
pub fn character_hitbox(character: &Character, inset: &Inset) -> Rect {
    character.rect().shrink(inset)
}

/// Obstacle hitbox
pub fn obstacle_hitbox(obstacle: &Obstacle, inset: &Inset) -> Rect {
    obstacle.rect().shrink(inset)
}

/// True if the character's hitbox overlaps any obstacle hitbox
pub fn hits_any_obstacle(
    character: &Character,
    obstacles: &[Obstacle],
    character_inset: &Inset,
    obstacle_inset: &Inset,
) -> bool {
    let hitbox = character_hitbox(character, character_inset);
    obstacles
        .iter()
        .any(|obstacle| hitbox.overlaps(&obstacle_hitbox(obstacle, obstacle_inset)))
}
