/// Collision detection for the runner
///
/// Every entity in the game is an axis-aligned rectangle, so collision is plain
/// AABB overlap. This module owns the `Rect` type shared by the whole simulation
/// core, which keeps the core free of any graphics-library types.
///
/// # Architecture
///
/// - `Rect`: f32 rectangle in screen pixels (origin top-left, y grows down)
/// - `Collidable` trait: implemented by every entity with bounds
/// - `aabb_intersect()`: the pure overlap test everything else is built on
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel units.
///
/// Positions are `f32` because airborne coins and the player move by
/// fractional amounts each tick. Edges are exclusive on the right/bottom, so two
/// rectangles that merely touch do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Moves the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        aabb_intersect(self, other)
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + margin * 2.0,
            h: self.h + margin * 2.0,
        }
    }
}

/// Trait for entities that participate in collision detection.
///
/// # Design Pattern: Trait-based Polymorphism
///
/// Obstacles, coins, monsters, bullets and the boss expose their bounds and
/// whether they can currently be hit. Managers run every hit test through
/// `collides_with` or `first_collision`, so a retired or collected entity is
/// never hit even before it is pruned.
pub trait Collidable {
    /// Returns the axis-aligned bounding box for this entity.
    fn bounds(&self) -> Rect;

    /// False once the entity is retired, dead or collected
    fn is_solid(&self) -> bool {
        true
    }

    fn collides_with(&self, rect: &Rect) -> bool {
        self.is_solid() && aabb_intersect(&self.bounds(), rect)
    }
}

impl Collidable for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Checks if two axis-aligned bounding boxes intersect.
///
/// # Algorithm
///
/// Two rectangles do NOT intersect if one is completely to the left, right,
/// above or below the other. If none of these hold, they overlap.
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.left() < b.right() && a.right() > b.left();
    let y_overlap = a.top() < b.bottom() && a.bottom() > b.top();

    x_overlap && y_overlap
}

/// Returns the index of the first solid entity in `entities` overlapping `target`.
pub fn first_collision<T: Collidable>(target: &Rect, entities: &[T]) -> Option<usize> {
    entities.iter().position(|entity| entity.collides_with(target))
}
