//! Axis-aligned colliders and collision layers

use glam::Vec2;

/// Collision layer tag.
///
/// Which layers are ever tested against each other is decided by the
/// [`CollisionManager`](super::collision::CollisionManager) rule matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Default,
    Player,
    /// Player mid-roll; enemies have no rule against it
    PlayerRolling,
    Enemy,
    PlayerAttack,
    EnemyAttack,
    EnemyProjectile,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Default,
        Layer::Player,
        Layer::PlayerRolling,
        Layer::Enemy,
        Layer::PlayerAttack,
        Layer::EnemyAttack,
        Layer::EnemyProjectile,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }
}

/// World-space rectangle, top-left origin, y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
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

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap; touching edges don't count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Penetration depth on each axis, or None when the rects are apart.
    pub fn overlap(&self, other: &Rect) -> Option<Vec2> {
        if !self.intersects(other) {
            return None;
        }
        Some(Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.bottom().min(other.bottom()) - self.top().max(other.top()),
        ))
    }
}

/// Collision box attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Offset from the entity's top-left
    pub offset: Vec2,
    pub size: Vec2,
    pub layer: Layer,
    /// Triggers report overlaps but are never pushed apart
    pub trigger: bool,
}

impl Collider {
    /// Solid collider covering `size`.
    pub fn solid(size: Vec2, layer: Layer) -> Self {
        Self { offset: Vec2::ZERO, size, layer, trigger: false }
    }

    /// Trigger collider covering `size`.
    pub fn trigger(size: Vec2, layer: Layer) -> Self {
        Self { offset: Vec2::ZERO, size, layer, trigger: true }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Bounds for an entity at `pos`.
    pub fn bounds(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos + self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_position() {
        let c = Collider::solid(Vec2::new(10.0, 20.0), Layer::Enemy).with_offset(Vec2::new(2.0, 3.0));
        let a = c.bounds(Vec2::new(100.0, 50.0));
        assert_eq!(a, Rect::new(102.0, 53.0, 10.0, 20.0));
        assert_eq!(c.bounds(Vec2::new(100.0, 50.0)), a);
    }

    #[test]
    fn test_overlap_depths() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(7.0, 4.0, 10.0, 10.0);
        assert_eq!(a.overlap(&b), Some(Vec2::new(3.0, 6.0)));
        assert_eq!(b.overlap(&a), Some(Vec2::new(3.0, 6.0)));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.overlap(&b), None);
    }

    #[test]
    fn test_layer_indices_are_dense() {
        for (i, layer) in Layer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
    }
}
