//! Side-scrolling camera

use glam::Vec2;

use super::{VIEW_HEIGHT, VIEW_WIDTH};

/// World position of the screen's top-left corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    /// Center on `target`, clamped so the view never leaves the world.
    pub fn follow(&mut self, target: Vec2, world_size: (f32, f32)) {
        let view = Vec2::new(VIEW_WIDTH, VIEW_HEIGHT);
        let max = (Vec2::new(world_size.0, world_size.1) - view).max(Vec2::ZERO);
        self.offset = (target - view * 0.5).clamp(Vec2::ZERO, max);
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}
