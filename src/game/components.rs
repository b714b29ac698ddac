//! Shared actor components
//!
//! Plain data. Behaviour lives in `physics`, the player states and the
//! enemy AI; role-specific data (player pilot, enemy brain, hitboxes) lives
//! next to the code that drives it.

use glam::Vec2;

use super::collider::Rect;

// =============================================================================
// Movement
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing implied by a horizontal component; None at zero.
    pub fn from_x(x: f32) -> Option<Facing> {
        if x < 0.0 {
            Some(Facing::Left)
        } else if x > 0.0 {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Position, velocity and extent of anything that exists in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner in world pixels
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, vel: Vec2::ZERO, size, facing: Facing::Right }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Y of the bottom edge.
    pub fn feet(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Turn to face the sign of `x`; zero keeps the current facing.
    pub fn face_towards(&mut self, x: f32) {
        if let Some(facing) = Facing::from_x(x) {
            self.facing = facing;
        }
    }
}

/// Tile-physics state for actors that walk on the map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicsBody {
    pub grounded: bool,
    pub on_slope: bool,
    /// Consecutive ticks spent without ground contact
    pub airborne_frames: u32,
}

// =============================================================================
// Combat
// =============================================================================

/// What a call to [`Health::take_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable, still cooling down from the last hit, or already dead
    Ignored,
    Hurt,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    /// Set by dodges and skills; every hit is ignored while true
    pub invulnerable: bool,
    /// Seconds of immunity granted after each hit
    pub cooldown: f32,
    /// Immunity left from the last hit
    pub cooldown_timer: f32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            invulnerable: false,
            cooldown: 0.0,
            cooldown_timer: 0.0,
        }
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = seconds;
        self
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.invulnerable || self.cooldown_timer > 0.0 || self.is_dead() {
            return DamageOutcome::Ignored;
        }
        self.current -= amount;
        self.cooldown_timer = self.cooldown;
        if self.is_dead() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            (self.current.max(0) as f32 / self.max as f32).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_death() {
        let mut hp = Health::new(40);
        assert_eq!(hp.take_damage(25), DamageOutcome::Hurt);
        assert_eq!(hp.current, 15);
        assert_eq!(hp.take_damage(25), DamageOutcome::Killed);
        assert!(hp.is_dead());
        assert_eq!(hp.take_damage(25), DamageOutcome::Ignored);
    }

    #[test]
    fn test_cooldown_blocks_followup_hits() {
        let mut hp = Health::new(100).with_cooldown(0.3);
        assert_eq!(hp.take_damage(10), DamageOutcome::Hurt);
        assert_eq!(hp.take_damage(10), DamageOutcome::Ignored);
        hp.tick(0.2);
        assert_eq!(hp.take_damage(10), DamageOutcome::Ignored);
        hp.tick(0.11);
        assert_eq!(hp.take_damage(10), DamageOutcome::Hurt);
        assert_eq!(hp.current, 80);
    }

    #[test]
    fn test_invulnerable_ignores_damage() {
        let mut hp = Health::new(10);
        hp.invulnerable = true;
        assert_eq!(hp.take_damage(50), DamageOutcome::Ignored);
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn test_face_towards_keeps_facing_at_zero() {
        let mut body = Body::new(Vec2::ZERO, Vec2::new(32.0, 48.0));
        body.face_towards(-3.0);
        assert_eq!(body.facing, Facing::Left);
        body.face_towards(0.0);
        assert_eq!(body.facing, Facing::Left);
        assert_eq!(body.center(), Vec2::new(16.0, 24.0));
        assert_eq!(body.feet(), 48.0);
    }
}
