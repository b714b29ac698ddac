//! Movement and melee states

use glam::Vec2;

use crate::config::{AttackTuning, RollMode, RollTuning};
use crate::game::attack::{Anchor, HitboxSpec};
use crate::game::collider::Layer;
use crate::game::entity::Entity;
use crate::game::fsm::State;

use super::{PlayerCx, StateId};

/// Horizontal air control shared by Jump and Fall: steer while a
/// direction is held, bleed speed off otherwise.
fn air_control(cx: &mut PlayerCx) {
    if cx.input.current.any_horizontal() {
        cx.steer();
    } else {
        cx.body.vel.x *= cx.pilot.tuning.air_friction;
    }
}

// =============================================================================
// Idle / Run
// =============================================================================

pub struct Idle;

impl<'w> State<StateId, PlayerCx<'w>> for Idle {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        cx.body.vel.x = 0.0;
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        cx.body.vel.x = 0.0;
        cx.input.current.any_horizontal().then_some(StateId::Run)
    }
}

pub struct Run;

impl<'w> State<StateId, PlayerCx<'w>> for Run {
    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        if cx.steer() == 0.0 {
            return Some(StateId::Idle);
        }
        None
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        cx.body.vel.x = 0.0;
    }
}

// =============================================================================
// Jump / Fall
// =============================================================================

pub struct Jump;

impl<'w> State<StateId, PlayerCx<'w>> for Jump {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        cx.body.vel.y = -cx.pilot.tuning.jump_velocity;
        cx.physics.grounded = false;
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        air_control(cx);
        cx.physics.grounded.then(|| cx.settle())
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        if cx.physics.grounded {
            cx.body.vel.y = 0.0;
        }
    }
}

pub struct Fall;

impl<'w> State<StateId, PlayerCx<'w>> for Fall {
    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        air_control(cx);
        cx.physics.grounded.then(|| cx.settle())
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        if cx.physics.grounded {
            cx.body.vel.y = 0.0;
        }
    }
}

// =============================================================================
// Roll
// =============================================================================

pub struct Roll {
    tuning: RollTuning,
    timer: f32,
    dir: f32,
}

impl Roll {
    pub fn new(tuning: RollTuning) -> Self {
        Self { tuning, timer: 0.0, dir: 1.0 }
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for Roll {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        self.timer = self.tuning.duration;
        self.dir = cx.body.facing.sign();
        cx.body.vel = Vec2::new(self.dir * self.tuning.speed, 0.0);
        cx.physics.grounded = true;
        match self.tuning.mode {
            RollMode::PassThrough => cx.collider.layer = Layer::PlayerRolling,
            RollMode::Invulnerable => cx.health.invulnerable = true,
        }
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, dt: f32) -> Option<StateId> {
        self.timer -= dt;
        cx.body.vel.x = self.dir * self.tuning.speed;
        (self.timer <= 0.0).then_some(StateId::Idle)
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        cx.collider.layer = Layer::Player;
        cx.health.invulnerable = false;
        cx.body.vel.x = 0.0;
    }
}

// =============================================================================
// Attack
// =============================================================================

/// Melee swing: an eight-way hitbox that follows the player, plus a short
/// lunge in the swing direction.
pub struct Attack {
    tuning: AttackTuning,
    timer: f32,
    dir: Vec2,
    hitbox: Option<Entity>,
}

impl Attack {
    pub fn new(tuning: AttackTuning) -> Self {
        Self { tuning, timer: 0.0, dir: Vec2::X, hitbox: None }
    }

    /// Direction from held keys; diagonals come out unit length, left and
    /// up win over their opposites. With no keys held the swing goes the
    /// way the player faces.
    pub fn direction(cx: &PlayerCx) -> Vec2 {
        let keys = &cx.input.current;
        let raw = Vec2::new(keys.horizontal(), keys.vertical());
        if raw == Vec2::ZERO {
            Vec2::new(cx.body.facing.sign(), 0.0)
        } else {
            raw.normalize()
        }
    }

    fn hitbox_spec(&self, cx: &PlayerCx) -> HitboxSpec {
        let t = &self.tuning;
        let size = cx.body.size;
        let (hit_size, anchor) = if self.dir.y.abs() > self.dir.x.abs() {
            let y = if self.dir.y < 0.0 { -t.reach } else { size.y };
            (Vec2::new(t.thickness, t.reach), Anchor::Offset(Vec2::new((size.x - t.thickness) / 2.0, y)))
        } else {
            // diagonal swings ride half a body up or down
            let lift = if self.dir.y == 0.0 { 0.0 } else { self.dir.y.signum() * size.y / 2.0 };
            let y = (size.y - t.thickness) / 2.0 + lift;
            (Vec2::new(t.reach, t.thickness), Anchor::Ahead { y })
        };
        HitboxSpec {
            owner: cx.entity,
            layer: Layer::PlayerAttack,
            size: hit_size,
            damage: t.damage,
            knockback: t.knockback,
            life: None,
            anchor,
            follow: true,
        }
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for Attack {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        self.timer = 0.0;
        self.dir = Self::direction(cx);
        cx.body.face_towards(self.dir.x);
        if self.dir.y != 0.0 {
            cx.physics.grounded = false;
        }
        let spec = self.hitbox_spec(cx);
        self.hitbox = Some(cx.world.spawn_hitbox(&spec, cx.body));
        log::debug!("attack {:?}", self.dir);
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, dt: f32) -> Option<StateId> {
        self.timer += dt;
        if self.timer < self.tuning.lunge_duration {
            let speed = self.tuning.lunge_speed * (1.0 - self.timer / self.tuning.lunge_duration);
            cx.body.vel = self.dir * speed;
        } else {
            cx.steer();
        }
        (self.timer >= self.tuning.duration).then(|| cx.settle())
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        if let Some(hitbox) = self.hitbox.take() {
            cx.world.despawn(hitbox);
        }
    }
}
