//! Timed skills: Dash Strike and Dream Slash
//!
//! Each skill is an aim state that slows the whole game while a bar fills
//! in real time, followed by an execute state that moves the player at a
//! fixed speed towards the chosen point while invulnerable.

use glam::Vec2;

use crate::config::{DashStrikeTuning, DreamTuning};
use crate::game::attack::{Anchor, HitboxSpec};
use crate::game::collider::Layer;
use crate::game::entity::Entity;
use crate::game::fsm::State;
use crate::input::Button;

use super::{PlayerCx, StateId};

/// Shared setup for the execute states: constant velocity towards `target`,
/// invulnerable, no gravity. Returns the velocity and travel time, or None
/// if the target is too close to move to.
fn launch(cx: &mut PlayerCx, target: Vec2, speed: f32) -> Option<(Vec2, f32)> {
    let delta = target - cx.body.center();
    let dist = delta.length();
    if dist < 1.0 || speed <= 0.0 {
        return None;
    }
    let dir = delta / dist;
    cx.body.vel = dir * speed;
    cx.body.face_towards(dir.x);
    cx.health.invulnerable = true;
    cx.physics.grounded = true;
    Some((cx.body.vel, dist / speed))
}

fn land(cx: &mut PlayerCx) {
    cx.health.invulnerable = false;
    cx.body.vel = Vec2::ZERO;
}

// =============================================================================
// Dash Strike
// =============================================================================

pub struct DashStrikeAim {
    tuning: DashStrikeTuning,
    progress: f32,
}

impl DashStrikeAim {
    pub fn new(tuning: DashStrikeTuning) -> Self {
        Self { tuning, progress: 0.0 }
    }

    fn in_sweet_spot(&self) -> bool {
        (self.tuning.sweet_spot_start..=self.tuning.sweet_spot_end).contains(&self.progress)
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for DashStrikeAim {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        self.progress = 0.0;
        cx.pilot.aim_progress = 0.0;
        cx.body.vel.x = 0.0;
        *cx.time_scale = self.tuning.aim_time_scale;
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        cx.body.vel.x = 0.0;
        self.progress = (self.progress + cx.frame.raw_dt * self.tuning.bar_speed).min(1.0);
        cx.pilot.aim_progress = self.progress;

        if cx.input.released(Button::RightClick) {
            return Some(if self.in_sweet_spot() {
                StateId::DashStrike
            } else {
                log::debug!("dash strike missed at {:.2}", self.progress);
                StateId::Idle
            });
        }
        (self.progress >= 1.0).then_some(StateId::Idle)
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        *cx.time_scale = 1.0;
        cx.pilot.aim_progress = 0.0;
    }
}

pub struct DashStrike {
    tuning: DashStrikeTuning,
    /// Target center when the strike launched
    goal: Vec2,
    vel: Vec2,
    timer: f32,
    launched: bool,
    delivered: bool,
}

impl DashStrike {
    pub fn new(tuning: DashStrikeTuning) -> Self {
        Self { tuning, goal: Vec2::ZERO, vel: Vec2::ZERO, timer: 0.0, launched: false, delivered: false }
    }

    fn strike(&mut self, cx: &mut PlayerCx) {
        if self.delivered {
            return;
        }
        self.delivered = true;
        let t = &self.tuning;
        let spec = HitboxSpec {
            owner: cx.entity,
            layer: Layer::PlayerAttack,
            size: Vec2::splat(t.hitbox_size),
            damage: t.damage,
            knockback: t.knockback,
            life: Some(t.hitbox_life),
            anchor: Anchor::Ahead { y: -10.0 },
            follow: true,
        };
        cx.world.spawn_hitbox(&spec, cx.body);
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for DashStrike {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        self.launched = false;
        self.delivered = false;
        let goal = cx
            .pilot
            .dash_target
            .take()
            .filter(|&e| cx.world.is_active(e))
            .and_then(|e| cx.world.bodies.get(e))
            .map(|b| b.center());
        let Some(goal) = goal else {
            log::warn!("dash strike target gone before launch");
            return Some(StateId::Idle);
        };
        let (vel, time) = match launch(cx, goal, self.tuning.speed) {
            Some(motion) => motion,
            None => return Some(StateId::Idle),
        };
        self.goal = goal;
        self.vel = vel;
        self.timer = time;
        self.launched = true;
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, dt: f32) -> Option<StateId> {
        self.timer -= dt;
        cx.physics.grounded = true;
        cx.body.vel = self.vel;

        let arrived = self.goal.distance(cx.body.center()) < self.tuning.arrival_radius;
        if arrived || self.timer <= 0.0 {
            self.strike(cx);
            return Some(StateId::Idle);
        }
        None
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        if self.launched {
            land(cx);
            cx.pilot.dash_cooldown = self.tuning.cooldown;
            self.launched = false;
        }
    }
}

// =============================================================================
// Dream Slash
// =============================================================================

pub struct DreamSlashAim {
    tuning: DreamTuning,
    elapsed: f32,
}

impl DreamSlashAim {
    pub fn new(tuning: DreamTuning) -> Self {
        Self { tuning, elapsed: 0.0 }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.tuning.max_aim_time).min(1.0)
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for DreamSlashAim {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        self.elapsed = 0.0;
        cx.body.vel.x = 0.0;
        cx.pilot.aim_point = Some(cx.input.mouse());
        *cx.time_scale = self.tuning.aim_time_scale;
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, _dt: f32) -> Option<StateId> {
        cx.body.vel.x = 0.0;
        self.elapsed += cx.frame.raw_dt;
        cx.pilot.aim_progress = self.progress();
        cx.pilot.aim_point = Some(cx.input.mouse());

        if cx.input.released(Button::Click) {
            let from = cx.body.center();
            let offset = (cx.input.mouse() - from).clamp_length_max(self.tuning.max_distance);
            cx.pilot.slash_target = Some(from + offset);
            return Some(StateId::DreamSlash);
        }
        (self.elapsed >= self.tuning.max_aim_time).then_some(StateId::Idle)
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        *cx.time_scale = 1.0;
        cx.pilot.aim_progress = 0.0;
        cx.pilot.aim_point = None;
    }
}

pub struct DreamSlash {
    tuning: DreamTuning,
    vel: Vec2,
    timer: f32,
    hitbox: Option<Entity>,
}

impl DreamSlash {
    pub fn new(tuning: DreamTuning) -> Self {
        Self { tuning, vel: Vec2::ZERO, timer: 0.0, hitbox: None }
    }
}

impl<'w> State<StateId, PlayerCx<'w>> for DreamSlash {
    fn enter(&mut self, cx: &mut PlayerCx<'w>) -> Option<StateId> {
        let Some((vel, time)) = cx
            .pilot
            .slash_target
            .take()
            .and_then(|goal| launch(cx, goal, self.tuning.blink_speed))
        else {
            return Some(StateId::Idle);
        };
        self.vel = vel;
        self.timer = time;
        cx.pilot.meter = (cx.pilot.meter - self.tuning.cost).max(0.0);

        let spec = HitboxSpec {
            owner: cx.entity,
            layer: Layer::PlayerAttack,
            size: Vec2::splat(self.tuning.hitbox_size),
            damage: self.tuning.damage,
            knockback: self.tuning.knockback,
            life: None,
            anchor: Anchor::Ahead { y: -10.0 },
            follow: true,
        };
        self.hitbox = Some(cx.world.spawn_hitbox(&spec, cx.body));
        None
    }

    fn update(&mut self, cx: &mut PlayerCx<'w>, dt: f32) -> Option<StateId> {
        self.timer -= dt;
        cx.physics.grounded = true;
        cx.body.vel = self.vel;
        (self.timer <= 0.0).then_some(StateId::Idle)
    }

    fn exit(&mut self, cx: &mut PlayerCx<'w>) {
        land(cx);
        if let Some(hitbox) = self.hitbox.take() {
            cx.world.despawn(hitbox);
        }
        cx.pilot.slash_cooldown = self.tuning.cooldown;
        if cx.pilot.meter <= 0.0 && cx.pilot.dreaming {
            cx.pilot.dreaming = false;
            log::debug!("dream meter empty, waking up");
        }
    }
}
