//! Player controller
//!
//! The player is a state machine over a [`PlayerCx`]: each frame the
//! player's components are checked out of the world, a few global rules
//! (skills, jump, roll, attack, fall) may force a transition, the current
//! state runs, and then the shared tile physics moves the body.

mod skills;
mod states;

use glam::Vec2;

use crate::clock::Frame;
use crate::config::{PhysicsTuning, PlayerTuning};
use crate::input::{Button, InputFrame};
use crate::map::TileQuery;

use super::collider::Collider;
use super::components::{Body, Health, PhysicsBody};
use super::entity::Entity;
use super::fsm::{State, StateMachine};
use super::physics::{self, StepReport};
use super::world::World;

pub use skills::*;
pub use states::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Idle,
    Run,
    Jump,
    Fall,
    Roll,
    Attack,
    DashStrikeAim,
    DashStrike,
    DreamSlashAim,
    DreamSlash,
}

impl StateId {
    pub const ALL: [StateId; 10] = [
        StateId::Idle,
        StateId::Run,
        StateId::Jump,
        StateId::Fall,
        StateId::Roll,
        StateId::Attack,
        StateId::DashStrikeAim,
        StateId::DashStrike,
        StateId::DreamSlashAim,
        StateId::DreamSlash,
    ];

    /// States that own the player until they finish on their own.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            StateId::Roll
                | StateId::Attack
                | StateId::DashStrikeAim
                | StateId::DashStrike
                | StateId::DreamSlashAim
                | StateId::DreamSlash
        )
    }

    /// States the airborne Fall rule leaves alone.
    pub fn ignores_fall(self) -> bool {
        self == StateId::Fall || self.is_busy()
    }
}

/// Everything a player state may touch during one frame.
pub struct PlayerCx<'w> {
    pub entity: Entity,
    pub body: &'w mut Body,
    pub physics: &'w mut PhysicsBody,
    pub health: &'w mut Health,
    pub collider: &'w mut Collider,
    pub pilot: &'w mut Pilot,
    /// The rest of the world; the player's own components are checked out
    pub world: &'w mut World,
    pub frame: Frame,
    pub input: &'w InputFrame,
    /// Global time scale, applied from the next frame on
    pub time_scale: &'w mut f32,
}

impl PlayerCx<'_> {
    /// Run speed with the dream multiplier applied.
    pub fn speed(&self) -> f32 {
        self.pilot.speed()
    }

    /// Left/right input mapped onto vx, turning the body to match.
    /// Returns the input direction (-1, 0 or 1).
    pub fn steer(&mut self) -> f32 {
        let dir = self.input.current.horizontal();
        self.body.vel.x = dir * self.speed();
        self.body.face_towards(dir);
        dir
    }

    /// Run if a direction is held, otherwise idle.
    pub fn settle(&self) -> StateId {
        if self.input.current.any_horizontal() {
            StateId::Run
        } else {
            StateId::Idle
        }
    }
}

pub type DynPlayerState = dyn for<'w> State<StateId, PlayerCx<'w>>;
pub type PlayerMachine = StateMachine<StateId, DynPlayerState>;

/// Player-only data that outlives individual states.
#[derive(Debug, Clone)]
pub struct Pilot {
    pub tuning: PlayerTuning,
    pub dreaming: bool,
    pub meter: f32,
    pub dash_cooldown: f32,
    pub slash_cooldown: f32,
    /// Enemy locked when Dash Strike aiming started
    pub dash_target: Option<Entity>,
    /// World point committed by Dream Slash aiming
    pub slash_target: Option<Vec2>,
    /// Fill of whichever aim bar is up (0..=1), for the HUD
    pub aim_progress: f32,
    /// Current aim point while Dream Slash aiming
    pub aim_point: Option<Vec2>,
    booted: bool,
}

impl Pilot {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            dreaming: false,
            meter: 0.0,
            dash_cooldown: 0.0,
            slash_cooldown: 0.0,
            dash_target: None,
            slash_target: None,
            aim_progress: 0.0,
            aim_point: None,
            booted: false,
        }
    }

    pub fn speed(&self) -> f32 {
        if self.dreaming {
            self.tuning.speed * self.tuning.dream.speed_multiplier
        } else {
            self.tuning.speed
        }
    }

    pub fn gain_meter(&mut self, amount: f32) {
        self.meter = (self.meter + amount).min(self.tuning.dream.meter_max);
    }

    pub fn can_blink(&self) -> bool {
        self.meter >= self.tuning.dream.cost
    }

    fn tick(&mut self, dt: f32) {
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.slash_cooldown = (self.slash_cooldown - dt).max(0.0);
    }
}

/// Player component: the state machine plus the data it drives.
pub struct Player {
    pub machine: PlayerMachine,
    pub pilot: Pilot,
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self { machine: build_machine(&tuning), pilot: Pilot::new(tuning) }
    }

    pub fn state(&self) -> Option<StateId> {
        self.machine.current()
    }
}

pub fn build_machine(tuning: &PlayerTuning) -> PlayerMachine {
    PlayerMachine::new()
        .with(StateId::Idle, Box::new(Idle))
        .with(StateId::Run, Box::new(Run))
        .with(StateId::Jump, Box::new(Jump))
        .with(StateId::Fall, Box::new(Fall))
        .with(StateId::Roll, Box::new(Roll::new(tuning.roll.clone())))
        .with(StateId::Attack, Box::new(Attack::new(tuning.attack.clone())))
        .with(StateId::DashStrikeAim, Box::new(DashStrikeAim::new(tuning.dash_strike.clone())))
        .with(StateId::DashStrike, Box::new(DashStrike::new(tuning.dash_strike.clone())))
        .with(StateId::DreamSlashAim, Box::new(DreamSlashAim::new(tuning.dream.clone())))
        .with(StateId::DreamSlash, Box::new(DreamSlash::new(tuning.dream.clone())))
}

// =============================================================================
// Global rules
// =============================================================================

/// `e` toggles the dream state; entering it needs one blink's worth of meter.
fn toggle_dream(cx: &mut PlayerCx) {
    if !cx.input.pressed(Button::EKey) {
        return;
    }
    if cx.pilot.dreaming {
        cx.pilot.dreaming = false;
        log::debug!("dream state off");
    } else if cx.pilot.can_blink() {
        cx.pilot.dreaming = true;
        log::debug!("dream state on (meter {:.0})", cx.pilot.meter);
    }
}

/// Closest active enemy (center to center) within `range`.
pub fn nearest_enemy(world: &World, from: Vec2, range: f32) -> Option<Entity> {
    world
        .active_enemies()
        .filter_map(|e| world.bodies.get(e).map(|b| (e, b.center().distance(from))))
        .filter(|&(_, d)| d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Transitions that can interrupt whatever state is current, in priority
/// order: skills, jump, roll, attack (or dream aim), fall.
fn global_transition(current: Option<StateId>, cx: &mut PlayerCx) -> Option<StateId> {
    let current = current?;
    let busy = current.is_busy();
    let grounded = cx.physics.grounded;

    if !busy && cx.input.pressed(Button::RightClick) && cx.pilot.dash_cooldown <= 0.0 {
        let range = cx.pilot.tuning.dash_strike.max_range;
        if let Some(target) = nearest_enemy(cx.world, cx.body.center(), range) {
            cx.pilot.dash_target = Some(target);
            return Some(StateId::DashStrikeAim);
        }
    }
    if !busy && grounded && cx.input.pressed(Button::Space) {
        return Some(StateId::Jump);
    }
    if !busy && grounded && cx.input.pressed(Button::Shift) {
        return Some(StateId::Roll);
    }
    if !busy && cx.input.pressed(Button::Click) {
        let blink = cx.pilot.dreaming && cx.pilot.slash_cooldown <= 0.0 && cx.pilot.can_blink();
        return Some(if blink { StateId::DreamSlashAim } else { StateId::Attack });
    }
    if !grounded
        && cx.physics.airborne_frames > cx.pilot.tuning.coyote_frames
        && cx.body.vel.y > 0.0
        && !current.ignores_fall()
    {
        return Some(StateId::Fall);
    }
    None
}

// =============================================================================
// Update
// =============================================================================

/// Run one player frame. Returns the physics report, or None if the entity
/// isn't a complete player.
pub fn update<M: TileQuery + ?Sized>(
    world: &mut World,
    map: &M,
    tuning: &PhysicsTuning,
    entity: Entity,
    frame: Frame,
    input: &InputFrame,
    time_scale: &mut f32,
) -> Option<StepReport> {
    let mut body = world.bodies.remove(entity);
    let mut phys = world.physics.remove(entity);
    let mut health = world.health.remove(entity);
    let mut collider = world.colliders.remove(entity);
    let mut player = world.players.remove(entity);

    let report = match (&mut body, &mut phys, &mut health, &mut collider, &mut player) {
        (Some(body), Some(phys), Some(health), Some(collider), Some(player)) => {
            health.tick(frame.dt);
            let Player { machine, pilot } = player;
            pilot.tick(frame.dt);

            let mut cx = PlayerCx {
                entity,
                body: &mut *body,
                physics: &mut *phys,
                health,
                collider,
                pilot,
                world: &mut *world,
                frame,
                input,
                time_scale,
            };
            if !cx.pilot.booted {
                cx.pilot.booted = true;
                machine.change(StateId::Idle, &mut cx);
            }
            toggle_dream(&mut cx);
            if let Some(next) = global_transition(machine.current(), &mut cx) {
                log::trace!("player: {:?} -> {:?}", machine.current(), next);
                machine.change(next, &mut cx);
            }
            machine.update(&mut cx, frame.dt);

            Some(physics::step(body, phys, map, tuning, frame.dt))
        }
        _ => {
            log::warn!("player {} is missing components, skipping", entity);
            None
        }
    };

    if let Some(c) = body {
        world.bodies.insert(entity, c);
    }
    if let Some(c) = phys {
        world.physics.insert(entity, c);
    }
    if let Some(c) = health {
        world.health.insert(entity, c);
    }
    if let Some(c) = collider {
        world.colliders.insert(entity, c);
    }
    if let Some(c) = player {
        world.players.insert(entity, c);
    }
    report
}

/// Force a state from outside the frame loop (scripted sequences, tests).
/// Runs the usual exit/enter pair.
pub fn force_state(
    world: &mut World,
    entity: Entity,
    state: StateId,
    frame: Frame,
    input: &InputFrame,
    time_scale: &mut f32,
) {
    let (Some(mut body), Some(mut phys), Some(mut health), Some(mut collider), Some(mut player)) = (
        world.bodies.remove(entity),
        world.physics.remove(entity),
        world.health.remove(entity),
        world.colliders.remove(entity),
        world.players.remove(entity),
    ) else {
        return;
    };
    {
        let Player { machine, pilot } = &mut player;
        pilot.booted = true;
        let mut cx = PlayerCx {
            entity,
            body: &mut body,
            physics: &mut phys,
            health: &mut health,
            collider: &mut collider,
            pilot,
            world: &mut *world,
            frame,
            input,
            time_scale,
        };
        machine.change(state, &mut cx);
    }
    world.bodies.insert(entity, body);
    world.physics.insert(entity, phys);
    world.health.insert(entity, health);
    world.colliders.insert(entity, collider);
    world.players.insert(entity, player);
}
