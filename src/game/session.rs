//! Gameplay session
//!
//! One level being played: the world, its tile map, the collision rules
//! and the clock. `tick` runs a whole frame in a fixed order:
//!
//! 1. every live entity updates in spawn order (entities spawned during
//!    the pass still update this frame)
//! 2. one collision pass
//! 3. the frame's events are drained into a [`FrameReport`]
//! 4. tombstoned entities are removed

use glam::Vec2;

use crate::clock::{Clock, Frame};
use crate::config::Tuning;
use crate::input::{InputFrame, InputState};
use crate::map::{LevelData, TileGrid};

use super::attack;
use super::collision::CollisionManager;
use super::components::{Body, Health};
use super::enemy;
use super::entity::Entity;
use super::event::{CollisionEvent, DamageEvent, DeathEvent, SpawnEvent};
use super::player::{self, Pilot, StateId};
use super::rules;
use super::world::World;

/// What happened during one `tick`.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub frame: Option<Frame>,
    /// Overlapping pairs the collision pass found
    pub contacts: usize,
    pub damage: Vec<DamageEvent>,
    pub deaths: Vec<DeathEvent>,
    pub spawns: Vec<SpawnEvent>,
    pub collisions: Vec<CollisionEvent>,
    /// The player is gone (dead, or never spawned)
    pub player_dead: bool,
    pub enemies_left: usize,
}

pub struct Session {
    pub world: World,
    pub map: TileGrid,
    pub tuning: Tuning,
    pub clock: Clock,
    collisions: CollisionManager,
    input: InputFrame,
    player: Entity,
    frames: u64,
}

impl Session {
    /// Build a fresh world for `level`.
    pub fn new(level: &LevelData, tuning: Tuning) -> Self {
        let map = level.grid();
        let mut world = World::new();

        let (px, py) = level.player_spawn;
        let player = world.spawn_player(Vec2::new(px, py), &tuning.player);
        for spawn in &level.enemies {
            let profile = tuning.enemies.profile(spawn.kind);
            world.spawn_enemy(Vec2::new(spawn.x, spawn.y), spawn.kind, profile);
        }
        world.events.clear_all();

        log::info!(
            "session started: '{}' ({}x{} tiles, {} enemies)",
            level.name,
            map.width(),
            map.height(),
            level.enemies.len()
        );

        Self {
            world,
            map,
            tuning,
            clock: Clock::new(),
            collisions: rules::collision_manager(),
            input: InputFrame::default(),
            player,
            frames: 0,
        }
    }

    /// Advance one frame of `raw_dt` real seconds.
    pub fn tick(&mut self, raw_dt: f32, input: InputState) -> FrameReport {
        self.input.advance(input);
        let frame = self.clock.frame(raw_dt);
        self.frames += 1;

        // Index loop: the list may grow while we walk it.
        let mut i = 0;
        while i < self.world.entities().len() {
            let entity = self.world.entities()[i];
            i += 1;
            if self.world.is_despawning(entity) {
                continue;
            }
            self.update_entity(entity, frame);
        }

        let contacts = self.collisions.check_all(&mut self.world).len();

        let events = &mut self.world.events;
        let report = FrameReport {
            frame: Some(frame),
            contacts,
            damage: events.damage.drain().collect(),
            deaths: events.death.drain().collect(),
            spawns: events.spawn.drain().collect(),
            collisions: events.collision.drain().collect(),
            player_dead: !self.world.is_active(self.player),
            enemies_left: self.world.active_enemies().count(),
        };
        for death in &report.deaths {
            log::info!("{} died at ({:.0}, {:.0})", death.entity, death.position.x, death.position.y);
        }

        self.world.flush_despawns();
        report
    }

    fn update_entity(&mut self, entity: Entity, frame: Frame) {
        let world = &mut self.world;
        if world.players.contains(entity) {
            player::update(
                world,
                &self.map,
                &self.tuning.physics,
                entity,
                frame,
                &self.input,
                &mut self.clock.time_scale,
            );
        } else if world.enemies.contains(entity) {
            enemy::update(world, &self.map, &self.tuning.physics, entity, frame.dt);
        } else if world.hitboxes.contains(entity) {
            attack::update_hitbox(world, entity, frame.dt);
        } else if world.projectiles.contains(entity) {
            attack::update_projectile(world, &self.map, entity, frame.dt);
        }
    }

    // =========================================================================
    // Queries for the host
    // =========================================================================

    pub fn player(&self) -> Entity {
        self.player
    }

    /// The player handle while it still refers to the player. Storage is
    /// indexed by slot, so a dead player's slot may hold someone else.
    fn live_player(&self) -> Option<Entity> {
        self.world.is_alive(self.player).then_some(self.player)
    }

    pub fn player_body(&self) -> Option<&Body> {
        self.live_player().and_then(|p| self.world.bodies.get(p))
    }

    pub fn player_health(&self) -> Option<&Health> {
        self.live_player().and_then(|p| self.world.health.get(p))
    }

    pub fn pilot(&self) -> Option<&Pilot> {
        self.live_player().and_then(|p| self.world.players.get(p)).map(|p| &p.pilot)
    }

    pub fn player_state(&self) -> Option<StateId> {
        self.live_player().and_then(|p| self.world.players.get(p)).and_then(|p| p.state())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyProfile;
    use crate::game::enemy::EnemyKind;
    use crate::input::Button;
    use crate::map::EnemySpawn;

    const DT: f32 = 1.0 / 60.0;

    fn arena(enemies: Vec<EnemySpawn>) -> LevelData {
        let mut rows = vec!["....................".to_string(); 7];
        rows.push("#".repeat(20));
        LevelData {
            name: "arena".into(),
            tile_width: 32.0,
            tile_height: 32.0,
            rows,
            player_spawn: (64.0, 176.0),
            enemies,
        }
    }

    fn brute(x: f32) -> EnemySpawn {
        EnemySpawn { x, y: 192.0, kind: EnemyKind::Brute }
    }

    fn held(buttons: &[Button]) -> InputState {
        buttons.iter().fold(InputState::default(), |s, &b| s.with(b))
    }

    #[test]
    fn test_demo_level_settles() {
        let mut session = Session::new(&LevelData::demo(), Tuning::default());
        let mut report = FrameReport::default();
        for _ in 0..30 {
            report = session.tick(DT, InputState::default());
        }
        assert_eq!(session.player_state(), Some(StateId::Idle));
        assert_eq!(session.player_body().unwrap().feet(), 448.0);
        assert!(!report.player_dead);
        assert_eq!(report.enemies_left, 4);
    }

    #[test]
    fn test_aim_slows_the_world_but_not_the_bar() {
        let mut session = Session::new(&arena(vec![brute(248.0)]), Tuning::default());
        session.tick(DT, InputState::default());

        let report = session.tick(DT, held(&[Button::RightClick]));
        assert_eq!(report.frame.unwrap().dt, DT);
        assert_eq!(session.clock.time_scale, 0.5);
        for _ in 0..29 {
            let report = session.tick(DT, held(&[Button::RightClick]));
            assert!((report.frame.unwrap().dt - DT * 0.5).abs() < 1e-7);
        }
        let progress = session.pilot().unwrap().aim_progress;
        assert!((progress - 30.0 * DT * 0.67).abs() < 1e-4, "{}", progress);

        session.tick(DT, InputState::default());
        assert_eq!(session.clock.time_scale, 1.0);
    }

    #[test]
    fn test_two_swings_kill_a_brute() {
        let mut session = Session::new(&arena(vec![brute(200.0)]), Tuning::default());
        let enemy = session.world.active_enemies().next().unwrap();
        session.tick(DT, InputState::default());

        let report = session.tick(DT, held(&[Button::Click]));
        assert_eq!(session.player_state(), Some(StateId::Attack));
        let hits: Vec<_> = report.damage.iter().filter(|d| d.target == enemy).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(session.world.health.get(enemy).unwrap().current, 25);
        assert_eq!(session.pilot().unwrap().meter, 10.0);

        for _ in 0..25 {
            let report = session.tick(DT, InputState::default());
            assert!(report.damage.iter().all(|d| d.target != enemy), "swing landed twice");
        }

        let report = session.tick(DT, held(&[Button::Click]));
        assert_eq!(report.deaths.len(), 1);
        assert_eq!(report.deaths[0].entity, enemy);
        assert_eq!(report.enemies_left, 0);
        assert!(!session.world.is_alive(enemy));
    }

    #[test]
    fn test_player_death_is_reported() {
        let mut session = Session::new(&arena(vec![]), Tuning::default());
        let player = session.player();
        session.world.damage(player, 1000, None);
        let report = session.tick(DT, InputState::default());
        assert!(report.player_dead);
        assert!(session.player_body().is_none());
    }

    #[test]
    fn test_dead_player_slot_reuse_is_not_the_player() {
        let mut session = Session::new(&arena(vec![]), Tuning::default());
        let player = session.player();
        session.world.damage(player, 1000, None);
        session.tick(DT, InputState::default());

        let newcomer = session.world.spawn_enemy(Vec2::new(300.0, 192.0), EnemyKind::Brute, &EnemyProfile::brute());
        assert_eq!(newcomer.index(), player.index(), "slot reused");
        assert!(session.player_body().is_none());
        assert!(session.player_health().is_none());
        assert!(session.pilot().is_none());
        assert!(session.player_state().is_none());
    }

    #[test]
    fn test_dash_strike_damages_its_target_once() {
        let mut session = Session::new(&arena(vec![brute(248.0)]), Tuning::default());
        let enemy = session.world.active_enemies().next().unwrap();
        session.tick(DT, InputState::default());

        let mut hits = Vec::new();
        let mut collect = |report: FrameReport| {
            hits.extend(report.damage.into_iter().filter(|d| d.target == enemy));
        };
        for _ in 0..66 {
            collect(session.tick(DT, held(&[Button::RightClick])));
        }
        collect(session.tick(DT, InputState::default()));
        assert_eq!(session.player_state(), Some(StateId::DashStrike));

        for _ in 0..40 {
            if session.player_state() != Some(StateId::DashStrike) {
                break;
            }
            collect(session.tick(DT, InputState::default()));
        }
        assert_eq!(session.player_state(), Some(StateId::Idle));
        for _ in 0..10 {
            collect(session.tick(DT, InputState::default()));
        }

        assert_eq!(hits.len(), 1, "{:?}", hits);
        assert_eq!(hits[0].amount, 30);
        assert_eq!(session.world.health.get(enemy).unwrap().current, 20);
    }

    #[test]
    fn test_spawns_update_in_the_same_frame() {
        // A scientist in range fires on its first frame; the shot moves
        // before the frame ends.
        let spawn = EnemySpawn { x: 250.0, y: 192.0, kind: EnemyKind::Scientist };
        let mut session = Session::new(&arena(vec![spawn]), Tuning::default());
        let report = session.tick(DT, InputState::default());

        let shot = report.spawns.iter().find(|s| session.world.projectiles.contains(s.entity)).unwrap();
        let body = session.world.bodies.get(shot.entity).unwrap();
        assert!(body.pos != shot.position);
    }
}
