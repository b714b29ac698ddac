//! Enemy AI
//!
//! One brain for every kind: the kind only selects an [`EnemyProfile`]
//! (speeds, ranges, attack shape). Each frame the brain looks at the
//! player, picks `Idle`, `Chase` or `Attack`, and the shared tile physics
//! moves the body.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{EnemyAttack, EnemyProfile, PhysicsTuning};
use crate::map::TileQuery;

use super::attack::{Anchor, HitboxSpec};
use super::collider::Layer;
use super::components::{Body, Facing};
use super::entity::Entity;
use super::physics;
use super::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Plain melee bruiser
    Brute,
    /// Slower, tougher melee
    Grunt,
    /// Slow walker that lobs projectiles
    Scientist,
    /// Stationary rifle turret
    Gangster,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Brute,
        EnemyKind::Grunt,
        EnemyKind::Scientist,
        EnemyKind::Gangster,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Brute => "Brute",
            EnemyKind::Grunt => "Grunt",
            EnemyKind::Scientist => "Scientist",
            EnemyKind::Gangster => "Gangster",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub profile: EnemyProfile,
    pub ai: AiState,
    /// Seconds until the next attack is allowed
    pub attack_timer: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, profile: EnemyProfile) -> Self {
        Self { kind, profile, ai: AiState::Idle, attack_timer: 0.0 }
    }

    /// Body contact damage dealt to the player.
    pub fn contact_damage(&self) -> i32 {
        self.profile.contact_damage
    }
}

/// What the enemy knows about the player this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sight {
    /// Player center minus enemy center
    pub delta: Vec2,
    pub player_on_slope: bool,
    pub self_on_slope: bool,
}

impl Sight {
    /// Same floor, in range, and (for turrets) a level line of fire.
    pub fn can_engage(&self, profile: &EnemyProfile) -> bool {
        if let Some(tolerance) = profile.turret_aim_tolerance {
            if self.player_on_slope || self.delta.y.abs() > tolerance {
                return false;
            }
        }
        let window = if self.player_on_slope || self.self_on_slope {
            profile.stair_vertical_awareness
        } else {
            profile.vertical_awareness
        };
        self.delta.y.abs() <= window
    }
}

/// Pick the AI state for this frame. No player in sight means idle.
pub fn decide(profile: &EnemyProfile, sight: Option<&Sight>) -> AiState {
    let Some(sight) = sight else {
        return AiState::Idle;
    };
    let distance = sight.delta.x.abs();
    if !sight.can_engage(profile) || distance > profile.aggro_range {
        AiState::Idle
    } else if distance <= profile.attack_range {
        AiState::Attack
    } else {
        AiState::Chase
    }
}

fn look_for_player(world: &World, body: &Body, self_on_slope: bool) -> Option<Sight> {
    let player = world.player()?;
    let player_body = world.bodies.get(player)?;
    let player_on_slope = world.physics.get(player).is_some_and(|p| p.on_slope);
    Some(Sight {
        delta: player_body.center() - body.center(),
        player_on_slope,
        self_on_slope,
    })
}

/// Think, attack if ready, then move through the tile physics.
pub fn update<M: TileQuery + ?Sized>(
    world: &mut World,
    map: &M,
    tuning: &PhysicsTuning,
    entity: Entity,
    dt: f32,
) {
    let (Some(mut body), Some(mut phys), Some(mut enemy)) = (
        world.bodies.remove(entity),
        world.physics.remove(entity),
        world.enemies.remove(entity),
    ) else {
        log::warn!("enemy {} is missing components, skipping", entity);
        return;
    };

    think(world, entity, &mut body, phys.on_slope, &mut enemy, dt);
    physics::step(&mut body, &mut phys, map, tuning, dt);

    let (_, world_h) = map.world_size();
    if body.pos.y > world_h {
        log::debug!("{} {} fell out of the world", enemy.kind.name(), entity);
        world.despawn(entity);
    }

    world.bodies.insert(entity, body);
    world.physics.insert(entity, phys);
    world.enemies.insert(entity, enemy);
}

fn think(world: &mut World, entity: Entity, body: &mut Body, on_slope: bool, enemy: &mut Enemy, dt: f32) {
    // Ticks in every state, so a cooldown started in Attack keeps running
    // while the enemy chases or idles.
    enemy.attack_timer = (enemy.attack_timer - dt).max(0.0);

    if world.health.get(entity).is_some_and(|h| h.is_dead()) {
        enemy.ai = AiState::Dead;
        body.vel.x = 0.0;
        world.despawn(entity);
        return;
    }

    let sight = look_for_player(world, body, on_slope);
    let next = decide(&enemy.profile, sight.as_ref());
    if next != enemy.ai {
        log::trace!("{} {}: {:?} -> {:?}", enemy.kind.name(), entity, enemy.ai, next);
        enemy.ai = next;
    }

    match enemy.ai {
        AiState::Idle | AiState::Dead => body.vel.x = 0.0,
        AiState::Chase => {
            let dir = sight.map_or(0.0, |s| s.delta.x.signum());
            body.vel.x = dir * enemy.profile.speed;
            body.face_towards(dir);
        }
        AiState::Attack => {
            body.vel.x = 0.0;
            if let Some(s) = sight {
                body.face_towards(s.delta.x);
                if enemy.attack_timer <= 0.0 {
                    perform_attack(world, entity, body, enemy, body.center() + s.delta);
                }
            }
        }
    }
}

/// Spawn this kind's attack aimed at `target` (player center) and restart
/// the cooldown.
pub fn perform_attack(world: &mut World, entity: Entity, body: &Body, enemy: &mut Enemy, target: Vec2) {
    enemy.attack_timer = enemy.profile.attack_cooldown;
    match enemy.profile.attack {
        EnemyAttack::Melee { damage, knockback, width, height, life } => {
            let spec = HitboxSpec {
                owner: entity,
                layer: Layer::EnemyAttack,
                size: Vec2::new(width, height),
                damage,
                knockback,
                life: Some(life),
                anchor: Anchor::Ahead { y: (body.size.y - height) * 0.5 },
                follow: true,
            };
            world.spawn_hitbox(&spec, body);
        }
        EnemyAttack::Ranged { damage, radius, speed, life, spawn_y_offset } => {
            let muzzle = Vec2::new(
                match body.facing {
                    Facing::Left => body.pos.x + 6.0,
                    Facing::Right => body.pos.x + body.size.x - 6.0,
                },
                body.pos.y + body.size.y * 0.45 + spawn_y_offset,
            );
            let to_target = target - muzzle;
            let dir = if to_target.length_squared() > 0.0 {
                to_target.normalize()
            } else {
                Vec2::new(body.facing.sign(), 0.0)
            };
            world.spawn_projectile(entity, muzzle, radius, dir * speed, damage, life);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::map::TileGrid;

    fn sight(dx: f32, dy: f32) -> Sight {
        Sight { delta: Vec2::new(dx, dy), player_on_slope: false, self_on_slope: false }
    }

    fn flat_map() -> TileGrid {
        let mut rows = vec!["........................................".to_string(); 10];
        rows.push("#".repeat(40));
        TileGrid::from_rows(&rows, 32.0, 32.0)
    }

    #[test]
    fn test_decide_ranges() {
        let brute = EnemyProfile::brute();
        assert_eq!(decide(&brute, None), AiState::Idle);
        assert_eq!(decide(&brute, Some(&sight(500.0, 0.0))), AiState::Idle);
        assert_eq!(decide(&brute, Some(&sight(-200.0, 10.0))), AiState::Chase);
        assert_eq!(decide(&brute, Some(&sight(30.0, 0.0))), AiState::Attack);
    }

    #[test]
    fn test_same_floor_window_widens_on_slopes() {
        let brute = EnemyProfile::brute();
        let mut s = sight(100.0, 100.0);
        assert_eq!(decide(&brute, Some(&s)), AiState::Idle);
        s.player_on_slope = true;
        assert_eq!(decide(&brute, Some(&s)), AiState::Chase);
        s.player_on_slope = false;
        s.self_on_slope = true;
        assert_eq!(decide(&brute, Some(&s)), AiState::Chase);
    }

    #[test]
    fn test_turret_needs_level_shot() {
        let gangster = EnemyProfile::gangster();
        assert_eq!(decide(&gangster, Some(&sight(600.0, 40.0))), AiState::Attack);
        assert_eq!(decide(&gangster, Some(&sight(600.0, 80.0))), AiState::Idle);

        let mut on_stairs = sight(100.0, 0.0);
        on_stairs.player_on_slope = true;
        assert_eq!(decide(&gangster, Some(&on_stairs)), AiState::Idle);
    }

    #[test]
    fn test_no_player_means_idle_and_physics_only() {
        let tuning = Tuning::default();
        let map = flat_map();
        let mut world = World::new();
        let e = world.spawn_enemy(Vec2::new(100.0, 100.0), EnemyKind::Brute, &tuning.enemies.brute);
        for _ in 0..60 {
            update(&mut world, &map, &tuning.physics, e, 1.0 / 60.0);
        }
        assert_eq!(world.enemies.get(e).unwrap().ai, AiState::Idle);
        assert!(world.physics.get(e).unwrap().grounded);
        assert_eq!(world.bodies.get(e).unwrap().feet(), 320.0);
    }

    #[test]
    fn test_chase_moves_toward_player() {
        let tuning = Tuning::default();
        let map = flat_map();
        let mut world = World::new();
        world.spawn_player(Vec2::new(600.0, 272.0), &tuning.player);
        let e = world.spawn_enemy(Vec2::new(300.0, 288.0), EnemyKind::Grunt, &tuning.enemies.grunt);
        world.physics.get_mut(e).unwrap().grounded = true;

        update(&mut world, &map, &tuning.physics, e, 0.1);
        let enemy = world.enemies.get(e).unwrap();
        let body = world.bodies.get(e).unwrap();
        assert_eq!(enemy.ai, AiState::Chase);
        assert!(body.pos.x > 300.0);
        assert_eq!(body.facing, Facing::Right);
    }

    #[test]
    fn test_melee_attack_spawns_hitbox_and_cools_down() {
        let tuning = Tuning::default();
        let map = flat_map();
        let mut world = World::new();
        world.spawn_player(Vec2::new(130.0, 272.0), &tuning.player);
        let e = world.spawn_enemy(Vec2::new(100.0, 288.0), EnemyKind::Brute, &tuning.enemies.brute);

        update(&mut world, &map, &tuning.physics, e, 0.016);
        assert_eq!(world.enemies.get(e).unwrap().ai, AiState::Attack);
        assert_eq!(world.hitboxes.count(), 1);
        let (_, hb) = world.hitboxes.iter().next().unwrap();
        assert_eq!(hb.owner, e);

        // Cooldown blocks a second swing right away...
        update(&mut world, &map, &tuning.physics, e, 0.016);
        assert_eq!(world.hitboxes.count(), 1);
        // ...and keeps ticking while the player is out of reach.
        let player = world.player().unwrap();
        world.bodies.get_mut(player).unwrap().pos.x = 5000.0;
        update(&mut world, &map, &tuning.physics, e, 0.5);
        assert_eq!(world.enemies.get(e).unwrap().ai, AiState::Idle);
        assert!(world.enemies.get(e).unwrap().attack_timer < 0.5);
    }

    #[test]
    fn test_ranged_attack_aims_at_player_center() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let player = world.spawn_player(Vec2::new(300.0, 200.0), &tuning.player);
        let e = world.spawn_enemy(Vec2::new(100.0, 220.0), EnemyKind::Scientist, &tuning.enemies.scientist);
        let body = *world.bodies.get(e).unwrap();
        let mut enemy = world.enemies.remove(e).unwrap();
        let target = world.bodies.get(player).unwrap().center();

        perform_attack(&mut world, e, &body, &mut enemy, target);
        assert_eq!(enemy.attack_timer, 2.0);

        let (idx, projectile) = world.projectiles.iter().next().unwrap();
        assert_eq!(projectile.damage, 5);
        let p = *world.entities().iter().find(|e| e.index() == idx).unwrap();
        let pb = world.bodies.get(p).unwrap();
        let muzzle = Vec2::new(100.0 + 32.0 - 6.0, 220.0 + 32.0 * 0.45);
        assert!((pb.center() - muzzle).length() < 1e-3);
        let expected = (target - muzzle).normalize() * 360.0;
        assert!((pb.vel - expected).length() < 1e-2);
    }

    #[test]
    fn test_falling_out_of_world_tombstones() {
        let tuning = Tuning::default();
        let map = TileGrid::new(4, 4, 32.0, 32.0);
        let mut world = World::new();
        let e = world.spawn_enemy(Vec2::new(40.0, 200.0), EnemyKind::Grunt, &tuning.enemies.grunt);
        update(&mut world, &map, &tuning.physics, e, 0.016);
        assert!(world.is_despawning(e));
    }
}
