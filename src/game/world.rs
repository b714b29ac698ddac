//! Game World
//!
//! Owns every entity of a session and its components, plus the frame's
//! event queues. Entities keep a stable update order (spawn order), and
//! removal is always deferred: `despawn` only tombstones, `flush_despawns`
//! compacts at the end of the frame, so collision handlers can still look
//! at something that died earlier in the same pass.

use glam::Vec2;

use crate::config::{EnemyProfile, PlayerTuning};

use super::attack::{AttackHitbox, HitboxSpec, Projectile};
use super::collider::{Collider, Layer};
use super::component::ComponentStorage;
use super::components::*;
use super::enemy::{Enemy, EnemyKind};
use super::entity::{Entity, EntityAllocator};
use super::event::{DamageEvent, DeathEvent, Events, SpawnEvent};
use super::player::Player;

pub struct World {
    entities: EntityAllocator,
    /// Live entities in update order
    order: Vec<Entity>,
    /// Tombstoned this frame, removed by `flush_despawns`
    despawn_queue: Vec<Entity>,

    // =========================================================================
    // Shared components
    // =========================================================================
    pub bodies: ComponentStorage<Body>,
    pub physics: ComponentStorage<PhysicsBody>,
    pub colliders: ComponentStorage<Collider>,
    pub health: ComponentStorage<Health>,

    // =========================================================================
    // Roles
    // =========================================================================
    pub players: ComponentStorage<Player>,
    pub enemies: ComponentStorage<Enemy>,
    pub hitboxes: ComponentStorage<AttackHitbox>,
    pub projectiles: ComponentStorage<Projectile>,

    pub events: Events,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            order: Vec::new(),
            despawn_queue: Vec::new(),
            bodies: ComponentStorage::new(),
            physics: ComponentStorage::new(),
            colliders: ComponentStorage::new(),
            health: ComponentStorage::new(),
            players: ComponentStorage::new(),
            enemies: ComponentStorage::new(),
            hitboxes: ComponentStorage::new(),
            projectiles: ComponentStorage::new(),
            events: Events::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// New entity with just a body. It joins the end of the update order.
    pub fn spawn(&mut self, pos: Vec2, size: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.bodies.insert(entity, Body::new(pos, size));
        self.order.push(entity);
        self.events.spawn.send(SpawnEvent { entity, position: pos });
        entity
    }

    /// Tombstone an entity. It keeps existing (and stays queryable) until
    /// the end-of-frame flush.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.is_despawning(entity) {
            log::trace!("despawn {}", entity);
            self.despawn_queue.push(entity);
        }
    }

    pub fn is_despawning(&self, entity: Entity) -> bool {
        self.despawn_queue.contains(&entity)
    }

    /// Handle still refers to a live slot (tombstoned or not).
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Alive and not tombstoned.
    pub fn is_active(&self, entity: Entity) -> bool {
        self.is_alive(entity) && !self.is_despawning(entity)
    }

    /// Remove every tombstoned entity and its components.
    pub fn flush_despawns(&mut self) {
        if self.despawn_queue.is_empty() {
            return;
        }
        let queue = std::mem::take(&mut self.despawn_queue);
        for &entity in &queue {
            if !self.entities.free(entity) {
                continue;
            }
            let idx = entity.index();
            self.bodies.clear_slot(idx);
            self.physics.clear_slot(idx);
            self.colliders.clear_slot(idx);
            self.health.clear_slot(idx);
            self.players.clear_slot(idx);
            self.enemies.clear_slot(idx);
            self.hitboxes.clear_slot(idx);
            self.projectiles.clear_slot(idx);
        }
        self.order.retain(|e| !queue.contains(e));
    }

    /// Live entities in update order, tombstoned ones included.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// First active player, if any.
    pub fn player(&self) -> Option<Entity> {
        self.order
            .iter()
            .copied()
            .find(|&e| self.players.contains(e) && !self.is_despawning(e))
    }

    /// Active enemies in update order.
    pub fn active_enemies(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|&e| self.enemies.contains(e) && !self.is_despawning(e))
    }

    // =========================================================================
    // Combat
    // =========================================================================

    /// Apply damage through the target's `Health`, reporting the result as
    /// events. A killing blow tombstones the target.
    pub fn damage(&mut self, target: Entity, amount: i32, source: Option<Entity>) -> DamageOutcome {
        if !self.is_active(target) {
            return DamageOutcome::Ignored;
        }
        let Some(health) = self.health.get_mut(target) else {
            return DamageOutcome::Ignored;
        };
        let outcome = health.take_damage(amount);
        let position = self
            .bodies
            .get(target)
            .map(Body::center)
            .unwrap_or(Vec2::ZERO);

        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt => {
                self.events.damage.send(DamageEvent { target, source, amount, position });
            }
            DamageOutcome::Killed => {
                self.events.damage.send(DamageEvent { target, source, amount, position });
                self.events.death.send(DeathEvent { entity: target, killer: source, position });
                log::debug!("{} killed by {:?}", target, source);
                self.despawn(target);
            }
        }
        outcome
    }

    // =========================================================================
    // Convenience Spawners
    // =========================================================================

    pub fn spawn_player(&mut self, pos: Vec2, tuning: &PlayerTuning) -> Entity {
        let size = Vec2::new(tuning.width, tuning.height);
        let entity = self.spawn(pos, size);
        self.physics.insert(entity, PhysicsBody::default());
        self.colliders.insert(entity, Collider::solid(size, Layer::Player));
        self.health
            .insert(entity, Health::new(tuning.health).with_cooldown(tuning.damage_cooldown));
        self.players.insert(entity, Player::new(tuning.clone()));
        entity
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, kind: EnemyKind, profile: &EnemyProfile) -> Entity {
        let size = Vec2::new(profile.width, profile.height);
        let entity = self.spawn(pos, size);
        self.physics.insert(entity, PhysicsBody::default());
        self.colliders.insert(entity, Collider::solid(size, Layer::Enemy));
        self.health.insert(entity, Health::new(profile.health));
        self.enemies.insert(entity, Enemy::new(kind, profile.clone()));
        entity
    }

    /// Hitbox placed from `owner_body`. The owner's own components may be
    /// checked out while it attacks, so its body is passed in.
    pub fn spawn_hitbox(&mut self, spec: &HitboxSpec, owner_body: &Body) -> Entity {
        let pos = spec.anchor.place(owner_body, spec.size);
        let entity = self.spawn(pos, spec.size);
        if let Some(body) = self.bodies.get_mut(entity) {
            body.facing = owner_body.facing;
        }
        self.colliders.insert(entity, Collider::trigger(spec.size, spec.layer));
        self.hitboxes.insert(entity, AttackHitbox::new(spec, owner_body.pos));
        entity
    }

    /// Round projectile (square collider of side `2 * radius`) centered on
    /// `center`.
    pub fn spawn_projectile(
        &mut self,
        owner: Entity,
        center: Vec2,
        radius: f32,
        vel: Vec2,
        damage: i32,
        life: Option<f32>,
    ) -> Entity {
        let size = Vec2::splat(radius * 2.0);
        let entity = self.spawn(center - Vec2::splat(radius), size);
        if let Some(body) = self.bodies.get_mut(entity) {
            body.vel = vel;
        }
        self.colliders.insert(entity, Collider::trigger(size, Layer::EnemyProjectile));
        self.projectiles.insert(entity, Projectile::new(owner, damage, life));
        entity
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;

    #[test]
    fn test_despawn_is_deferred() {
        let mut world = World::new();
        let a = world.spawn(Vec2::ZERO, Vec2::ONE);
        let b = world.spawn(Vec2::ZERO, Vec2::ONE);
        world.despawn(a);
        world.despawn(a);

        assert!(world.is_alive(a));
        assert!(!world.is_active(a));
        assert!(world.bodies.contains(a));
        assert_eq!(world.entities(), &[a, b]);

        world.flush_despawns();
        assert!(!world.is_alive(a));
        assert!(!world.bodies.contains(a));
        assert_eq!(world.entities(), &[b]);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_spawn_order_is_update_order() {
        let mut world = World::new();
        let ids: Vec<_> = (0..4).map(|i| world.spawn(Vec2::splat(i as f32), Vec2::ONE)).collect();
        world.despawn(ids[1]);
        world.flush_despawns();
        let late = world.spawn(Vec2::ZERO, Vec2::ONE);
        assert_eq!(world.entities(), &[ids[0], ids[2], ids[3], late]);
        assert_eq!(world.events.spawn.len(), 5);
    }

    #[test]
    fn test_killing_blow_tombstones_and_reports() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let enemy = world.spawn_enemy(Vec2::ZERO, EnemyKind::Scientist, &tuning.enemies.scientist);

        assert_eq!(world.damage(enemy, 25, None), DamageOutcome::Hurt);
        assert_eq!(world.health.get(enemy).unwrap().current, 15);
        assert_eq!(world.damage(enemy, 25, None), DamageOutcome::Killed);
        assert!(world.is_despawning(enemy));
        assert_eq!(world.damage(enemy, 25, None), DamageOutcome::Ignored);
        assert_eq!(world.events.damage.len(), 2);
        assert_eq!(world.events.death.len(), 1);
    }

    #[test]
    fn test_player_lookup() {
        let tuning = Tuning::default();
        let mut world = World::new();
        assert_eq!(world.player(), None);
        let p = world.spawn_player(Vec2::new(10.0, 10.0), &tuning.player);
        assert_eq!(world.player(), Some(p));
        assert_eq!(world.colliders.get(p).unwrap().layer, Layer::Player);
        world.despawn(p);
        assert_eq!(world.player(), None);
    }
}
