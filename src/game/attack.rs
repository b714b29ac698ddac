//! Transient damage dealers: attack hitboxes and projectiles
//!
//! Both remember every entity they've already damaged, so a hitbox that
//! lingers over a target for several frames still only lands once.

use std::collections::HashSet;

use glam::Vec2;

use crate::map::TileQuery;

use super::collider::Layer;
use super::components::{Body, Facing};
use super::entity::Entity;
use super::world::World;

/// Where a hitbox sits relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Beside the owner on its facing side, `y` below the owner's top
    Ahead { y: f32 },
    /// Fixed offset from the owner's top-left
    Offset(Vec2),
}

impl Anchor {
    pub fn place(&self, owner: &Body, size: Vec2) -> Vec2 {
        match *self {
            Anchor::Ahead { y } => {
                let x = match owner.facing {
                    Facing::Left => owner.pos.x - size.x,
                    Facing::Right => owner.pos.x + owner.size.x,
                };
                Vec2::new(x, owner.pos.y + y)
            }
            Anchor::Offset(offset) => owner.pos + offset,
        }
    }
}

/// Everything needed to put a hitbox into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxSpec {
    pub owner: Entity,
    pub layer: Layer,
    pub size: Vec2,
    pub damage: i32,
    pub knockback: f32,
    /// Seconds until it expires on its own; None = until despawned
    pub life: Option<f32>,
    pub anchor: Anchor,
    /// Track the owner every frame, or stay where it spawned
    pub follow: bool,
}

#[derive(Debug, Clone)]
pub struct AttackHitbox {
    pub owner: Entity,
    pub damage: i32,
    pub knockback: f32,
    pub life: Option<f32>,
    pub anchor: Anchor,
    pub follow: bool,
    /// Owner's top-left as of the last update, for knockback direction
    /// after the owner is gone
    pub owner_pos: Vec2,
    hit: HashSet<Entity>,
}

impl AttackHitbox {
    pub fn new(spec: &HitboxSpec, owner_pos: Vec2) -> Self {
        Self {
            owner: spec.owner,
            damage: spec.damage,
            knockback: spec.knockback,
            life: spec.life,
            anchor: spec.anchor,
            follow: spec.follow,
            owner_pos,
            hit: HashSet::new(),
        }
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit.contains(&target)
    }

    /// Record a hit. False if `target` was already hit by this instance.
    pub fn mark_hit(&mut self, target: Entity) -> bool {
        self.hit.insert(target)
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: Entity,
    pub damage: i32,
    pub life: Option<f32>,
    hit: HashSet<Entity>,
}

impl Projectile {
    pub fn new(owner: Entity, damage: i32, life: Option<f32>) -> Self {
        Self { owner, damage, life, hit: HashSet::new() }
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit.contains(&target)
    }

    pub fn mark_hit(&mut self, target: Entity) -> bool {
        self.hit.insert(target)
    }
}

/// Count down a lifetime. True once it has run out.
fn expire(life: &mut Option<f32>, dt: f32) -> bool {
    match life {
        Some(t) => {
            *t -= dt;
            *t <= 0.0
        }
        None => false,
    }
}

// =============================================================================
// Per-frame updates
// =============================================================================

/// Follow the owner and count down. Hitboxes die with their owner.
pub fn update_hitbox(world: &mut World, entity: Entity, dt: f32) {
    let owner_body = {
        let Some(hitbox) = world.hitboxes.get(entity) else {
            return;
        };
        if world.is_active(hitbox.owner) {
            world.bodies.get(hitbox.owner).copied()
        } else {
            None
        }
    };
    let Some(owner_body) = owner_body else {
        world.despawn(entity);
        return;
    };

    let Some(hitbox) = world.hitboxes.get_mut(entity) else {
        return;
    };
    if expire(&mut hitbox.life, dt) {
        world.despawn(entity);
        return;
    }
    hitbox.owner_pos = owner_body.pos;
    if hitbox.follow {
        let anchor = hitbox.anchor;
        if let Some(body) = world.bodies.get_mut(entity) {
            body.pos = anchor.place(&owner_body, body.size);
            body.facing = owner_body.facing;
        }
    }
}

/// Fly in a straight line; gone on solid tiles, outside the map, or when
/// the lifetime runs out.
pub fn update_projectile<M: TileQuery + ?Sized>(world: &mut World, map: &M, entity: Entity, dt: f32) {
    let Some(projectile) = world.projectiles.get_mut(entity) else {
        return;
    };
    let expired = expire(&mut projectile.life, dt);
    let Some(body) = world.bodies.get_mut(entity) else {
        return;
    };
    body.pos += body.vel * dt;
    let center = body.center();
    let (w, h) = map.world_size();
    let outside = center.x < 0.0 || center.y < 0.0 || center.x >= w || center.y >= h;

    if expired || outside || map.is_solid_at_world(center.x, center.y) {
        world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileGrid;

    fn owner(world: &mut World) -> Entity {
        world.spawn(Vec2::new(100.0, 100.0), Vec2::new(32.0, 48.0))
    }

    fn spec(owner: Entity) -> HitboxSpec {
        HitboxSpec {
            owner,
            layer: Layer::PlayerAttack,
            size: Vec2::new(40.0, 20.0),
            damage: 10,
            knockback: 50.0,
            life: Some(0.2),
            anchor: Anchor::Ahead { y: 4.0 },
            follow: true,
        }
    }

    #[test]
    fn test_anchor_ahead_respects_facing() {
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::new(32.0, 48.0));
        let size = Vec2::new(40.0, 20.0);
        let anchor = Anchor::Ahead { y: 4.0 };
        assert_eq!(anchor.place(&body, size), Vec2::new(132.0, 104.0));
        body.facing = Facing::Left;
        assert_eq!(anchor.place(&body, size), Vec2::new(60.0, 104.0));
        assert_eq!(Anchor::Offset(Vec2::new(-5.0, 2.0)).place(&body, size), Vec2::new(95.0, 102.0));
    }

    #[test]
    fn test_mark_hit_once() {
        let mut world = World::new();
        let o = owner(&mut world);
        let mut hitbox = AttackHitbox::new(&spec(o), Vec2::ZERO);
        let target = world.spawn(Vec2::ZERO, Vec2::ONE);
        assert!(!hitbox.has_hit(target));
        assert!(hitbox.mark_hit(target));
        assert!(!hitbox.mark_hit(target));
        assert!(hitbox.has_hit(target));
    }

    #[test]
    fn test_hitbox_follows_owner_then_expires() {
        let mut world = World::new();
        let o = owner(&mut world);
        let body = *world.bodies.get(o).unwrap();
        let hb = world.spawn_hitbox(&spec(o), &body);

        world.bodies.get_mut(o).unwrap().pos.x += 10.0;
        update_hitbox(&mut world, hb, 0.1);
        assert_eq!(world.bodies.get(hb).unwrap().pos, Vec2::new(142.0, 104.0));
        assert!(!world.is_despawning(hb));

        update_hitbox(&mut world, hb, 0.11);
        assert!(world.is_despawning(hb));
    }

    #[test]
    fn test_hitbox_dies_with_owner() {
        let mut world = World::new();
        let o = owner(&mut world);
        let body = *world.bodies.get(o).unwrap();
        let hb = world.spawn_hitbox(&spec(o), &body);
        world.despawn(o);
        update_hitbox(&mut world, hb, 0.01);
        assert!(world.is_despawning(hb));
    }

    #[test]
    fn test_projectile_stops_at_wall() {
        let map = TileGrid::from_rows(&["....#", "....#", "....."], 32.0, 32.0);
        let mut world = World::new();
        let o = owner(&mut world);
        let p = world.spawn_projectile(o, Vec2::new(100.0, 40.0), 3.0, Vec2::new(600.0, 0.0), 5, None);

        update_projectile(&mut world, &map, p, 0.01);
        assert!(!world.is_despawning(p));
        for _ in 0..10 {
            update_projectile(&mut world, &map, p, 0.01);
        }
        assert!(world.is_despawning(p));
    }

    #[test]
    fn test_projectile_lifetime() {
        let map = TileGrid::new(20, 20, 32.0, 32.0);
        let mut world = World::new();
        let o = owner(&mut world);
        let p = world.spawn_projectile(o, Vec2::new(100.0, 100.0), 3.0, Vec2::new(10.0, 0.0), 5, Some(0.05));
        update_projectile(&mut world, &map, p, 0.03);
        assert!(!world.is_despawning(p));
        update_projectile(&mut world, &map, p, 0.03);
        assert!(world.is_despawning(p));
    }
}
