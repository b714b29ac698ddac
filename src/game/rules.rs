//! Combat wiring for the collision manager
//!
//! Which layers meet, and what happens when they do: contact damage,
//! player hits with knockback and dream meter gain, enemy hitboxes and
//! projectiles. Every hitbox and projectile lands at most once per target.

use glam::Vec2;

use super::collider::Layer;
use super::collision::{CollisionManager, Contact};
use super::components::DamageOutcome;
use super::world::World;

/// Knockback is a positional push of `knockback * KNOCKBACK_SCALE` pixels.
pub const KNOCKBACK_SCALE: f32 = 0.1;

/// Register the game's layer rules and handlers on `manager`.
pub fn setup_collisions(manager: &mut CollisionManager) {
    manager.add_layer_rule(Layer::Player, Layer::Enemy);
    manager.add_layer_rule(Layer::PlayerAttack, Layer::Enemy);
    manager.add_layer_rule(Layer::EnemyAttack, Layer::Player);
    manager.add_layer_rule(Layer::EnemyProjectile, Layer::Player);

    manager.on_collision(Layer::Player, Layer::Enemy, contact_damage);
    manager.on_collision(Layer::PlayerAttack, Layer::Enemy, player_hit);
    manager.on_collision(Layer::EnemyAttack, Layer::Player, enemy_hit);
    manager.on_collision(Layer::EnemyProjectile, Layer::Player, projectile_hit);
}

/// A manager with the game rules already registered.
pub fn collision_manager() -> CollisionManager {
    let mut manager = CollisionManager::new();
    setup_collisions(&mut manager);
    manager
}

/// Walking into an enemy hurts; the player's damage cooldown limits the rate.
fn contact_damage(world: &mut World, contact: &Contact) {
    let (player, enemy) = (contact.first, contact.second);
    let damage = match world.enemies.get(enemy) {
        Some(e) => e.contact_damage(),
        None => return,
    };
    if damage > 0 {
        world.damage(player, damage, Some(enemy));
    }
}

fn player_hit(world: &mut World, contact: &Contact) {
    let (hitbox, enemy) = (contact.first, contact.second);
    let Some(hb) = world.hitboxes.get_mut(hitbox) else {
        return;
    };
    if !hb.mark_hit(enemy) {
        return;
    }
    let (owner, damage, knockback, last_seen) = (hb.owner, hb.damage, hb.knockback, hb.owner_pos);
    let from = match world.bodies.get(owner) {
        Some(body) if world.is_active(owner) => body.pos,
        _ => last_seen,
    };

    let outcome = world.damage(enemy, damage, Some(hitbox));
    if outcome == DamageOutcome::Ignored {
        return;
    }
    if let Some(body) = world.bodies.get_mut(enemy) {
        body.pos += knockback_offset(from, body.pos, knockback);
    }
    if let Some(player) = world.players.get_mut(owner) {
        let gain = player.pilot.tuning.dream.meter_per_hit;
        player.pilot.gain_meter(gain);
    }
    log::debug!("{} hit {} for {} ({:?})", owner, enemy, damage, outcome);
}

/// Push away from `from`, normalized by distance. Coincident positions
/// count as distance 1.
pub fn knockback_offset(from: Vec2, to: Vec2, knockback: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    let dist = if dist > 0.0 { dist } else { 1.0 };
    delta / dist * knockback * KNOCKBACK_SCALE
}

fn enemy_hit(world: &mut World, contact: &Contact) {
    let (hitbox, player) = (contact.first, contact.second);
    let Some(hb) = world.hitboxes.get_mut(hitbox) else {
        return;
    };
    if hb.mark_hit(player) {
        let damage = hb.damage;
        world.damage(player, damage, Some(hitbox));
    }
}

fn projectile_hit(world: &mut World, contact: &Contact) {
    let (shot, player) = (contact.first, contact.second);
    let Some(projectile) = world.projectiles.get_mut(shot) else {
        return;
    };
    if projectile.mark_hit(player) {
        let damage = projectile.damage;
        world.damage(player, damage, Some(shot));
        world.despawn(shot);
    }
}
