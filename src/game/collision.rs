//! Entity vs entity collision
//!
//! Broad phase is a layer matrix: a pair of entities is only tested when a
//! rule exists for their two layers. Overlapping solid pairs are pushed
//! apart on the shallow axis, then the pair goes to the handler registered
//! for its layers, or to the generic collision event queue if there is none.

use std::collections::HashMap;

use glam::Vec2;

use super::collider::{Layer, Rect};
use super::entity::Entity;
use super::event::CollisionEvent;
use super::world::World;

/// One overlapping pair, ordered the way its handler was registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub first: Entity,
    pub second: Entity,
    /// Penetration depth on each axis, before any push-apart
    pub overlap: Vec2,
    /// Both colliders were solid and got separated
    pub solid: bool,
}

pub type CollisionHandler = Box<dyn FnMut(&mut World, &Contact)>;

struct HandlerEntry {
    /// Layer the handler expects as `Contact::first`
    first: Layer,
    handler: CollisionHandler,
}

/// Unordered layer pair.
fn pair_key(a: Layer, b: Layer) -> (Layer, Layer) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct CollisionManager {
    matrix: [[bool; Layer::COUNT]; Layer::COUNT],
    handlers: HashMap<(Layer, Layer), HandlerEntry>,
}

impl CollisionManager {
    pub fn new() -> Self {
        Self {
            matrix: [[false; Layer::COUNT]; Layer::COUNT],
            handlers: HashMap::new(),
        }
    }

    /// Allow `a` and `b` to collide, in both directions.
    pub fn add_layer_rule(&mut self, a: Layer, b: Layer) {
        self.matrix[a.index()][b.index()] = true;
        self.matrix[b.index()][a.index()] = true;
    }

    pub fn should_collide(&self, a: Layer, b: Layer) -> bool {
        self.matrix[a.index()][b.index()]
    }

    /// Register the handler for the unordered pair `{first, second}`,
    /// replacing any earlier one. The handler always sees the `first`
    /// layer's entity as `Contact::first`.
    pub fn on_collision<F>(&mut self, first: Layer, second: Layer, handler: F)
    where
        F: FnMut(&mut World, &Contact) + 'static,
    {
        let entry = HandlerEntry { first, handler: Box::new(handler) };
        if self.handlers.insert(pair_key(first, second), entry).is_some() {
            log::debug!("replaced collision handler for {:?}/{:?}", first, second);
        }
    }

    pub fn has_handler(&self, a: Layer, b: Layer) -> bool {
        self.handlers.contains_key(&pair_key(a, b))
    }

    /// Drop every rule and handler.
    pub fn clear(&mut self) {
        self.matrix = [[false; Layer::COUNT]; Layer::COUNT];
        self.handlers.clear();
    }

    /// Test every pair of live entities once, in update order.
    ///
    /// Entities without a body or collider are skipped, as are tombstoned
    /// ones, including those a handler tombstones partway through the pass.
    pub fn check_all(&mut self, world: &mut World) -> Vec<Contact> {
        let order = world.entities().to_vec();
        let mut contacts = Vec::new();

        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                if world.is_despawning(a) {
                    break;
                }
                if world.is_despawning(b) {
                    continue;
                }
                let (Some(ca), Some(cb)) = (world.colliders.get(a).copied(), world.colliders.get(b).copied())
                else {
                    continue;
                };
                if !self.should_collide(ca.layer, cb.layer) {
                    continue;
                }
                let (Some(pa), Some(pb)) = (world.bodies.get(a).map(|body| body.pos), world.bodies.get(b).map(|body| body.pos))
                else {
                    continue;
                };
                let (ra, rb) = (ca.bounds(pa), cb.bounds(pb));
                let Some(overlap) = ra.overlap(&rb) else {
                    continue;
                };

                let solid = !ca.trigger && !cb.trigger;
                if solid {
                    push_apart(world, (a, &ra), (b, &rb), overlap);
                }

                let contact = match self.handlers.get_mut(&pair_key(ca.layer, cb.layer)) {
                    Some(entry) => {
                        let (first, second) = if ca.layer == entry.first { (a, b) } else { (b, a) };
                        let contact = Contact { first, second, overlap, solid };
                        (entry.handler)(world, &contact);
                        contact
                    }
                    None => {
                        world.events.collision.send(CollisionEvent { entity: a, other: b, overlap });
                        world.events.collision.send(CollisionEvent { entity: b, other: a, overlap });
                        Contact { first: a, second: b, overlap, solid }
                    }
                };
                contacts.push(contact);
            }
        }
        contacts
    }
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Positional separation along the axis of least penetration, split evenly.
fn push_apart(world: &mut World, (a, ra): (Entity, &Rect), (b, rb): (Entity, &Rect), overlap: Vec2) {
    let (ca, cb) = (ra.center(), rb.center());
    let shift = if overlap.x < overlap.y {
        let half = overlap.x * 0.5;
        Vec2::new(if ca.x < cb.x { -half } else { half }, 0.0)
    } else {
        let half = overlap.y * 0.5;
        Vec2::new(0.0, if ca.y < cb.y { -half } else { half })
    };
    if let Some(body) = world.bodies.get_mut(a) {
        body.pos += shift;
    }
    if let Some(body) = world.bodies.get_mut(b) {
        body.pos -= shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collider::Collider;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn boxed(world: &mut World, pos: Vec2, layer: Layer, trigger: bool) -> Entity {
        let size = Vec2::splat(32.0);
        let e = world.spawn(pos, size);
        let collider = if trigger { Collider::trigger(size, layer) } else { Collider::solid(size, layer) };
        world.colliders.insert(e, collider);
        e
    }

    #[test]
    fn test_rules_are_symmetric() {
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::PlayerAttack, Layer::Enemy);
        assert!(manager.should_collide(Layer::PlayerAttack, Layer::Enemy));
        assert!(manager.should_collide(Layer::Enemy, Layer::PlayerAttack));
        assert!(!manager.should_collide(Layer::Player, Layer::Enemy));
    }

    #[test]
    fn test_unruled_pairs_are_never_checked() {
        let mut world = World::new();
        boxed(&mut world, Vec2::ZERO, Layer::Player, false);
        boxed(&mut world, Vec2::new(10.0, 0.0), Layer::Enemy, false);

        let mut manager = CollisionManager::new();
        assert!(manager.check_all(&mut world).is_empty());
        assert!(world.events.collision.is_empty());
    }

    #[test]
    fn test_solid_pairs_split_on_shallow_axis() {
        let mut world = World::new();
        let a = boxed(&mut world, Vec2::new(0.0, 0.0), Layer::Player, false);
        let b = boxed(&mut world, Vec2::new(24.0, 4.0), Layer::Enemy, false);
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::Player, Layer::Enemy);

        let contacts = manager.check_all(&mut world);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].overlap, Vec2::new(8.0, 28.0));
        assert_eq!(world.bodies.get(a).unwrap().pos, Vec2::new(-4.0, 0.0));
        assert_eq!(world.bodies.get(b).unwrap().pos, Vec2::new(28.0, 4.0));
    }

    #[test]
    fn test_triggers_are_not_pushed() {
        let mut world = World::new();
        let a = boxed(&mut world, Vec2::ZERO, Layer::PlayerAttack, true);
        let b = boxed(&mut world, Vec2::new(0.0, 30.0), Layer::Enemy, false);
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::PlayerAttack, Layer::Enemy);

        let contacts = manager.check_all(&mut world);
        assert_eq!(contacts.len(), 1);
        assert!(!contacts[0].solid);
        assert_eq!(world.bodies.get(a).unwrap().pos, Vec2::ZERO);
        assert_eq!(world.bodies.get(b).unwrap().pos, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_handler_sees_registration_order() {
        let mut world = World::new();
        let player = boxed(&mut world, Vec2::ZERO, Layer::Player, true);
        let enemy = boxed(&mut world, Vec2::new(5.0, 5.0), Layer::Enemy, true);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::Player, Layer::Enemy);
        manager.on_collision(Layer::Enemy, Layer::Player, move |_, contact| {
            log.borrow_mut().push((contact.first, contact.second));
        });

        manager.check_all(&mut world);
        assert_eq!(*seen.borrow(), vec![(enemy, player)]);
        assert!(world.events.collision.is_empty());
    }

    #[test]
    fn test_fallback_notifies_both_sides() {
        let mut world = World::new();
        let a = boxed(&mut world, Vec2::ZERO, Layer::Default, true);
        let b = boxed(&mut world, Vec2::new(16.0, 0.0), Layer::Default, true);
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::Default, Layer::Default);

        manager.check_all(&mut world);
        let events: Vec<_> = world.events.collision.iter().map(|e| (e.entity, e.other)).collect();
        assert_eq!(events, vec![(a, b), (b, a)]);
    }

    #[test]
    fn test_skips_missing_colliders_and_tombstones() {
        let mut world = World::new();
        boxed(&mut world, Vec2::ZERO, Layer::Default, true);
        let bare = world.spawn(Vec2::ZERO, Vec2::splat(32.0));
        let dead = boxed(&mut world, Vec2::ZERO, Layer::Default, true);
        world.despawn(dead);
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::Default, Layer::Default);

        let contacts = manager.check_all(&mut world);
        assert!(contacts.is_empty());
        assert!(world.colliders.get(bare).is_none());
    }

    #[test]
    fn test_handler_tombstone_ends_later_pairs() {
        let mut world = World::new();
        let shot = boxed(&mut world, Vec2::ZERO, Layer::EnemyProjectile, true);
        boxed(&mut world, Vec2::new(4.0, 0.0), Layer::Player, false);
        boxed(&mut world, Vec2::new(8.0, 0.0), Layer::Player, false);

        let hits = Rc::new(RefCell::new(0));
        let count = hits.clone();
        let mut manager = CollisionManager::new();
        manager.add_layer_rule(Layer::EnemyProjectile, Layer::Player);
        manager.on_collision(Layer::EnemyProjectile, Layer::Player, move |world, contact| {
            *count.borrow_mut() += 1;
            world.despawn(contact.first);
        });

        manager.check_all(&mut world);
        assert_eq!(*hits.borrow(), 1);
        assert!(world.is_despawning(shot));
    }

    fn layer() -> impl Strategy<Value = Layer> {
        (0..Layer::COUNT).prop_map(|i| Layer::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_rules_stay_symmetric(rules in prop::collection::vec((layer(), layer()), 0..12)) {
            let mut manager = CollisionManager::new();
            for &(a, b) in &rules {
                manager.add_layer_rule(a, b);
            }
            for a in Layer::ALL {
                for b in Layer::ALL {
                    prop_assert_eq!(manager.should_collide(a, b), manager.should_collide(b, a));
                    let listed = rules.iter().any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a));
                    prop_assert_eq!(manager.should_collide(a, b), listed);
                }
            }
        }
    }
}
