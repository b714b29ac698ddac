//! Frame events
//!
//! Combat and collision code report what happened here instead of poking
//! the host directly. The session drains every queue into its
//! `FrameReport` at the end of each tick.

use glam::Vec2;

use super::entity::Entity;

/// Events of one type, collected during a frame.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct Events {
    pub damage: EventQueue<DamageEvent>,
    pub death: EventQueue<DeathEvent>,
    pub spawn: EventQueue<SpawnEvent>,
    /// Overlaps on layer pairs that have a rule but no handler
    pub collision: EventQueue<CollisionEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.damage.clear();
        self.death.clear();
        self.spawn.clear();
        self.collision.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A hit landed and health went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: Entity,
    /// Hitbox, projectile or body that dealt it
    pub source: Option<Entity>,
    pub amount: i32,
    /// Target center at the moment of the hit
    pub position: Vec2,
}

/// Health reached zero; the entity is already tombstoned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub position: Vec2,
}

/// Something new entered the world this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    pub entity: Entity,
    pub position: Vec2,
}

/// Fallback notification for an overlapping pair. Sent once per
/// participant, with `entity` being the receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity: Entity,
    pub other: Entity,
    /// Penetration depth on each axis
    pub overlap: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.send(1);
        queue.send(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut events = Events::new();
        events.damage.send(DamageEvent {
            target: Entity::NULL,
            source: None,
            amount: 5,
            position: Vec2::ZERO,
        });
        events.spawn.send(SpawnEvent { entity: Entity::NULL, position: Vec2::ZERO });
        events.clear_all();
        assert!(events.damage.is_empty());
        assert!(events.spawn.is_empty());
    }
}
