//! Entity handles
//!
//! An `Entity` is a slot index plus the generation that slot had when the
//! handle was issued. Freed slots are recycled with a bumped generation, so
//! a hitbox still remembering an enemy that died last frame can't land on
//! the projectile that took over its slot.

use std::fmt;

/// Handle to something living in the [`World`](super::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Handle that never refers to a live entity
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "#null")
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

/// Hands out entity handles and recycles freed slots.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    /// Freed slots, reused last-in first-out
    free: Vec<u32>,
    alive: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive += 1;
        match self.free.pop() {
            Some(index) => Entity::new(index, self.generations[index as usize]),
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                Entity::new(index, 0)
            }
        }
    }

    /// Release a handle. Returns false if it was already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        self.alive -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        !entity.is_null()
            && self
                .generations
                .get(entity.index as usize)
                .is_some_and(|&gen| gen == entity.generation)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive
    }

    /// Invalidate every handle issued so far.
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen += 1;
        }
        self.free = (0..self.generations.len() as u32).rev().collect();
        self.alive = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(a));
        assert!(!alloc.free(a));
        assert!(!alloc.is_alive(a));
        assert!(alloc.is_alive(b));
        assert_eq!(alloc.alive_count(), 1);
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::new();
        let old = alloc.allocate();
        alloc.free(old);
        let new = alloc.allocate();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(!alloc.is_alive(old));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        alloc.clear();
        assert!(!alloc.is_alive(a) && !alloc.is_alive(b));
        assert_eq!(alloc.alive_count(), 0);
        assert_eq!(alloc.allocate().index(), a.index());
    }

    #[test]
    fn test_null_is_never_alive() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::NULL));
        assert_eq!(Entity::NULL.to_string(), "#null");
    }
}
