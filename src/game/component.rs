//! Sparse component storage
//!
//! One `Vec<Option<T>>` per component type, addressed by entity slot. The
//! session tops out at a few dozen live entities, so a dense archetype
//! layout would buy nothing.

use super::entity::Entity;

pub struct ComponentStorage<T> {
    slots: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Attach (or replace) the component for an entity.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(component);
    }

    /// Detach and return the component.
    ///
    /// Also used to check a component out for the duration of an update
    /// that needs the rest of the world mutably; put it back with `insert`.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.slots.get_mut(entity.index() as usize)?.take()
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.index() as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.index() as usize)?.as_mut()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// (slot index, component) pairs. Liveness is the caller's problem.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (i as u32, c)))
    }

    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
