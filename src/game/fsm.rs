//! Generic finite state machine
//!
//! States are boxed trait objects keyed by an id. Each state sees the
//! caller's context type `C` in `enter`/`update`/`exit` and asks for a
//! transition by returning the next id; the machine runs `exit` on the old
//! state before `enter` on the new one, so enter/exit always pair up.
//!
//! Contexts that borrow from the world are threaded through a
//! higher-ranked trait object, e.g.
//! `StateMachine<Id, dyn for<'w> State<Id, Cx<'w>>>`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Transitions chained out of a single `enter`/`update` call before the
/// machine gives up and stays where it is.
pub const MAX_CHAINED_TRANSITIONS: usize = 8;

pub trait State<K, C> {
    /// Called when the state becomes current. Returning an id moves on
    /// immediately.
    fn enter(&mut self, _cx: &mut C) -> Option<K> {
        None
    }

    /// Per-frame behaviour. `dt` is the scaled frame delta.
    fn update(&mut self, cx: &mut C, dt: f32) -> Option<K>;

    /// Called when the state stops being current. Must release anything
    /// `enter` acquired.
    fn exit(&mut self, _cx: &mut C) {}
}

pub struct StateMachine<K, S: ?Sized> {
    states: HashMap<K, Box<S>>,
    current: Option<K>,
}

impl<K, S> StateMachine<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: ?Sized,
{
    pub fn new() -> Self {
        Self { states: HashMap::new(), current: None }
    }

    /// Register (or replace) the state for `key`.
    pub fn add(&mut self, key: K, state: Box<S>) {
        self.states.insert(key, state);
    }

    pub fn with(mut self, key: K, state: Box<S>) -> Self {
        self.add(key, state);
        self
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn is(&self, key: K) -> bool {
        self.current == Some(key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    /// Current state object, for read-only inspection (HUD, debug draw).
    pub fn current_state(&self) -> Option<&S> {
        self.current.and_then(|k| self.states.get(&k)).map(|b| &**b)
    }

    /// Exit the current state and enter `key`. An unregistered key leaves
    /// the machine with no current state; later updates do nothing.
    pub fn change<C>(&mut self, key: K, cx: &mut C)
    where
        S: State<K, C>,
    {
        let mut next = Some(key);
        let mut hops = 0;
        while let Some(key) = next.take() {
            if hops == MAX_CHAINED_TRANSITIONS {
                log::warn!("state machine: transition chain cut off at {:?}", key);
                break;
            }
            hops += 1;

            if let Some(old) = self.current.take() {
                if let Some(state) = self.states.get_mut(&old) {
                    state.exit(cx);
                }
            }
            match self.states.get_mut(&key) {
                Some(state) => {
                    self.current = Some(key);
                    next = state.enter(cx);
                }
                None => {
                    log::warn!("state machine: no state registered for {:?}", key);
                }
            }
        }
    }

    /// Run the current state's update and apply any transition it asks for.
    pub fn update<C>(&mut self, cx: &mut C, dt: f32)
    where
        S: State<K, C>,
    {
        let Some(key) = self.current else {
            return;
        };
        let next = match self.states.get_mut(&key) {
            Some(state) => state.update(cx, dt),
            None => None,
        };
        if let Some(next) = next {
            self.change(next, cx);
        }
    }

    /// Exit the current state without entering another.
    pub fn stop<C>(&mut self, cx: &mut C)
    where
        S: State<K, C>,
    {
        if let Some(old) = self.current.take() {
            if let Some(state) = self.states.get_mut(&old) {
                state.exit(cx);
            }
        }
    }
}

impl<K, S> Default for StateMachine<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}
