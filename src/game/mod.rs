//! Game Foundation Module
//!
//! A lightweight ECS-inspired runtime for a side-on action platformer.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data structs attached to entities
//! - World: Container for all entities and their components, in a stable
//!   update order, with deferred removal
//! - Event: Decoupled reporting of damage, deaths, spawns and overlaps
//!
//! Each frame a [`Session`] updates actors (state machine, then tile
//! physics), runs one collision pass through the [`CollisionManager`], and
//! compacts whatever died.
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - No runtime type registration (compile-time known components)

pub mod attack;
pub mod collider;
pub mod collision;
pub mod component;
pub mod components;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod fsm;
pub mod physics;
pub mod player;
pub mod rules;
pub mod session;
pub mod world;

// Re-export main types
pub use collider::{Collider, Layer, Rect};
pub use collision::{CollisionManager, Contact};
pub use components::{Body, Facing, Health, PhysicsBody};
pub use enemy::{AiState, Enemy, EnemyKind};
pub use entity::Entity;
pub use event::Events;
pub use fsm::{State, StateMachine};
pub use physics::StepReport;
pub use player::{Player, StateId};
pub use session::{FrameReport, Session};
pub use world::World;
