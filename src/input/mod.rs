//! Semantic input surface
//!
//! The simulation never reads devices. The host fills an `InputState` of
//! plain flags once per frame; `InputFrame` pairs it with the previous
//! snapshot so states can ask for press/release edges.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
