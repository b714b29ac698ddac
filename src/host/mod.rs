//! Native/browser host: device polling, camera and debug drawing
//!
//! Everything here talks to macroquad. The library never does.

mod camera;
mod draw;
mod keys;

pub use camera::Camera;
pub use draw::draw_frame;
pub use keys::poll_input;

/// Logical canvas size in pixels
pub const VIEW_WIDTH: f32 = 960.0;
pub const VIEW_HEIGHT: f32 = 540.0;
