//! Keyboard/mouse to semantic flags

use glam::Vec2;
use macroquad::prelude::{is_key_down, is_mouse_button_down, mouse_position, KeyCode, MouseButton};

use dreamwalker::InputState;

fn any_down(keys: &[KeyCode]) -> bool {
    keys.iter().any(|&k| is_key_down(k))
}

/// Snapshot the devices. `camera` is the world position of the screen's
/// top-left, used to put the mouse into world pixels.
pub fn poll_input(camera: Vec2) -> InputState {
    let (mx, my) = mouse_position();
    InputState {
        left: any_down(&[KeyCode::A, KeyCode::Left]),
        right: any_down(&[KeyCode::D, KeyCode::Right]),
        up: any_down(&[KeyCode::W, KeyCode::Up]),
        down: any_down(&[KeyCode::S, KeyCode::Down]),
        space: is_key_down(KeyCode::Space),
        shift: any_down(&[KeyCode::LeftShift, KeyCode::RightShift]),
        click: is_mouse_button_down(MouseButton::Left),
        rightclick: is_mouse_button_down(MouseButton::Right),
        e_key: is_key_down(KeyCode::E),
        enter: any_down(&[KeyCode::Enter, KeyCode::KpEnter]),
        escape: is_key_down(KeyCode::Escape),
        mouse: Vec2::new(mx, my) + camera,
    }
}
