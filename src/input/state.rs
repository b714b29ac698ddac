//! Input snapshots and edge detection

use glam::Vec2;
use super::Button;

/// Flags refreshed by the host before each update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub space: bool,
    pub shift: bool,
    pub click: bool,
    pub rightclick: bool,
    pub e_key: bool,
    pub enter: bool,
    pub escape: bool,
    /// Pointer position in world pixels
    pub mouse: Vec2,
}

impl InputState {
    /// Read a single flag.
    pub fn get(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Space => self.space,
            Button::Shift => self.shift,
            Button::Click => self.click,
            Button::RightClick => self.rightclick,
            Button::EKey => self.e_key,
            Button::Enter => self.enter,
            Button::Escape => self.escape,
        }
    }

    /// Write a single flag.
    pub fn set(&mut self, button: Button, down: bool) {
        let slot = match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Space => &mut self.space,
            Button::Shift => &mut self.shift,
            Button::Click => &mut self.click,
            Button::RightClick => &mut self.rightclick,
            Button::EKey => &mut self.e_key,
            Button::Enter => &mut self.enter,
            Button::Escape => &mut self.escape,
        };
        *slot = down;
    }

    /// Builder-style helper, mostly for tests and scripted input.
    pub fn with(mut self, button: Button) -> Self {
        self.set(button, true);
        self
    }

    /// -1, 0 or +1 from the left/right flags (left wins ties like the
    /// movement states do).
    pub fn horizontal(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }

    /// -1 for up, +1 for down; up wins ties.
    pub fn vertical(&self) -> f32 {
        if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        }
    }

    pub fn any_horizontal(&self) -> bool {
        self.left || self.right
    }
}

/// Current snapshot plus the previous one, for edge queries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub current: InputState,
    pub previous: InputState,
}

impl InputFrame {
    pub fn new(current: InputState, previous: InputState) -> Self {
        Self { current, previous }
    }

    /// Shift `next` in as the current snapshot.
    pub fn advance(&mut self, next: InputState) {
        self.previous = self.current;
        self.current = next;
    }

    /// Button is down this frame.
    pub fn held(&self, button: Button) -> bool {
        self.current.get(button)
    }

    /// Button went down this frame.
    pub fn pressed(&self, button: Button) -> bool {
        self.current.get(button) && !self.previous.get(button)
    }

    /// Button came up this frame.
    pub fn released(&self, button: Button) -> bool {
        !self.current.get(button) && self.previous.get(button)
    }

    pub fn mouse(&self) -> Vec2 {
        self.current.mouse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let mut frame = InputFrame::default();
        frame.advance(InputState::default().with(Button::Click));
        assert!(frame.pressed(Button::Click));
        assert!(frame.held(Button::Click));
        assert!(!frame.released(Button::Click));

        frame.advance(InputState::default().with(Button::Click));
        assert!(!frame.pressed(Button::Click));

        frame.advance(InputState::default());
        assert!(frame.released(Button::Click));
        assert!(!frame.held(Button::Click));
    }

    #[test]
    fn test_get_set_cover_every_button() {
        let mut state = InputState::default();
        for button in Button::ALL {
            state.set(button, true);
            assert!(state.get(button), "{:?}", button);
        }
    }

    #[test]
    fn test_horizontal_prefers_left() {
        let both = InputState::default().with(Button::Left).with(Button::Right);
        assert_eq!(both.horizontal(), -1.0);
        assert_eq!(InputState::default().with(Button::Right).horizontal(), 1.0);
        assert_eq!(InputState::default().horizontal(), 0.0);
    }

    #[test]
    fn test_vertical_prefers_up() {
        let both = InputState::default().with(Button::Up).with(Button::Down);
        assert_eq!(both.vertical(), -1.0);
        assert_eq!(InputState::default().with(Button::Down).vertical(), 1.0);
        assert_eq!(InputState::default().vertical(), 0.0);
    }
}
