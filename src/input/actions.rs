//! Semantic buttons
//!
//! Named after the flags the host refreshes, not after physical keys.
//! Default keyboard/mouse bindings (host side):
//! - A/D or arrows = Left/Right, W/S or arrows = Up/Down
//! - Space = Jump, Left Shift = Roll
//! - Left mouse = Attack (Dream Slash while dreaming)
//! - Right mouse = Dash Strike
//! - E = Dream state toggle
//! - Enter / Escape = menu confirm / pause

/// Every flag the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Space,
    Shift,
    Click,
    RightClick,
    EKey,
    Enter,
    Escape,
}

impl Button {
    pub const ALL: [Button; 11] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Space,
        Button::Shift,
        Button::Click,
        Button::RightClick,
        Button::EKey,
        Button::Enter,
        Button::Escape,
    ];
}
