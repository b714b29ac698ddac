//! Scene flow
//!
//! Menu, gameplay, pause, death and level-complete screens around a single
//! [`Session`]. Entering gameplay always builds a fresh session from the
//! level and tuning; leaving it drops the session (and with it the clock,
//! so time scale is back to normal on the next run).
//!
//! Drawing is the host's job. This module only tracks which scene is up,
//! which menu entry is highlighted, and when to switch.

use crate::config::Tuning;
use crate::game::session::{FrameReport, Session};
use crate::input::{Button, InputFrame, InputState};
use crate::map::LevelData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Menu,
    Playing,
    Paused,
    Death,
    LevelComplete,
}

/// Selectable menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    StartGame,
    Manual,
    Retry,
    MainMenu,
    Restart,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::StartGame => "Start Game",
            MenuItem::Manual => "Manual",
            MenuItem::Retry => "Retry",
            MenuItem::MainMenu => "Main Menu",
            MenuItem::Restart => "Restart",
        }
    }
}

impl Scene {
    /// Entries of this scene's menu, top to bottom.
    pub fn menu(self) -> &'static [MenuItem] {
        match self {
            Scene::Menu => &[MenuItem::StartGame, MenuItem::Manual],
            Scene::Death => &[MenuItem::Retry, MenuItem::MainMenu],
            Scene::LevelComplete => &[MenuItem::Restart, MenuItem::MainMenu],
            Scene::Playing | Scene::Paused => &[],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Scene::Menu => "DREAMWALKER",
            Scene::Playing => "",
            Scene::Paused => "Paused",
            Scene::Death => "You Died",
            Scene::LevelComplete => "Level Complete",
        }
    }
}

pub struct SceneManager {
    scene: Scene,
    selected: usize,
    manual_open: bool,
    level: LevelData,
    tuning: Tuning,
    session: Option<Session>,
    input: InputFrame,
}

impl SceneManager {
    pub fn new(level: LevelData, tuning: Tuning) -> Self {
        Self {
            scene: Scene::Menu,
            selected: 0,
            manual_open: false,
            level,
            tuning,
            session: None,
            input: InputFrame::default(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// Highlighted entry of the current scene's menu.
    pub fn selected(&self) -> Option<MenuItem> {
        self.scene.menu().get(self.selected).copied()
    }

    pub fn manual_open(&self) -> bool {
        self.manual_open
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Run one frame of whatever scene is up. Returns the gameplay report
    /// when the session ticked.
    pub fn update(&mut self, raw_dt: f32, input: InputState) -> Option<FrameReport> {
        self.input.advance(input);
        match self.scene {
            Scene::Menu if self.manual_open => {
                if self.input.pressed(Button::Escape) || self.input.pressed(Button::Enter) {
                    self.manual_open = false;
                }
                None
            }
            Scene::Menu | Scene::Death | Scene::LevelComplete => {
                if let Some(item) = self.navigate() {
                    self.activate(item);
                }
                None
            }
            Scene::Paused => {
                if self.input.pressed(Button::Escape) {
                    self.goto(Scene::Playing);
                }
                None
            }
            Scene::Playing => {
                if self.input.pressed(Button::Escape) {
                    self.goto(Scene::Paused);
                    return None;
                }
                let session = self.session.as_mut()?;
                let report = session.tick(raw_dt, input);
                if report.player_dead {
                    self.goto(Scene::Death);
                } else if report.enemies_left == 0 {
                    self.goto(Scene::LevelComplete);
                }
                Some(report)
            }
        }
    }

    /// Up/down move the highlight (wrapping); enter picks it.
    fn navigate(&mut self) -> Option<MenuItem> {
        let len = self.scene.menu().len();
        if len == 0 {
            return None;
        }
        if self.input.pressed(Button::Up) {
            self.selected = (self.selected + len - 1) % len;
        }
        if self.input.pressed(Button::Down) {
            self.selected = (self.selected + 1) % len;
        }
        if self.input.pressed(Button::Enter) {
            self.selected()
        } else {
            None
        }
    }

    fn activate(&mut self, item: MenuItem) {
        match item {
            MenuItem::StartGame | MenuItem::Retry | MenuItem::Restart => self.start(),
            MenuItem::Manual => self.manual_open = true,
            MenuItem::MainMenu => {
                self.session = None;
                self.goto(Scene::Menu);
            }
        }
    }

    fn start(&mut self) {
        self.session = Some(Session::new(&self.level, self.tuning.clone()));
        self.goto(Scene::Playing);
    }

    fn goto(&mut self, scene: Scene) {
        if scene != self.scene {
            log::info!("scene: {:?} -> {:?}", self.scene, scene);
        }
        self.scene = scene;
        self.selected = 0;
    }
}
