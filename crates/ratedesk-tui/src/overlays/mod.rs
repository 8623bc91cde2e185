//! Modal overlays drawn over a dashboard.
//!
//! An overlay takes all keyboard input while open. Each one owns its state,
//! key handler and render function.
//!
//! - `password.rs`: change password form (any dashboard, Ctrl+P)
//! - `role_switch.rs`: demo role switcher (demo builds, Ctrl+D)
//! - `render_utils.rs`: shared drawing helpers, also used by the views

pub mod password;
pub mod render_utils;
#[cfg(feature = "demo-role-switch")]
pub mod role_switch;

use crossterm::event::KeyEvent;
pub use password::PasswordState;
use ratatui::Frame;
use ratatui::layout::Rect;
#[cfg(feature = "demo-role-switch")]
pub use role_switch::RoleSwitchState;

use crate::common::Tasks;
use crate::effects::UiEffect;

/// Transition returned by overlay key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Password(PasswordState),
    #[cfg(feature = "demo-role-switch")]
    RoleSwitch(RoleSwitchState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, tasks: &Tasks) {
        match self {
            Overlay::Password(p) => p.render(frame, area, tasks),
            #[cfg(feature = "demo-role-switch")]
            Overlay::RoleSwitch(r) => r.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, tasks: &mut Tasks, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Password(p) => p.handle_key(tasks, key),
            #[cfg(feature = "demo-role-switch")]
            Overlay::RoleSwitch(r) => r.handle_key(key),
        }
    }

    pub fn as_password_mut(&mut self) -> Option<&mut PasswordState> {
        match self {
            Overlay::Password(p) => Some(p),
            #[cfg(feature = "demo-role-switch")]
            Overlay::RoleSwitch(_) => None,
        }
    }
}
