//! Change password overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratedesk_core::forms::{NEW_PASSWORD_HINT, PasswordChange};

use super::OverlayUpdate;
use super::render_utils::{
    InputHint, OverlayConfig, render_form, render_message, render_overlay,
};
use crate::common::{FormFields, TaskKind, Tasks, TextField};
use crate::effects::UiEffect;
use crate::features::begin_task;

const CURRENT: usize = 0;
const NEW: usize = 1;
const CONFIRM: usize = 2;

#[derive(Debug, Clone)]
pub struct PasswordState {
    pub form: FormFields,
    pub error: Option<String>,
}

impl PasswordState {
    pub fn open() -> Self {
        Self {
            form: FormFields::new(vec![
                TextField::secret("Current Password"),
                TextField::secret("New Password").with_hint(NEW_PASSWORD_HINT),
                TextField::secret("Confirm New Password"),
            ]),
            error: None,
        }
    }

    pub fn to_form(&self) -> PasswordChange {
        PasswordChange {
            current_password: self.form.value(CURRENT).to_string(),
            new_password: self.form.value(NEW).to_string(),
            confirm_password: self.form.value(CONFIRM).to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tasks: &Tasks) {
        let busy = tasks.state(TaskKind::ChangePassword).is_running();
        let hints = [
            InputHint::new("Enter", "update"),
            InputHint::new("Tab", "next"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Change Password",
                border_color: Color::Blue,
                width: 72,
                height: 12,
                hints: &hints,
            },
        );

        let used = render_form(frame, layout.body, &self.form, !busy);
        let status = Rect::new(
            layout.body.x,
            layout.body.y + used + 1,
            layout.body.width,
            layout.body.height.saturating_sub(used + 1),
        );
        if busy {
            render_message(frame, status, "Updating…", Color::Yellow);
        } else if let Some(error) = &self.error {
            render_message(frame, status, error, Color::Red);
        }
    }

    /// A mismatch between the new passwords stays local: the error is shown
    /// and nothing is sent.
    pub fn handle_key(&mut self, tasks: &mut Tasks, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Enter => {
                if tasks.state(TaskKind::ChangePassword).is_running() {
                    return OverlayUpdate::stay();
                }
                match self.to_form().validate() {
                    Ok(update) => {
                        self.error = None;
                        let mut effects = Vec::new();
                        let task = begin_task(tasks, TaskKind::ChangePassword, &mut effects);
                        effects.push(UiEffect::ChangePassword { task, update });
                        OverlayUpdate::stay().with_ui_effects(effects)
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        OverlayUpdate::stay()
                    }
                }
            }
            _ => {
                if self.form.handle_key(key) {
                    self.error = None;
                }
                OverlayUpdate::stay()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn filled(current: &str, new: &str, confirm: &str) -> PasswordState {
        let mut state = PasswordState::open();
        state.form.fields[CURRENT].value = current.to_string();
        state.form.fields[NEW].value = new.to_string();
        state.form.fields[CONFIRM].value = confirm.to_string();
        state
    }

    #[test]
    fn test_mismatch_shows_error_and_sends_nothing() {
        let mut state = filled("Old123!", "NewPass1!", "NewPass2!");
        let mut tasks = Tasks::default();

        let update = state.handle_key(&mut tasks, key(KeyCode::Enter));

        assert!(update.effects.is_empty());
        assert_eq!(update.transition, OverlayTransition::Stay);
        assert_eq!(state.error.as_deref(), Some("New passwords don't match"));
        assert!(!tasks.is_any_running());
    }

    #[test]
    fn test_matching_passwords_emit_change_effect() {
        let mut state = filled("Old123!", "NewPass1!", "NewPass1!");
        let mut tasks = Tasks::default();

        let update = state.handle_key(&mut tasks, key(KeyCode::Enter));

        match update.effects.as_slice() {
            [UiEffect::ChangePassword { update, .. }] => {
                assert_eq!(update.current_password, "Old123!");
                assert_eq!(update.new_password, "NewPass1!");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert!(tasks.state(TaskKind::ChangePassword).is_running());
    }

    #[test]
    fn test_typing_clears_error() {
        let mut state = filled("a", "b", "c");
        let mut tasks = Tasks::default();
        state.handle_key(&mut tasks, key(KeyCode::Enter));
        state.handle_key(&mut tasks, key(KeyCode::Char('x')));
        assert!(state.error.is_none());
    }
}
