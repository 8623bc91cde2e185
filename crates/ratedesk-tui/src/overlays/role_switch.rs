//! Demo role switcher. Forges a local session for the chosen role; nothing is
//! sent to the backend.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratedesk_core::Role;
use ratedesk_core::demo::DEMO_ACCOUNTS;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_message, render_overlay};
use crate::effects::UiEffect;

#[derive(Debug, Clone)]
pub struct RoleSwitchState {
    pub selected: usize,
    /// Role of the session when the overlay opened, marked in the list.
    pub current: Option<Role>,
}

impl RoleSwitchState {
    pub fn open(current: Option<Role>) -> Self {
        let selected = DEMO_ACCOUNTS
            .iter()
            .position(|account| Some(account.role) == current)
            .unwrap_or(0);
        Self { selected, current }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                OverlayUpdate::stay()
            }
            KeyCode::Down => {
                if self.selected + 1 < DEMO_ACCOUNTS.len() {
                    self.selected += 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                let Some(account) = DEMO_ACCOUNTS.get(self.selected) else {
                    return OverlayUpdate::close();
                };
                OverlayUpdate::close()
                    .with_ui_effects(vec![UiEffect::SwitchRole { role: account.role }])
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [
            InputHint::new("↑↓", "navigate"),
            InputHint::new("Enter", "switch"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Demo: Switch Role",
                border_color: Color::Magenta,
                width: 52,
                height: DEMO_ACCOUNTS.len() as u16 + 6,
                hints: &hints,
            },
        );

        render_message(
            frame,
            layout.body,
            "Demo only. The session is forged locally.",
            Color::DarkGray,
        );
        let list_area = Rect::new(
            layout.body.x,
            layout.body.y + 2,
            layout.body.width,
            layout.body.height.saturating_sub(3),
        );

        let items: Vec<ListItem> = DEMO_ACCOUNTS
            .iter()
            .map(|account| {
                let marker = if Some(account.role) == self.current {
                    " (current)"
                } else {
                    ""
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<12}", account.label),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(account.email, Style::default().fg(Color::DarkGray)),
                    Span::styled(marker, Style::default().fg(Color::Green)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::Magenta)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::overlays::OverlayTransition;

    #[test]
    fn test_opens_on_current_role() {
        let state = RoleSwitchState::open(Some(Role::StoreOwner));
        assert_eq!(DEMO_ACCOUNTS[state.selected].role, Role::StoreOwner);
    }

    #[test]
    fn test_enter_emits_switch_and_closes() {
        let mut state = RoleSwitchState::open(None);
        state.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        let update = state.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(update.transition, OverlayTransition::Close);
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::SwitchRole { role: Role::Admin }]
        ));
    }
}
