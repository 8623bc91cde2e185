use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::state::{LoginView, SignupView};
use crate::overlays::render_utils::{
    InputHint, OverlayConfig, render_form, render_message, render_overlay,
};

const CARD_WIDTH: u16 = 56;

pub fn render_login(frame: &mut Frame, area: Rect, view: &LoginView, busy: bool) {
    let hints = [
        InputHint::new("Enter", "login"),
        InputHint::new("Tab", "next"),
        InputHint::new("Ctrl+N", "sign up"),
        InputHint::new("Esc", "quit"),
    ];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Login",
            border_color: Color::Cyan,
            width: CARD_WIDTH,
            height: 11,
            hints: &hints,
        },
    );

    let used = render_form(frame, layout.body, &view.form, !busy);
    let status = Rect::new(
        layout.body.x,
        layout.body.y + used + 1,
        layout.body.width,
        layout.body.height.saturating_sub(used + 1),
    );

    if busy {
        render_message(frame, status, "Signing in…", Color::Yellow);
    } else if let Some(error) = &view.error {
        render_message(frame, status, error, Color::Red);
    } else if let Some(notice) = &view.notice {
        render_message(frame, status, notice, Color::Green);
    }
}

pub fn render_signup(frame: &mut Frame, area: Rect, view: &SignupView, busy: bool) {
    let hints = [
        InputHint::new("Enter", "sign up"),
        InputHint::new("Tab", "next"),
        InputHint::new("Esc", "back to login"),
    ];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Sign Up",
            border_color: Color::Green,
            width: CARD_WIDTH,
            height: 15,
            hints: &hints,
        },
    );

    let used = render_form(frame, layout.body, &view.form, !busy);
    let status = Rect::new(
        layout.body.x,
        layout.body.y + used + 1,
        layout.body.width,
        layout.body.height.saturating_sub(used + 1),
    );

    if busy {
        render_message(frame, status, "Creating account…", Color::Yellow);
    } else if let Some(error) = &view.error {
        render_message(frame, status, error, Color::Red);
    }
}
