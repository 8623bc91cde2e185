//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never mutate
//! state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::TaskKind;
use crate::common::text::truncate_with_ellipsis;
use crate::features::{admin, auth, owner, shopper};
use crate::overlays::render_utils::{InputHint, render_hints};
use crate::state::{AppState, BannerKind, TuiState, View};

/// Spinner frames for loading indicators.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 4;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let tui = &app.tui;

    let [header, banner, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, tui);
    render_banner(frame, banner, tui);

    let spinner_index = (tui.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
    let spinner = SPINNER_FRAMES[spinner_index];
    let inner = Rect::new(
        body.x + 1,
        body.y,
        body.width.saturating_sub(2),
        body.height,
    );
    match &tui.view {
        View::Login(view) => {
            let busy = tui.tasks.state(TaskKind::Login).is_running();
            auth::render_login(frame, body, view, busy);
        }
        View::Signup(view) => {
            let busy = tui.tasks.state(TaskKind::Signup).is_running();
            auth::render_signup(frame, body, view, busy);
        }
        View::Admin(state) => admin::render_admin(frame, inner, state, spinner),
        View::Owner(state) => owner::render_owner(frame, inner, state, spinner),
        View::Shopper(state) => {
            shopper::render_shopper(frame, inner, state, &tui.session, spinner);
        }
    }

    render_footer(frame, footer, &tui.view);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area, &tui.tasks);
    }
}

fn render_header(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let mut spans = vec![Span::styled(
        format!(" {} ", tui.view.title()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if tui.view.route().is_dashboard()
        && let Some(role) = tui.session.role
    {
        spans.push(Span::styled(
            format!("signed in as {}", role.label()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_banner(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(banner) = &tui.banner else {
        return;
    };
    let color = match banner.kind {
        BannerKind::Info => Color::Green,
        BannerKind::Error => Color::Red,
    };
    let text = truncate_with_ellipsis(&banner.text, area.width.saturating_sub(2) as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(color),
        ))),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, view: &View) {
    let mut hints: Vec<InputHint> = match view {
        // The auth cards carry their own hints.
        View::Login(_) | View::Signup(_) => return,
        View::Admin(state) if state.is_typing() => {
            vec![InputHint::new("Esc", "done"), InputHint::new("Tab", "next")]
        }
        View::Shopper(state) if state.searching => vec![InputHint::new("Esc", "done")],
        View::Admin(_) => vec![
            InputHint::new("1-5", "tab"),
            InputHint::new("/", "search"),
            InputHint::new("←→ Enter", "sort"),
            InputHint::new("^P", "password"),
            InputHint::new("^L", "logout"),
            InputHint::new("q", "quit"),
        ],
        View::Owner(_) => vec![
            InputHint::new("^R", "refresh"),
            InputHint::new("^P", "password"),
            InputHint::new("^L", "logout"),
            InputHint::new("q", "quit"),
        ],
        View::Shopper(_) => vec![
            InputHint::new("↑↓", "select"),
            InputHint::new("1-5", "rate"),
            InputHint::new("/", "search"),
            InputHint::new("^P", "password"),
            InputHint::new("^L", "logout"),
            InputHint::new("q", "quit"),
        ],
    };
    if cfg!(feature = "demo-role-switch") {
        hints.push(InputHint::new("^D", "demo role"));
    }
    render_hints(frame, area, &hints, Color::Cyan);
}
