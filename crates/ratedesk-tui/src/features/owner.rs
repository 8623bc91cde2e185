//! Store owner dashboard: average rating and who rated the store.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratedesk_core::api::{ApiResult, OwnerDashboard, star_bar};
use ratedesk_core::messages;

use crate::common::{Loadable, TaskKind, Tasks};
use crate::effects::UiEffect;
use crate::features::{ViewRequest, ViewUpdate, begin_task};
use crate::overlays::render_utils::render_message;
use crate::state::Banner;

#[derive(Debug, Default)]
pub struct OwnerState {
    pub data: Loadable<OwnerDashboard>,
}

impl OwnerState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn refresh(owner: &mut OwnerState, tasks: &mut Tasks) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    let task = begin_task(tasks, TaskKind::OwnerDashboard, &mut effects);
    owner.data = Loadable::Loading;
    effects.push(UiEffect::FetchOwnerDashboard { task });
    effects
}

pub fn handle_owner_key(key: KeyEvent) -> ViewUpdate {
    match key.code {
        KeyCode::Char('q') => ViewUpdate::request(ViewRequest::Quit),
        _ => ViewUpdate::none(),
    }
}

pub fn handle_owner_loaded(
    owner: &mut OwnerState,
    result: ApiResult<OwnerDashboard>,
) -> Option<Banner> {
    match result {
        Ok(data) => {
            owner.data = Loadable::Loaded(data);
            None
        }
        Err(err) => {
            tracing::warn!(%err, "owner dashboard fetch failed");
            let message = err.user_message(messages::OWNER_DASHBOARD_FAILED);
            owner.data = Loadable::Failed(message.clone());
            Some(Banner::error(message))
        }
    }
}

pub fn render_owner(frame: &mut Frame, area: Rect, owner: &OwnerState, spinner: &str) {
    let data = match &owner.data {
        Loadable::Loaded(data) => data,
        Loadable::Failed(message) => {
            render_message(frame, area, message, Color::Red);
            return;
        }
        _ => {
            render_message(frame, area, &format!("{spinner} Loading…"), Color::Yellow);
            return;
        }
    };

    let [summary, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Average rating  ", label),
            Span::styled(
                star_bar(data.average_rating),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!(" {:.1}/5", data.average_rating), value),
        ]),
        Line::from(vec![
            Span::styled("Total ratings   ", label),
            Span::styled(data.ratings.len().to_string(), value),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), summary);

    if data.ratings.is_empty() {
        render_message(frame, table_area, messages::NO_RATINGS_YET, Color::DarkGray);
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(["Name", "Email", "Rating", "Date"].map(|t| Cell::from(t).style(bold)));
    let rows = data.ratings.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.name.clone()),
            Cell::from(entry.email.clone()),
            Cell::from(Span::styled(
                star_bar(f64::from(entry.rating)),
                Style::default().fg(Color::Yellow),
            )),
            Cell::from(entry.date_display()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(34),
            Constraint::Percentage(18),
            Constraint::Percentage(20),
        ],
    )
    .header(header);
    frame.render_widget(table, table_area);
}

#[cfg(test)]
mod tests {
    use ratedesk_core::ApiError;

    use super::*;

    #[test]
    fn test_refresh_marks_loading_and_tracks_task() {
        let mut owner = OwnerState::new();
        let mut tasks = Tasks::default();
        let effects = refresh(&mut owner, &mut tasks);
        assert!(matches!(effects.as_slice(), [UiEffect::FetchOwnerDashboard { .. }]));
        assert!(owner.data.is_loading());
        assert!(tasks.state(TaskKind::OwnerDashboard).is_running());
    }

    #[test]
    fn test_failure_uses_fallback_message() {
        let mut owner = OwnerState::new();
        let banner = handle_owner_loaded(&mut owner, Err(ApiError::http_status(500, "")));
        assert_eq!(
            owner.data,
            Loadable::Failed(messages::OWNER_DASHBOARD_FAILED.to_string())
        );
        assert!(banner.is_some());
    }
}
