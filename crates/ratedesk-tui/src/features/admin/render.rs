use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};
use ratedesk_core::api::{DashboardStats, Store, User, star_bar};
use ratedesk_core::listing::{ListQuery, SortField};

use super::state::{AdminState, AdminTab, OWNER_TOGGLE_SLOT, USER_ROLE_SLOT};
use crate::common::Loadable;
use crate::overlays::render_utils::{FIELD_HEIGHT, render_fields, render_form, render_message};

pub fn render_admin(frame: &mut Frame, area: Rect, admin: &AdminState, spinner: &str) {
    let [tabs_area, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

    let titles: Vec<Line> = AdminTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(admin.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, tabs_area);

    match admin.tab {
        AdminTab::Dashboard => render_stats(frame, body, &admin.stats, spinner),
        AdminTab::Users => render_users(frame, body, admin, spinner),
        AdminTab::Stores => render_stores(frame, body, admin, spinner),
        AdminTab::AddUser => render_user_form(frame, body, admin),
        AdminTab::AddStore => render_store_form(frame, body, admin),
    }
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &Loadable<DashboardStats>, spinner: &str) {
    let stats = match stats {
        Loadable::Loaded(stats) => stats,
        Loadable::Failed(message) => {
            render_message(frame, area, message, Color::Red);
            return;
        }
        _ => {
            render_loading(frame, area, spinner);
            return;
        }
    };

    let cards = [
        ("Total Users", stats.total_users),
        ("Total Stores", stats.total_stores),
        ("Total Ratings", stats.total_ratings),
    ];
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(Rect {
        height: area.height.min(4),
        ..area
    });
    for ((label, value), column) in cards.iter().zip(columns.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {label} ")),
        );
        frame.render_widget(card, *column);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, spinner: &str) {
    render_message(frame, area, &format!("{spinner} Loading…"), Color::Yellow);
}

/// Search line above a list table.
fn render_search(frame: &mut Frame, area: Rect, query: &ListQuery, active: bool) {
    let accent = if active { Color::Cyan } else { Color::DarkGray };
    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(accent)),
        Span::raw(query.search.clone()),
    ];
    if active {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    } else if query.search.is_empty() {
        spans.push(Span::styled(
            "press / to search",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn header_row(
    columns: &[SortField],
    query: &ListQuery,
    selected: usize,
    extra: &[&str],
) -> Row<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut cells: Vec<Cell> = columns
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let style = if i == selected {
                bold.fg(Color::Black).bg(Color::Cyan)
            } else {
                bold
            };
            Cell::from(query.sort.header(*field)).style(style)
        })
        .collect();
    cells.extend(
        extra
            .iter()
            .map(|title| Cell::from((*title).to_string()).style(bold)),
    );
    Row::new(cells)
}

fn list_layout(area: Rect) -> (Rect, Rect) {
    let [search, table] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
    (search, table)
}

fn render_users(frame: &mut Frame, area: Rect, admin: &AdminState, spinner: &str) {
    let (search_area, table_area) = list_layout(area);
    render_search(frame, search_area, &admin.users_query, admin.searching);

    let users: &[User] = match &admin.users {
        Loadable::Loaded(users) => users,
        Loadable::Failed(message) => {
            render_message(frame, table_area, message, Color::Red);
            return;
        }
        _ => {
            render_loading(frame, table_area, spinner);
            return;
        }
    };

    let rows = users.iter().map(|user| {
        Row::new(vec![
            Cell::from(user.name.clone()),
            Cell::from(user.email.clone()),
            Cell::from(user.address.clone()),
            Cell::from(user.role.label()),
            Cell::from(user.rating_display()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(26),
            Constraint::Percentage(30),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
        ],
    )
    .header(header_row(
        &SortField::USER_COLUMNS,
        &admin.users_query,
        admin.column,
        &["Rating"],
    ));
    frame.render_widget(table, table_area);
}

fn render_stores(frame: &mut Frame, area: Rect, admin: &AdminState, spinner: &str) {
    let (search_area, table_area) = list_layout(area);
    render_search(frame, search_area, &admin.stores_query, admin.searching);

    let stores: &[Store] = match &admin.stores {
        Loadable::Loaded(stores) => stores,
        Loadable::Failed(message) => {
            render_message(frame, table_area, message, Color::Red);
            return;
        }
        _ => {
            render_loading(frame, table_area, spinner);
            return;
        }
    };

    let rows = stores.iter().map(|store| {
        Row::new(vec![
            Cell::from(store.name.clone()),
            Cell::from(store.email.clone()),
            Cell::from(store.address.clone()),
            Cell::from(Line::from(vec![
                Span::styled(star_bar(store.rating), Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {:.1}", store.rating)),
            ])),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(26),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
        ],
    )
    .header(header_row(
        &SortField::STORE_COLUMNS,
        &admin.stores_query,
        admin.column,
        &[],
    ));
    frame.render_widget(table, table_area);
}

/// One-line selector drawn in the field style.
fn render_choice(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    active: bool,
) {
    if area.height == 0 {
        return;
    }
    let accent = if focused && active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("‹ {value} ›"), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(line), Rect { height: 1, ..area });
}

fn form_status(frame: &mut Frame, area: Rect, error: Option<&str>, active: bool) {
    if let Some(error) = error {
        render_message(frame, area, error, Color::Red);
    } else if !active {
        render_message(frame, area, "Press Enter to edit", Color::DarkGray);
    }
}

fn below(area: Rect, used: u16) -> Rect {
    Rect::new(
        area.x,
        area.y + used.min(area.height),
        area.width,
        area.height.saturating_sub(used),
    )
}

fn render_user_form(frame: &mut Frame, area: Rect, admin: &AdminState) {
    let form = &admin.user_form;
    let active = admin.form_active;
    let used = render_form(frame, area, &form.fields, active);

    let role_area = below(area, used);
    render_choice(
        frame,
        role_area,
        "Role",
        form.role.label(),
        form.fields.focus == USER_ROLE_SLOT,
        active,
    );
    let status = below(area, used + FIELD_HEIGHT);
    form_status(frame, status, form.error.as_deref(), active);
}

fn render_store_form(frame: &mut Frame, area: Rect, admin: &AdminState) {
    let form = &admin.store_form;
    let active = admin.form_active;

    let mut used = render_fields(frame, area, &form.fields, active, |i| i < 3);
    let toggle = if form.create_owner { "yes" } else { "no" };
    render_choice(
        frame,
        below(area, used),
        "Create owner account",
        toggle,
        form.fields.focus == OWNER_TOGGLE_SLOT,
        active,
    );
    used += FIELD_HEIGHT;

    if form.create_owner {
        used += render_fields(frame, below(area, used), &form.fields, active, |i| {
            i >= 3 && form.is_slot_visible(i)
        });
    }
    form_status(frame, below(area, used), form.error.as_deref(), active);
}
