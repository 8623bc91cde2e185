use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratedesk_core::api::star_bar;
use ratedesk_core::{Session, messages};

use super::state::ShopperState;
use crate::common::Loadable;
use crate::overlays::render_utils::{render_field, render_message};

pub fn render_shopper(
    frame: &mut Frame,
    area: Rect,
    shopper: &ShopperState,
    session: &Session,
    spinner: &str,
) {
    let [search_area, debug_area, status_area, list_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_field(frame, search_area, &shopper.search, shopper.searching);

    // Session as the store browser sees it.
    let role = session.role.map_or("Not set", |role| role.as_str());
    let token = if session.has_token() { "Yes" } else { "No" };
    render_message(
        frame,
        debug_area,
        &format!("Debug: Current role: {role} | Token exists: {token}"),
        Color::Yellow,
    );

    if let Some(error) = &shopper.error {
        render_message(frame, status_area, error, Color::Red);
    }

    let stores = match &shopper.listings {
        Loadable::Loaded(stores) => stores,
        Loadable::Failed(_) => return,
        _ => {
            render_message(frame, list_area, &format!("{spinner} Loading…"), Color::Yellow);
            return;
        }
    };
    if stores.is_empty() {
        let text = messages::no_stores_matching(&shopper.search.value);
        render_message(frame, list_area, &text, Color::DarkGray);
        return;
    }

    let dim = Style::default().fg(Color::DarkGray);
    let items: Vec<ListItem> = stores
        .iter()
        .map(|store| {
            let yours = match store.user_rating {
                Some(rating) => Span::styled(
                    format!("Your rating: {}", star_bar(f64::from(rating))),
                    Style::default().fg(Color::Cyan),
                ),
                None => Span::styled(messages::NOT_RATED_YET, dim),
            };
            ListItem::new(vec![
                Line::from(Span::styled(
                    store.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(store.address.clone(), dim)),
                Line::from(vec![
                    Span::styled(star_bar(store.rating), Style::default().fg(Color::Yellow)),
                    Span::raw(format!(" {:.1}   ", store.rating)),
                    yours,
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(shopper.selected));
    frame.render_stateful_widget(list, list_area, &mut state);

}
