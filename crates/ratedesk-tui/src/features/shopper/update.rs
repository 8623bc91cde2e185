use crossterm::event::{KeyCode, KeyEvent};
use ratedesk_core::api::{ApiResult, StoreListing};
use ratedesk_core::forms::rating_submission;
use ratedesk_core::messages;

use super::state::ShopperState;
use crate::common::{Loadable, TaskKind, Tasks};
use crate::effects::UiEffect;
use crate::features::{ViewRequest, ViewUpdate, begin_task};
use crate::state::Banner;

/// Fetches the store list for the current search term. A list already on
/// screen stays visible until the new one arrives.
pub fn refresh(shopper: &mut ShopperState, tasks: &mut Tasks) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    let task = begin_task(tasks, TaskKind::BrowseStores, &mut effects);
    if shopper.listings.loaded().is_none() {
        shopper.listings = Loadable::Loading;
    }
    effects.push(UiEffect::BrowseStores {
        task,
        search: shopper.search.value.clone(),
    });
    effects
}

pub fn handle_shopper_key(
    shopper: &mut ShopperState,
    tasks: &mut Tasks,
    key: KeyEvent,
) -> ViewUpdate {
    if shopper.searching {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            shopper.searching = false;
            return ViewUpdate::none();
        }
        if !shopper.search.handle_key(key) {
            return ViewUpdate::none();
        }
        shopper.selected = 0;
        return ViewUpdate::effects(refresh(shopper, tasks));
    }

    match key.code {
        KeyCode::Char('q') => ViewUpdate::request(ViewRequest::Quit),
        KeyCode::Char('/') => {
            shopper.searching = true;
            ViewUpdate::none()
        }
        KeyCode::Char('r') => ViewUpdate::effects(refresh(shopper, tasks)),
        KeyCode::Up | KeyCode::Char('k') => {
            shopper.selected = shopper.selected.saturating_sub(1);
            ViewUpdate::none()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let count = shopper.listings.loaded().map_or(0, Vec::len);
            if shopper.selected + 1 < count {
                shopper.selected += 1;
            }
            ViewUpdate::none()
        }
        KeyCode::Char(c @ '1'..='5') => submit_rating(shopper, tasks, c as u8 - b'0'),
        _ => ViewUpdate::none(),
    }
}

fn submit_rating(shopper: &mut ShopperState, tasks: &mut Tasks, value: u8) -> ViewUpdate {
    if tasks.state(TaskKind::SubmitRating).is_running() {
        return ViewUpdate::none();
    }
    let Some(store) = shopper.selected_store() else {
        return ViewUpdate::none();
    };
    match rating_submission(store.id, value) {
        Ok(rating) => {
            shopper.error = None;
            let mut effects = Vec::new();
            let task = begin_task(tasks, TaskKind::SubmitRating, &mut effects);
            effects.push(UiEffect::SubmitRating { task, rating });
            ViewUpdate::effects(effects)
        }
        Err(err) => {
            shopper.error = Some(err.to_string());
            ViewUpdate::none()
        }
    }
}

pub fn handle_listings_loaded(shopper: &mut ShopperState, result: ApiResult<Vec<StoreListing>>) {
    match result {
        Ok(listings) => {
            shopper.error = None;
            shopper.selected = shopper.selected.min(listings.len().saturating_sub(1));
            shopper.listings = Loadable::Loaded(listings);
        }
        Err(err) => {
            tracing::warn!(%err, "store list fetch failed");
            let message = err.user_message(messages::STORES_FAILED);
            shopper.error = Some(message.clone());
            if shopper.listings.loaded().is_none() {
                shopper.listings = Loadable::Failed(message);
            }
        }
    }
}

/// Success refetches the list so the new rating shows; failure is reported
/// inline and as a banner.
pub fn handle_rating_submitted(
    shopper: &mut ShopperState,
    tasks: &mut Tasks,
    result: ApiResult<()>,
) -> (Vec<UiEffect>, Option<Banner>) {
    match result {
        Ok(()) => (refresh(shopper, tasks), None),
        Err(err) => {
            tracing::warn!(%err, "rating submit failed");
            let message = err.user_message(messages::RATING_FAILED);
            shopper.error = Some(message.clone());
            (Vec::new(), Some(Banner::error(message)))
        }
    }
}
