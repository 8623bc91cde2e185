use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratedesk_core::api::ApiResult;
use ratedesk_core::{ApiError, Route, Session, messages};

use super::state::{LoginView, SignupView};
use crate::common::{TaskKind, Tasks};
use crate::effects::UiEffect;
use crate::features::{ViewRequest, ViewUpdate, begin_task};

pub fn handle_login_key(view: &mut LoginView, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => ViewUpdate::request(ViewRequest::Quit),
        KeyCode::Char('n') if ctrl => ViewUpdate::request(ViewRequest::Navigate(Route::Signup)),
        KeyCode::Enter => {
            if tasks.state(TaskKind::Login).is_running() {
                return ViewUpdate::none();
            }
            match view.to_form().validate() {
                Ok(credentials) => {
                    view.error = None;
                    view.notice = None;
                    let mut effects = Vec::new();
                    let task = begin_task(tasks, TaskKind::Login, &mut effects);
                    effects.push(UiEffect::Login { task, credentials });
                    ViewUpdate::effects(effects)
                }
                Err(err) => {
                    view.error = Some(err.to_string());
                    ViewUpdate::none()
                }
            }
        }
        _ => {
            if view.form.handle_key(key) {
                view.error = None;
            }
            ViewUpdate::none()
        }
    }
}

/// On success the session is already stored; the reducer navigates.
pub fn handle_login_finished(
    view: &mut LoginView,
    result: Result<Session, ApiError>,
) -> Option<Session> {
    match result {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::warn!(%err, "login failed");
            view.error = Some(err.user_message(messages::LOGIN_FAILED));
            None
        }
    }
}

pub fn handle_signup_key(view: &mut SignupView, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    match key.code {
        KeyCode::Esc => ViewUpdate::request(ViewRequest::Navigate(Route::Login)),
        KeyCode::Enter => {
            if tasks.state(TaskKind::Signup).is_running() {
                return ViewUpdate::none();
            }
            match view.to_form().validate() {
                Ok(registration) => {
                    view.error = None;
                    let mut effects = Vec::new();
                    let task = begin_task(tasks, TaskKind::Signup, &mut effects);
                    effects.push(UiEffect::Signup { task, registration });
                    ViewUpdate::effects(effects)
                }
                Err(err) => {
                    view.error = Some(err.to_string());
                    ViewUpdate::none()
                }
            }
        }
        _ => {
            if view.form.handle_key(key) {
                view.error = None;
            }
            ViewUpdate::none()
        }
    }
}

/// Returns the route to go to on success.
pub fn handle_signup_finished(view: &mut SignupView, result: ApiResult<Route>) -> Option<Route> {
    match result {
        Ok(route) => Some(route),
        Err(err) => {
            view.error = Some(err.user_message(messages::SIGNUP_FAILED));
            None
        }
    }
}
