//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratedesk_core::routes::{self, Route};
use ratedesk_core::{Role, Session, messages};

use crate::common::{TaskKind, TextField};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::auth::{self, LoginView, SignupView};
use crate::features::{ViewRequest, ViewUpdate, admin, cancel_task, owner, shopper};
use crate::overlays::{Overlay, OverlayTransition, PasswordState};
use crate::state::{AppState, Banner, BannerKind, TuiState, View};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            if app.tui.banner.as_ref().is_some_and(Banner::is_expired) {
                app.tui.banner = None;
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            if !app.tui.tasks.state_mut(kind).on_started(&started) {
                tracing::debug!(?kind, id = started.id.0, "task no longer expected");
            }
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "dropping stale task result");
                vec![]
            }
        }
        UiEvent::SessionChanged(session) => handle_session_changed(app, session),
        UiEvent::LoginFinished(result) => {
            let View::Login(view) = &mut app.tui.view else {
                return vec![];
            };
            match auth::handle_login_finished(view, result) {
                Some(session) => {
                    let target = routes::initial_route(&session);
                    app.tui.session = session;
                    navigate(app, target)
                }
                None => vec![],
            }
        }
        UiEvent::SignupFinished(result) => {
            let View::Signup(view) = &mut app.tui.view else {
                return vec![];
            };
            let Some(route) = auth::handle_signup_finished(view, result) else {
                return vec![];
            };
            let effects = navigate(app, route);
            if let View::Login(login) = &mut app.tui.view {
                login.notice = Some(messages::SIGNUP_SUCCESS.to_string());
            }
            effects
        }
        UiEvent::StatsLoaded(result) => {
            if let View::Admin(admin) = &mut app.tui.view {
                let banner = admin::handle_stats_loaded(admin, result);
                set_banner(&mut app.tui, banner);
            }
            vec![]
        }
        UiEvent::UsersLoaded(result) => {
            if let View::Admin(admin) = &mut app.tui.view {
                let banner = admin::handle_users_loaded(admin, result);
                set_banner(&mut app.tui, banner);
            }
            vec![]
        }
        UiEvent::StoresLoaded(result) => {
            if let View::Admin(admin) = &mut app.tui.view {
                let banner = admin::handle_stores_loaded(admin, result);
                set_banner(&mut app.tui, banner);
            }
            vec![]
        }
        UiEvent::UserCreated(result) => {
            let View::Admin(admin) = &mut app.tui.view else {
                return vec![];
            };
            let (effects, banner) = admin::handle_user_created(admin, &mut app.tui.tasks, result);
            set_banner(&mut app.tui, banner);
            effects
        }
        UiEvent::StoreCreated(result) => {
            let View::Admin(admin) = &mut app.tui.view else {
                return vec![];
            };
            let (effects, banner) =
                admin::handle_store_created(admin, &mut app.tui.tasks, result);
            set_banner(&mut app.tui, banner);
            effects
        }
        UiEvent::OwnerDashboardLoaded(result) => {
            if let View::Owner(owner) = &mut app.tui.view {
                let banner = owner::handle_owner_loaded(owner, result);
                set_banner(&mut app.tui, banner);
            }
            vec![]
        }
        UiEvent::ListingsLoaded(result) => {
            if let View::Shopper(shopper) = &mut app.tui.view {
                shopper::handle_listings_loaded(shopper, result);
            }
            vec![]
        }
        UiEvent::RatingSubmitted(result) => {
            let View::Shopper(shopper) = &mut app.tui.view else {
                return vec![];
            };
            let (effects, banner) =
                shopper::handle_rating_submitted(shopper, &mut app.tui.tasks, result);
            set_banner(&mut app.tui, banner);
            effects
        }
        UiEvent::PasswordChanged(result) => {
            match result {
                Ok(()) => {
                    if matches!(app.overlay, Some(Overlay::Password(_))) {
                        app.overlay = None;
                    }
                    app.tui.show_info(messages::PASSWORD_SUCCESS);
                }
                Err(err) => {
                    let message = err.user_message(messages::PASSWORD_FAILED);
                    match app.overlay.as_mut().and_then(Overlay::as_password_mut) {
                        Some(password) => password.error = Some(message),
                        None => app.tui.show_error(message),
                    }
                }
            }
            vec![]
        }
        UiEvent::SessionWriteFailed(message) => {
            app.tui.show_error(message);
            vec![]
        }
    }
}

fn set_banner(tui: &mut TuiState, banner: Option<Banner>) {
    if banner.is_some() {
        tui.banner = banner;
    }
}

/// Mounts the route the persisted session starts on.
pub fn mount_initial(app: &mut AppState) -> Vec<UiEffect> {
    let route = app.tui.initial_route();
    navigate(app, route)
}

/// Guards `requested`, tears the current view down and mounts the result.
pub fn navigate(app: &mut AppState, requested: Route) -> Vec<UiEffect> {
    let target = routes::guard(requested, &app.tui.session);
    if target != requested {
        tracing::debug!(%requested, %target, "route redirected");
    }

    let mut effects = teardown(app);
    let tui = &mut app.tui;
    match target {
        Route::Login => tui.view = View::Login(LoginView::new()),
        Route::Signup => tui.view = View::Signup(SignupView::new()),
        Route::Dashboard(Role::Admin) => {
            let mut state = Box::new(admin::AdminState::new());
            effects.extend(admin::mount(&mut state, &mut tui.tasks));
            tui.view = View::Admin(state);
        }
        Route::Dashboard(Role::StoreOwner) => {
            let mut state = owner::OwnerState::new();
            effects.extend(owner::refresh(&mut state, &mut tui.tasks));
            tui.view = View::Owner(state);
        }
        Route::Dashboard(Role::User) => {
            let mut state = shopper::ShopperState::new();
            effects.extend(shopper::refresh(&mut state, &mut tui.tasks));
            tui.view = View::Shopper(state);
        }
    }
    tracing::info!(route = %target, "view mounted");
    effects
}

/// Cancels everything the current view started and closes any overlay.
fn teardown(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for kind in TaskKind::ALL {
        cancel_task(&mut app.tui.tasks, kind, &mut effects);
    }
    app.overlay = None;
    effects
}

/// Re-runs the guard against a session changed elsewhere (logout, demo
/// switch, another process).
fn handle_session_changed(app: &mut AppState, session: Session) -> Vec<UiEffect> {
    if app.tui.session == session {
        return vec![];
    }
    tracing::debug!(role = ?session.role, token = session.has_token(), "session changed");
    app.tui.session = session;

    let current = app.route();
    let target = if current.is_dashboard() {
        routes::guard(current, &app.tui.session)
    } else {
        app.tui.initial_route()
    };
    // An anonymous session leaves Login and Signup where they are.
    if target != current && (current.is_dashboard() || target.is_dashboard()) {
        return navigate(app, target);
    }
    vec![]
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            if let Some(field) = focused_field(app) {
                field.insert_str(&text);
            }
            vec![]
        }
        _ => vec![],
    }
}

/// Text field that receives pasted text, if any.
fn focused_field(app: &mut AppState) -> Option<&mut TextField> {
    if let Some(overlay) = app.overlay.as_mut() {
        return overlay
            .as_password_mut()
            .and_then(|password| password.form.focused_mut());
    }
    match &mut app.tui.view {
        View::Login(view) => view.form.focused_mut(),
        View::Signup(view) => view.form.focused_mut(),
        View::Admin(admin) if admin.form_active => match admin.tab {
            admin::AdminTab::AddUser => admin.user_form.fields.focused_mut(),
            admin::AdminTab::AddStore => admin.store_form.fields.focused_mut(),
            _ => None,
        },
        View::Shopper(shopper) if shopper.searching => Some(&mut shopper.search),
        _ => None,
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.tui.should_quit = true;
        return vec![UiEffect::Quit];
    }
    if app
        .tui
        .banner
        .as_ref()
        .is_some_and(|banner| banner.kind == BannerKind::Error)
    {
        app.tui.banner = None;
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&mut app.tui.tasks, key);
        if update.transition == OverlayTransition::Close {
            app.overlay = None;
        }
        return update.effects;
    }

    if ctrl && app.route().is_dashboard() {
        match key.code {
            KeyCode::Char('p') => {
                app.overlay = Some(Overlay::Password(PasswordState::open()));
                return vec![];
            }
            KeyCode::Char('l') => return logout(app),
            KeyCode::Char('r') => return refresh(&mut app.tui),
            #[cfg(feature = "demo-role-switch")]
            KeyCode::Char('d') => {
                let state = crate::overlays::RoleSwitchState::open(app.tui.session.role);
                app.overlay = Some(Overlay::RoleSwitch(state));
                return vec![];
            }
            _ => {}
        }
    }

    let tui = &mut app.tui;
    let view_update = match &mut tui.view {
        View::Login(view) => auth::handle_login_key(view, &mut tui.tasks, key),
        View::Signup(view) => auth::handle_signup_key(view, &mut tui.tasks, key),
        View::Admin(admin) => admin::handle_admin_key(admin, &mut tui.tasks, key),
        View::Owner(_) => owner::handle_owner_key(key),
        View::Shopper(shopper) => shopper::handle_shopper_key(shopper, &mut tui.tasks, key),
    };
    apply_view_update(app, view_update)
}

fn apply_view_update(app: &mut AppState, view_update: ViewUpdate) -> Vec<UiEffect> {
    let mut effects = view_update.effects;
    match view_update.request {
        Some(ViewRequest::Navigate(route)) => effects.extend(navigate(app, route)),
        Some(ViewRequest::Quit) => {
            app.tui.should_quit = true;
            effects.push(UiEffect::Quit);
        }
        None => {}
    }
    effects
}

/// Leaves the dashboard right away; the runtime clears the stored session.
fn logout(app: &mut AppState) -> Vec<UiEffect> {
    app.tui.session = Session::default();
    let mut effects = navigate(app, Route::Login);
    effects.push(UiEffect::Logout);
    effects
}

fn refresh(tui: &mut TuiState) -> Vec<UiEffect> {
    match &mut tui.view {
        View::Admin(admin) => admin::refresh(admin, &mut tui.tasks),
        View::Owner(owner) => owner::refresh(owner, &mut tui.tasks),
        View::Shopper(shopper) => shopper::refresh(shopper, &mut tui.tasks),
        View::Login(_) | View::Signup(_) => vec![],
    }
}

#[cfg(test)]
mod tests {
    use ratedesk_core::api::{ApiError, DashboardStats, StoreListing};

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskStarted};

    fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        )
    }

    fn key(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        press(app, code, KeyModifiers::NONE)
    }

    fn ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        press(app, KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn complete(app: &mut AppState, kind: TaskKind, id: TaskId, event: UiEvent) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(event),
                },
            },
        )
    }

    fn signed_in(role: Role) -> (AppState, Vec<UiEffect>) {
        let mut app = AppState::new(Session::new("token", role));
        let effects = mount_initial(&mut app);
        (app, effects)
    }

    fn active(app: &AppState, kind: TaskKind) -> TaskId {
        app.tui.tasks.state(kind).active.expect("task running")
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_no_session_starts_on_login() {
        let mut app = AppState::new(Session::default());
        let effects = mount_initial(&mut app);
        assert!(effects.is_empty());
        assert_eq!(app.route(), Route::Login);
    }

    #[test]
    fn test_login_success_navigates_to_role_dashboard() {
        let mut app = AppState::new(Session::default());
        mount_initial(&mut app);
        type_text(&mut app, "admin@admin.com");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "Admin123!");

        let effects = key(&mut app, KeyCode::Enter);
        let [UiEffect::Login { task, credentials }] = effects.as_slice() else {
            panic!("unexpected effects: {effects:?}");
        };
        assert_eq!(credentials.email, "admin@admin.com");

        let session = Session::new("abc", Role::Admin);
        let effects = complete(
            &mut app,
            TaskKind::Login,
            *task,
            UiEvent::LoginFinished(Ok(session.clone())),
        );

        assert_eq!(app.route(), Route::Dashboard(Role::Admin));
        assert_eq!(app.tui.session, session);
        assert!(matches!(effects.as_slice(), [UiEffect::FetchStats { .. }]));
    }

    #[test]
    fn test_login_failure_stays_and_shows_server_message() {
        let mut app = AppState::new(Session::default());
        mount_initial(&mut app);
        type_text(&mut app, "a@b.c");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "nope");
        key(&mut app, KeyCode::Enter);
        let task = active(&app, TaskKind::Login);

        let err = ApiError::http_status(401, r#"{"error":"Invalid credentials"}"#);
        complete(&mut app, TaskKind::Login, task, UiEvent::LoginFinished(Err(err)));

        assert_eq!(app.route(), Route::Login);
        assert!(app.tui.session.is_empty());
        let View::Login(view) = &app.tui.view else {
            panic!("expected login view");
        };
        assert_eq!(view.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_tab_switch_cancels_and_drops_stale_stats() {
        let (mut app, _) = signed_in(Role::Admin);
        let stale = active(&app, TaskKind::AdminStats);
        let cancel = tokio_util::sync::CancellationToken::new();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::AdminStats,
                started: TaskStarted {
                    id: stale,
                    cancel: Some(cancel.clone()),
                },
            },
        );

        let effects = key(&mut app, KeyCode::Char('2'));
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::CancelTask {
                kind: TaskKind::AdminStats,
                token: Some(_)
            }
        )));
        assert!(effects.iter().any(|e| matches!(e, UiEffect::FetchUsers { .. })));

        let stats = DashboardStats {
            total_users: 9,
            total_stores: 9,
            total_ratings: 9,
        };
        complete(
            &mut app,
            TaskKind::AdminStats,
            stale,
            UiEvent::StatsLoaded(Ok(stats)),
        );

        let View::Admin(admin) = &app.tui.view else {
            panic!("expected admin view");
        };
        assert_eq!(admin.stats, crate::common::Loadable::Idle);
        assert!(admin.users.is_loading());
    }

    #[test]
    fn test_logout_cancels_fetches_and_clears_session() {
        let (mut app, _) = signed_in(Role::StoreOwner);
        let effects = ctrl(&mut app, 'l');

        assert_eq!(app.route(), Route::Login);
        assert!(app.tui.session.is_empty());
        assert!(matches!(effects.last(), Some(UiEffect::Logout)));
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::CancelTask {
                kind: TaskKind::OwnerDashboard,
                ..
            }
        )));
        assert!(!app.tui.tasks.is_any_running());
    }

    #[test]
    fn test_cleared_session_returns_dashboard_to_login() {
        let (mut app, _) = signed_in(Role::User);
        update(&mut app, UiEvent::SessionChanged(Session::default()));
        assert_eq!(app.route(), Route::Login);
    }

    #[test]
    fn test_session_role_change_remounts_matching_dashboard() {
        let (mut app, _) = signed_in(Role::User);
        let effects = update(
            &mut app,
            UiEvent::SessionChanged(Session::new("other", Role::Admin)),
        );
        assert_eq!(app.route(), Route::Dashboard(Role::Admin));
        assert!(effects.iter().any(|e| matches!(e, UiEffect::FetchStats { .. })));
    }

    #[test]
    fn test_password_mismatch_emits_nothing() {
        let (mut app, _) = signed_in(Role::User);
        ctrl(&mut app, 'p');
        assert!(matches!(app.overlay, Some(Overlay::Password(_))));

        type_text(&mut app, "Current1!");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "NewPass1!");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "NewPass2!");
        let effects = key(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        let Some(Overlay::Password(password)) = &app.overlay else {
            panic!("overlay closed");
        };
        assert_eq!(password.error.as_deref(), Some("New passwords don't match"));
    }

    #[test]
    fn test_password_success_closes_overlay() {
        let (mut app, _) = signed_in(Role::User);
        ctrl(&mut app, 'p');
        type_text(&mut app, "Current1!");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "NewPass1!");
        key(&mut app, KeyCode::Tab);
        type_text(&mut app, "NewPass1!");
        let effects = key(&mut app, KeyCode::Enter);
        assert!(matches!(effects.as_slice(), [UiEffect::ChangePassword { .. }]));

        let task = active(&app, TaskKind::ChangePassword);
        complete(
            &mut app,
            TaskKind::ChangePassword,
            task,
            UiEvent::PasswordChanged(Ok(())),
        );
        assert!(app.overlay.is_none());
        assert_eq!(
            app.tui.banner.as_ref().map(|b| b.text.as_str()),
            Some(messages::PASSWORD_SUCCESS)
        );
    }

    #[test]
    fn test_rating_submit_then_refetch() {
        let (mut app, _) = signed_in(Role::User);
        let browse = active(&app, TaskKind::BrowseStores);
        let store = StoreListing {
            id: 42,
            name: "Corner Shop".to_string(),
            address: "1 Main St".to_string(),
            rating: 4.0,
            user_rating: None,
        };
        complete(
            &mut app,
            TaskKind::BrowseStores,
            browse,
            UiEvent::ListingsLoaded(Ok(vec![store])),
        );

        let effects = key(&mut app, KeyCode::Char('5'));
        let [UiEffect::SubmitRating { task, rating }] = effects.as_slice() else {
            panic!("unexpected effects: {effects:?}");
        };
        assert_eq!((rating.store_id, rating.rating), (42, 5));

        let effects = complete(
            &mut app,
            TaskKind::SubmitRating,
            *task,
            UiEvent::RatingSubmitted(Ok(())),
        );
        assert!(matches!(effects.as_slice(), [UiEffect::BrowseStores { .. }]));
    }

    #[test]
    fn test_refresh_supersedes_running_fetch() {
        let (mut app, _) = signed_in(Role::StoreOwner);
        let first = active(&app, TaskKind::OwnerDashboard);
        ctrl(&mut app, 'r');
        let second = active(&app, TaskKind::OwnerDashboard);
        assert_ne!(first, second);

        complete(
            &mut app,
            TaskKind::OwnerDashboard,
            first,
            UiEvent::OwnerDashboardLoaded(Ok(Default::default())),
        );
        let View::Owner(owner) = &app.tui.view else {
            panic!("expected owner view");
        };
        assert!(owner.data.is_loading());
    }

    #[cfg(feature = "demo-role-switch")]
    #[test]
    fn test_demo_switch_has_no_network_effect() {
        let (mut app, _) = signed_in(Role::User);
        ctrl(&mut app, 'd');
        key(&mut app, KeyCode::Down);
        let effects = key(&mut app, KeyCode::Enter);

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::SwitchRole { role: Role::Admin }]
        ));
        assert!(!effects.iter().any(UiEffect::is_network));

        // The runtime writes the session; the watch brings it back here.
        update(
            &mut app,
            UiEvent::SessionChanged(Session::new("forged", Role::Admin)),
        );
        assert_eq!(app.route().path(), "/dashboard/admin");
    }
}
