use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratedesk_core::api::{ApiResult, DashboardStats, Store, User};
use ratedesk_core::listing::{sort_stores, sort_users};
use ratedesk_core::{Role, messages};

use super::state::{AdminState, AdminTab, StoreFormState, UserFormState};
use crate::common::{Loadable, TaskKind, Tasks};
use crate::effects::UiEffect;
use crate::features::{ViewRequest, ViewUpdate, begin_task, cancel_task};
use crate::state::Banner;

/// Fetch kinds owned by the list and summary tabs.
const FETCH_KINDS: [TaskKind; 3] = [
    TaskKind::AdminStats,
    TaskKind::AdminUsers,
    TaskKind::AdminStores,
];

/// Effects for a freshly mounted admin view.
pub fn mount(admin: &mut AdminState, tasks: &mut Tasks) -> Vec<UiEffect> {
    refresh(admin, tasks)
}

/// Refetches whatever the current tab shows.
pub fn refresh(admin: &mut AdminState, tasks: &mut Tasks) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    fetch_tab(admin, tasks, &mut effects);
    effects
}

/// Activates `tab`. Fetches for the old tab are cancelled; create tasks are
/// left to finish.
pub fn switch_tab(admin: &mut AdminState, tasks: &mut Tasks, tab: AdminTab) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for kind in FETCH_KINDS {
        cancel_task(tasks, kind, &mut effects);
    }
    reset_loading(admin);

    admin.tab = tab;
    admin.searching = false;
    admin.column = 0;
    admin.form_active = tab.is_form();
    fetch_tab(admin, tasks, &mut effects);
    effects
}

/// Cancelled fetches never report back, so their spinners are reset here.
fn reset_loading(admin: &mut AdminState) {
    if admin.stats.is_loading() {
        admin.stats = Loadable::Idle;
    }
    if admin.users.is_loading() {
        admin.users = Loadable::Idle;
    }
    if admin.stores.is_loading() {
        admin.stores = Loadable::Idle;
    }
}

fn fetch_tab(admin: &mut AdminState, tasks: &mut Tasks, effects: &mut Vec<UiEffect>) {
    match admin.tab {
        AdminTab::Dashboard => {
            let task = begin_task(tasks, TaskKind::AdminStats, effects);
            admin.stats = Loadable::Loading;
            effects.push(UiEffect::FetchStats { task });
        }
        AdminTab::Users => {
            let task = begin_task(tasks, TaskKind::AdminUsers, effects);
            admin.users = Loadable::Loading;
            effects.push(UiEffect::FetchUsers {
                task,
                query: admin.users_query.clone(),
            });
        }
        AdminTab::Stores => {
            let task = begin_task(tasks, TaskKind::AdminStores, effects);
            admin.stores = Loadable::Loading;
            effects.push(UiEffect::FetchStores {
                task,
                query: admin.stores_query.clone(),
            });
        }
        AdminTab::AddUser | AdminTab::AddStore => {}
    }
}

pub fn handle_admin_key(admin: &mut AdminState, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    if admin.searching {
        return handle_search_key(admin, tasks, key);
    }
    if admin.tab.is_form() && admin.form_active {
        return match admin.tab {
            AdminTab::AddUser => handle_user_form_key(admin, tasks, key),
            _ => handle_store_form_key(admin, tasks, key),
        };
    }

    match key.code {
        KeyCode::Char('q') => ViewUpdate::request(ViewRequest::Quit),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            ViewUpdate::effects(switch_tab(admin, tasks, AdminTab::ALL[index]))
        }
        KeyCode::Tab => {
            let next = admin.tab.next();
            ViewUpdate::effects(switch_tab(admin, tasks, next))
        }
        KeyCode::BackTab => {
            let prev = admin.tab.prev();
            ViewUpdate::effects(switch_tab(admin, tasks, prev))
        }
        KeyCode::Char('/') if admin.query(admin.tab).is_some() => {
            admin.searching = true;
            ViewUpdate::none()
        }
        KeyCode::Left if !admin.tab.columns().is_empty() => {
            admin.column = admin.column.saturating_sub(1);
            ViewUpdate::none()
        }
        KeyCode::Right if !admin.tab.columns().is_empty() => {
            admin.column = (admin.column + 1).min(admin.tab.columns().len() - 1);
            ViewUpdate::none()
        }
        KeyCode::Enter | KeyCode::Char('s') if !admin.tab.columns().is_empty() => {
            ViewUpdate::effects(toggle_sort(admin, tasks))
        }
        KeyCode::Enter | KeyCode::Char('i') if admin.tab.is_form() => {
            admin.form_active = true;
            ViewUpdate::none()
        }
        _ => ViewUpdate::none(),
    }
}

/// Toggles the highlighted column of the current list tab and refetches.
fn toggle_sort(admin: &mut AdminState, tasks: &mut Tasks) -> Vec<UiEffect> {
    let tab = admin.tab;
    let Some(&field) = tab.columns().get(admin.column) else {
        return Vec::new();
    };
    let Some(query) = admin.query_mut(tab) else {
        return Vec::new();
    };
    query.sort.toggle(field);
    let sort = query.sort;

    match tab {
        AdminTab::Users => {
            if let Some(users) = admin.users.loaded_mut() {
                sort_users(users, sort);
            }
        }
        AdminTab::Stores => {
            if let Some(stores) = admin.stores.loaded_mut() {
                sort_stores(stores, sort);
            }
        }
        _ => {}
    }
    refresh(admin, tasks)
}

fn handle_search_key(admin: &mut AdminState, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    let tab = admin.tab;
    let Some(query) = admin.query_mut(tab) else {
        admin.searching = false;
        return ViewUpdate::none();
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let changed = match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            admin.searching = false;
            return ViewUpdate::none();
        }
        KeyCode::Backspace => query.search.pop().is_some(),
        KeyCode::Char('u') if ctrl => {
            let changed = !query.search.is_empty();
            query.search.clear();
            changed
        }
        KeyCode::Char(c) if !ctrl => {
            query.search.push(c);
            true
        }
        _ => false,
    };

    if changed {
        ViewUpdate::effects(refresh(admin, tasks))
    } else {
        ViewUpdate::none()
    }
}

fn cycle_role(role: Role, forward: bool) -> Role {
    let all = Role::ALL;
    let index = all.iter().position(|r| *r == role).unwrap_or(0);
    let next = if forward {
        (index + 1) % all.len()
    } else {
        (index + all.len() - 1) % all.len()
    };
    all[next]
}

fn handle_user_form_key(admin: &mut AdminState, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    let form = &mut admin.user_form;
    match key.code {
        KeyCode::Esc => {
            admin.form_active = false;
            ViewUpdate::none()
        }
        KeyCode::Enter => submit_user(form, tasks),
        KeyCode::Tab | KeyCode::Down => {
            form.fields.focus = (form.fields.focus + 1) % form.slot_count();
            ViewUpdate::none()
        }
        KeyCode::BackTab | KeyCode::Up => {
            let slots = form.slot_count();
            form.fields.focus = (form.fields.focus + slots - 1) % slots;
            ViewUpdate::none()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.role_focused() => {
            form.role = cycle_role(form.role, key.code != KeyCode::Left);
            ViewUpdate::none()
        }
        _ => {
            if form
                .fields
                .focused_mut()
                .is_some_and(|field| field.handle_key(key))
            {
                form.error = None;
            }
            ViewUpdate::none()
        }
    }
}

fn submit_user(form: &mut UserFormState, tasks: &mut Tasks) -> ViewUpdate {
    if tasks.state(TaskKind::CreateUser).is_running() {
        return ViewUpdate::none();
    }
    match form.to_form().validate() {
        Ok(user) => {
            form.error = None;
            let mut effects = Vec::new();
            let task = begin_task(tasks, TaskKind::CreateUser, &mut effects);
            effects.push(UiEffect::CreateUser { task, user });
            ViewUpdate::effects(effects)
        }
        Err(err) => {
            form.error = Some(err.to_string());
            ViewUpdate::none()
        }
    }
}

fn step_focus(form: &mut StoreFormState, forward: bool) {
    let order = form.focus_order();
    let current = order
        .iter()
        .position(|slot| *slot == form.fields.focus)
        .unwrap_or(0);
    let next = if forward {
        (current + 1) % order.len()
    } else {
        (current + order.len() - 1) % order.len()
    };
    form.fields.focus = order[next];
}

fn handle_store_form_key(admin: &mut AdminState, tasks: &mut Tasks, key: KeyEvent) -> ViewUpdate {
    let form = &mut admin.store_form;
    match key.code {
        KeyCode::Esc => {
            admin.form_active = false;
            ViewUpdate::none()
        }
        KeyCode::Enter => submit_store(form, tasks),
        KeyCode::Tab | KeyCode::Down => {
            step_focus(form, true);
            ViewUpdate::none()
        }
        KeyCode::BackTab | KeyCode::Up => {
            step_focus(form, false);
            ViewUpdate::none()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.toggle_focused() => {
            form.create_owner = !form.create_owner;
            form.error = None;
            ViewUpdate::none()
        }
        _ => {
            if form
                .fields
                .focused_mut()
                .is_some_and(|field| field.handle_key(key))
            {
                form.error = None;
            }
            ViewUpdate::none()
        }
    }
}

fn submit_store(form: &mut StoreFormState, tasks: &mut Tasks) -> ViewUpdate {
    if tasks.state(TaskKind::CreateStore).is_running() {
        return ViewUpdate::none();
    }
    match form.to_form().validate() {
        Ok(store) => {
            form.error = None;
            let mut effects = Vec::new();
            let task = begin_task(tasks, TaskKind::CreateStore, &mut effects);
            effects.push(UiEffect::CreateStore { task, store });
            ViewUpdate::effects(effects)
        }
        Err(err) => {
            form.error = Some(err.to_string());
            ViewUpdate::none()
        }
    }
}

/// Stores the result; a failure also comes back as a banner.
pub fn handle_stats_loaded(
    admin: &mut AdminState,
    result: ApiResult<DashboardStats>,
) -> Option<Banner> {
    match result {
        Ok(stats) => {
            admin.stats = Loadable::Loaded(stats);
            None
        }
        Err(err) => {
            tracing::warn!(%err, "admin stats fetch failed");
            let message = err.user_message(messages::STATS_FAILED);
            admin.stats = Loadable::Failed(message.clone());
            Some(Banner::error(message))
        }
    }
}

pub fn handle_users_loaded(admin: &mut AdminState, result: ApiResult<Vec<User>>) -> Option<Banner> {
    match result {
        Ok(mut users) => {
            sort_users(&mut users, admin.users_query.sort);
            admin.users = Loadable::Loaded(users);
            None
        }
        Err(err) => {
            tracing::warn!(%err, "user list fetch failed");
            let message = err.user_message(messages::USERS_FAILED);
            admin.users = Loadable::Failed(message.clone());
            Some(Banner::error(message))
        }
    }
}

pub fn handle_stores_loaded(
    admin: &mut AdminState,
    result: ApiResult<Vec<Store>>,
) -> Option<Banner> {
    match result {
        Ok(mut stores) => {
            sort_stores(&mut stores, admin.stores_query.sort);
            admin.stores = Loadable::Loaded(stores);
            None
        }
        Err(err) => {
            tracing::warn!(%err, "store list fetch failed");
            let message = err.user_message(messages::STORES_FAILED);
            admin.stores = Loadable::Failed(message.clone());
            Some(Banner::error(message))
        }
    }
}

/// On success the form resets and the Users tab opens with fresh data.
pub fn handle_user_created(
    admin: &mut AdminState,
    tasks: &mut Tasks,
    result: ApiResult<()>,
) -> (Vec<UiEffect>, Option<Banner>) {
    match result {
        Ok(()) => {
            admin.user_form = UserFormState::new();
            let effects = switch_tab(admin, tasks, AdminTab::Users);
            (effects, Some(Banner::info(messages::CREATE_USER_SUCCESS)))
        }
        Err(err) => {
            admin.user_form.error = Some(err.user_message(messages::CREATE_USER_FAILED));
            (Vec::new(), None)
        }
    }
}

pub fn handle_store_created(
    admin: &mut AdminState,
    tasks: &mut Tasks,
    result: ApiResult<()>,
) -> (Vec<UiEffect>, Option<Banner>) {
    match result {
        Ok(()) => {
            admin.store_form = StoreFormState::new();
            let effects = switch_tab(admin, tasks, AdminTab::Stores);
            (effects, Some(Banner::info(messages::CREATE_STORE_SUCCESS)))
        }
        Err(err) => {
            admin.store_form.error = Some(err.user_message(messages::CREATE_STORE_FAILED));
            (Vec::new(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use ratedesk_core::listing::{SortField, SortOrder};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fetch_users_query(effects: &[UiEffect]) -> Option<&ratedesk_core::listing::ListQuery> {
        effects.iter().find_map(|effect| match effect {
            UiEffect::FetchUsers { query, .. } => Some(query),
            _ => None,
        })
    }

    #[test]
    fn test_mount_fetches_stats() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        let effects = mount(&mut admin, &mut tasks);
        assert!(matches!(effects.as_slice(), [UiEffect::FetchStats { .. }]));
        assert!(admin.stats.is_loading());
        assert!(tasks.state(TaskKind::AdminStats).is_running());
    }

    #[test]
    fn test_header_toggle_sends_sort_params() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::Users);

        let update = handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Enter));
        let query = fetch_users_query(&update.effects).expect("users refetch");
        assert_eq!(query.sort.field, SortField::Name);
        assert_eq!(query.sort.order, SortOrder::Desc);

        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Right));
        let update = handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Enter));
        let query = fetch_users_query(&update.effects).expect("users refetch");
        assert_eq!(query.sort.field, SortField::Email);
        assert_eq!(query.sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_search_typing_supersedes_fetch() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::Users);
        let first = tasks.state(TaskKind::AdminUsers).active;

        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Char('/')));
        let update = handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Char('a')));

        assert!(update
            .effects
            .iter()
            .any(|e| matches!(e, UiEffect::CancelTask { kind: TaskKind::AdminUsers, .. })));
        assert_eq!(fetch_users_query(&update.effects).map(|q| q.search.as_str()), Some("a"));
        assert_ne!(tasks.state(TaskKind::AdminUsers).active, first);
        assert!(admin.is_typing());
    }

    #[test]
    fn test_queries_are_per_tab() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::Users);
        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Enter));
        switch_tab(&mut admin, &mut tasks, AdminTab::Stores);
        assert_eq!(admin.stores_query.sort.order, SortOrder::Asc);
        assert_eq!(admin.users_query.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_tab_switch_cancels_fetch_but_not_create() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        mount(&mut admin, &mut tasks);
        tasks.begin(TaskKind::CreateUser);

        let effects = switch_tab(&mut admin, &mut tasks, AdminTab::Stores);

        assert!(effects
            .iter()
            .any(|e| matches!(e, UiEffect::CancelTask { kind: TaskKind::AdminStats, .. })));
        assert!(!tasks.state(TaskKind::AdminStats).is_running());
        assert!(tasks.state(TaskKind::CreateUser).is_running());
        assert_eq!(admin.stats, Loadable::Idle);
    }

    #[test]
    fn test_store_form_skips_owner_fields_until_toggled() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::AddStore);
        assert!(admin.form_active);

        for _ in 0..4 {
            handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Tab));
        }
        assert_eq!(admin.store_form.fields.focus, 0);

        for _ in 0..3 {
            handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Tab));
        }
        assert!(admin.store_form.toggle_focused());
        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Char(' ')));
        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Tab));
        assert!(admin.store_form.create_owner);
        assert_eq!(admin.store_form.fields.focus, 3);
    }

    #[test]
    fn test_user_form_role_selector_cycles() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::AddUser);
        admin.user_form.fields.focus = 4;

        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Right));
        assert_eq!(admin.user_form.role, Role::ALL[1]);
        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Left));
        handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Left));
        assert_eq!(admin.user_form.role, Role::ALL[Role::ALL.len() - 1]);
    }

    #[test]
    fn test_invalid_user_form_shows_error_without_effect() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::AddUser);

        let update = handle_admin_key(&mut admin, &mut tasks, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(admin.user_form.error.is_some());
    }

    #[test]
    fn test_user_created_switches_to_users_and_refetches() {
        let mut admin = AdminState::new();
        let mut tasks = Tasks::default();
        switch_tab(&mut admin, &mut tasks, AdminTab::AddUser);
        admin.user_form.fields.fields[0].value = "someone".to_string();

        let (effects, banner) = handle_user_created(&mut admin, &mut tasks, Ok(()));

        assert_eq!(admin.tab, AdminTab::Users);
        assert!(fetch_users_query(&effects).is_some());
        assert_eq!(
            banner.map(|b| b.text),
            Some(messages::CREATE_USER_SUCCESS.to_string())
        );
        assert_eq!(admin.user_form.fields.value(0), "");
    }
}
