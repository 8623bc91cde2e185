use ratedesk_core::Role;
use ratedesk_core::api::{DashboardStats, Store, User};
use ratedesk_core::forms::{ADDRESS_HINT, NAME_HINT, PASSWORD_HINT, StoreForm, UserForm};
use ratedesk_core::listing::{ListQuery, SortField};

use crate::common::{FormFields, Loadable, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Dashboard,
    Users,
    Stores,
    AddUser,
    AddStore,
}

impl AdminTab {
    pub const ALL: [AdminTab; 5] = [
        AdminTab::Dashboard,
        AdminTab::Users,
        AdminTab::Stores,
        AdminTab::AddUser,
        AdminTab::AddStore,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Users => "Users",
            AdminTab::Stores => "Stores",
            AdminTab::AddUser => "Add User",
            AdminTab::AddStore => "Add Store",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_form(self) -> bool {
        matches!(self, AdminTab::AddUser | AdminTab::AddStore)
    }

    /// Sortable header columns for list tabs.
    pub fn columns(self) -> &'static [SortField] {
        match self {
            AdminTab::Users => &SortField::USER_COLUMNS,
            AdminTab::Stores => &SortField::STORE_COLUMNS,
            _ => &[],
        }
    }
}

pub(super) const USER_NAME: usize = 0;
pub(super) const USER_EMAIL: usize = 1;
pub(super) const USER_PASSWORD: usize = 2;
pub(super) const USER_ADDRESS: usize = 3;
/// Focus slot for the role selector, after the text fields.
pub(super) const USER_ROLE_SLOT: usize = 4;

#[derive(Debug, Clone)]
pub struct UserFormState {
    pub fields: FormFields,
    pub role: Role,
    pub error: Option<String>,
}

impl UserFormState {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(vec![
                TextField::new("Name").with_hint(NAME_HINT),
                TextField::new("Email"),
                TextField::secret("Password").with_hint(PASSWORD_HINT),
                TextField::new("Address").with_hint(ADDRESS_HINT),
            ]),
            role: Role::User,
            error: None,
        }
    }

    pub fn role_focused(&self) -> bool {
        self.fields.focus == USER_ROLE_SLOT
    }

    pub fn to_form(&self) -> UserForm {
        UserForm {
            name: self.fields.value(USER_NAME).to_string(),
            email: self.fields.value(USER_EMAIL).to_string(),
            password: self.fields.value(USER_PASSWORD).to_string(),
            address: self.fields.value(USER_ADDRESS).to_string(),
            role: self.role,
        }
    }

    pub(super) fn slot_count(&self) -> usize {
        self.fields.fields.len() + 1
    }
}

pub(super) const STORE_NAME: usize = 0;
pub(super) const STORE_EMAIL: usize = 1;
pub(super) const STORE_ADDRESS: usize = 2;
pub(super) const OWNER_EMAIL: usize = 3;
pub(super) const OWNER_PASSWORD: usize = 4;
/// Focus slot for the "create owner" toggle.
pub(super) const OWNER_TOGGLE_SLOT: usize = 5;

#[derive(Debug, Clone)]
pub struct StoreFormState {
    pub fields: FormFields,
    pub create_owner: bool,
    pub error: Option<String>,
}

impl StoreFormState {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(vec![
                TextField::new("Store Name").with_hint(NAME_HINT),
                TextField::new("Store Email"),
                TextField::new("Store Address").with_hint(ADDRESS_HINT),
                TextField::new("Owner Email"),
                TextField::secret("Owner Password").with_hint(PASSWORD_HINT),
            ]),
            create_owner: false,
            error: None,
        }
    }

    pub fn toggle_focused(&self) -> bool {
        self.fields.focus == OWNER_TOGGLE_SLOT
    }

    /// Owner fields only take part when an owner is being created.
    pub fn is_slot_visible(&self, slot: usize) -> bool {
        self.create_owner || !matches!(slot, OWNER_EMAIL | OWNER_PASSWORD)
    }

    /// Focus order: store fields, the toggle, then owner fields if shown.
    pub(super) fn focus_order(&self) -> Vec<usize> {
        let mut order = vec![STORE_NAME, STORE_EMAIL, STORE_ADDRESS, OWNER_TOGGLE_SLOT];
        if self.create_owner {
            order.extend([OWNER_EMAIL, OWNER_PASSWORD]);
        }
        order
    }

    pub fn to_form(&self) -> StoreForm {
        StoreForm {
            name: self.fields.value(STORE_NAME).to_string(),
            email: self.fields.value(STORE_EMAIL).to_string(),
            address: self.fields.value(STORE_ADDRESS).to_string(),
            create_owner: self.create_owner,
            owner_email: self.fields.value(OWNER_EMAIL).to_string(),
            owner_password: self.fields.value(OWNER_PASSWORD).to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AdminState {
    pub tab: AdminTab,
    pub stats: Loadable<DashboardStats>,
    pub users: Loadable<Vec<User>>,
    pub stores: Loadable<Vec<Store>>,
    pub users_query: ListQuery,
    pub stores_query: ListQuery,
    /// Search box has focus on a list tab.
    pub searching: bool,
    /// Highlighted header column on a list tab.
    pub column: usize,
    /// Form tabs receive typed keys until Esc.
    pub form_active: bool,
    pub user_form: UserFormState,
    pub store_form: StoreFormState,
}

impl AdminState {
    pub fn new() -> Self {
        Self {
            tab: AdminTab::Dashboard,
            stats: Loadable::Idle,
            users: Loadable::Idle,
            stores: Loadable::Idle,
            users_query: ListQuery::default(),
            stores_query: ListQuery::default(),
            searching: false,
            column: 0,
            form_active: false,
            user_form: UserFormState::new(),
            store_form: StoreFormState::new(),
        }
    }

    pub fn is_typing(&self) -> bool {
        self.searching || (self.tab.is_form() && self.form_active)
    }

    pub fn query(&self, tab: AdminTab) -> Option<&ListQuery> {
        match tab {
            AdminTab::Users => Some(&self.users_query),
            AdminTab::Stores => Some(&self.stores_query),
            _ => None,
        }
    }

    pub fn query_mut(&mut self, tab: AdminTab) -> Option<&mut ListQuery> {
        match tab {
            AdminTab::Users => Some(&mut self.users_query),
            AdminTab::Stores => Some(&mut self.stores_query),
            _ => None,
        }
    }
}

impl Default for AdminState {
    fn default() -> Self {
        Self::new()
    }
}
