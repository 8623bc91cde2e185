//! Search and sort state for the admin tables.
//!
//! The backend receives the query as-is. Rows are also sorted locally with the
//! same key so the table always agrees with its header arrow.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::api::{Store, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Email,
    Address,
    Role,
    Rating,
}

impl SortField {
    /// Sortable columns of the users table, in display order.
    pub const USER_COLUMNS: [SortField; 4] = [
        SortField::Name,
        SortField::Email,
        SortField::Address,
        SortField::Role,
    ];

    /// Sortable columns of the stores table, in display order.
    pub const STORE_COLUMNS: [SortField; 4] = [
        SortField::Name,
        SortField::Email,
        SortField::Address,
        SortField::Rating,
    ];

    /// Value sent as `sortBy`.
    pub fn as_param(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Address => "address",
            SortField::Role => "role",
            SortField::Rating => "rating",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::Address => "Address",
            SortField::Role => "Role",
            SortField::Rating => "Rating",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "address" => Ok(SortField::Address),
            "role" => Ok(SortField::Role),
            "rating" => Ok(SortField::Rating),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}' (expected asc or desc)")),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            order: SortOrder::Asc,
        }
    }
}

impl SortState {
    /// Header click: same column inverts the order, another column selects it
    /// ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.toggled();
        } else {
            self.field = field;
            self.order = SortOrder::Asc;
        }
    }

    /// Header label with an arrow on the active column.
    pub fn header(&self, field: SortField) -> String {
        if self.field == field {
            format!("{} {}", field.title(), self.order.arrow())
        } else {
            field.title().to_string()
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.as_param(), self.order.as_param())
    }
}

/// Search term plus sort, as sent to the admin list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortState,
}

impl ListQuery {
    /// `search`, `sortBy` and `sortOrder`, always all three.
    pub fn to_params(&self) -> [(&'static str, &str); 3] {
        [
            ("search", self.search.as_str()),
            ("sortBy", self.sort.field.as_param()),
            ("sortOrder", self.sort.order.as_param()),
        ]
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Stable local sort of user rows.
pub fn sort_users(users: &mut [User], sort: SortState) {
    users.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Name => compare_text(&a.name, &b.name),
            SortField::Email => compare_text(&a.email, &b.email),
            SortField::Address => compare_text(&a.address, &b.address),
            SortField::Role => a.role.as_str().cmp(b.role.as_str()),
            SortField::Rating => a
                .rating
                .unwrap_or(0.0)
                .total_cmp(&b.rating.unwrap_or(0.0)),
        };
        directed(ordering, sort.order)
    });
}

/// Stable local sort of store rows. Role has no meaning here and keeps order.
pub fn sort_stores(stores: &mut [Store], sort: SortState) {
    stores.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Name => compare_text(&a.name, &b.name),
            SortField::Email => compare_text(&a.email, &b.email),
            SortField::Address => compare_text(&a.address, &b.address),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Role => Ordering::Equal,
        };
        directed(ordering, sort.order)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn store(id: u64, name: &str, rating: f64) -> Store {
        Store {
            id,
            name: name.to_string(),
            email: format!("{id}@x"),
            address: String::new(),
            rating,
        }
    }

    #[test]
    fn test_same_header_twice_inverts_order() {
        let mut sort = SortState::default();
        sort.toggle(SortField::Name);
        assert_eq!(sort.order, SortOrder::Desc);
        sort.toggle(SortField::Name);
        assert_eq!(sort.order, SortOrder::Asc);
        assert_eq!(sort.field, SortField::Name);
    }

    #[test]
    fn test_other_header_resets_to_ascending() {
        let mut sort = SortState {
            field: SortField::Email,
            order: SortOrder::Desc,
        };
        sort.toggle(SortField::Rating);
        assert_eq!(
            sort,
            SortState {
                field: SortField::Rating,
                order: SortOrder::Asc
            }
        );
    }

    #[test]
    fn test_header_arrow_only_on_active_column() {
        let mut sort = SortState::default();
        assert_eq!(sort.header(SortField::Name), "Name ↑");
        assert_eq!(sort.header(SortField::Email), "Email");
        sort.toggle(SortField::Name);
        assert_eq!(sort.header(SortField::Name), "Name ↓");
    }

    #[test]
    fn test_params_always_present() {
        let query = ListQuery::default();
        assert_eq!(
            query.to_params(),
            [("search", ""), ("sortBy", "name"), ("sortOrder", "asc")]
        );
    }

    #[test]
    fn test_sort_stores_by_rating_desc() {
        let mut stores = vec![store(1, "b", 2.0), store(2, "a", 4.5), store(3, "c", 3.0)];
        sort_stores(
            &mut stores,
            SortState {
                field: SortField::Rating,
                order: SortOrder::Desc,
            },
        );
        let ids: Vec<u64> = stores.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_users_is_case_insensitive() {
        let user = |id: u64, name: &str| User {
            id,
            name: name.to_string(),
            email: String::new(),
            address: String::new(),
            role: Role::User,
            rating: None,
        };
        let mut users = vec![user(1, "bob"), user(2, "Alice"), user(3, "carol")];
        sort_users(&mut users, SortState::default());
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob", "carol"]);
    }

    #[test]
    fn test_parse_field_and_order() {
        assert_eq!("Rating".parse::<SortField>().unwrap(), SortField::Rating);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }
}
