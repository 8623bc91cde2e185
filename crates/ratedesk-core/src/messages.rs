//! User-facing status strings shared by the TUI and the CLI.

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const SIGNUP_SUCCESS: &str = "Signup successful, please login.";

pub const STATS_FAILED: &str = "Failed to load dashboard stats";
pub const USERS_FAILED: &str = "Failed to load users";
pub const STORES_FAILED: &str = "Failed to load stores";
pub const CREATE_USER_FAILED: &str = "Failed to create user";
pub const CREATE_USER_SUCCESS: &str = "User created successfully";
pub const CREATE_STORE_FAILED: &str = "Failed to create store";
pub const CREATE_STORE_SUCCESS: &str = "Store created successfully";

pub const OWNER_DASHBOARD_FAILED: &str = "Failed to load dashboard data";
pub const NO_RATINGS_YET: &str = "No ratings submitted yet.";

pub const RATING_FAILED: &str = "Failed to submit rating";
pub const NOT_RATED_YET: &str = "Not rated yet";
pub const NO_STORES: &str = "No stores available";

pub const PASSWORD_FAILED: &str = "Failed to update password";
pub const PASSWORD_SUCCESS: &str = "Password updated successfully";

/// Empty-state line for the store browser.
pub fn no_stores_matching(search: &str) -> String {
    if search.trim().is_empty() {
        NO_STORES.to_string()
    } else {
        format!("No stores found matching \"{}\"", search.trim())
    }
}
