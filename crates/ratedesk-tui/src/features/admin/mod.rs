//! Admin dashboard: platform totals, user and store tables with search and
//! sortable headers, and forms to add users and stores.

mod render;
mod state;
mod update;

pub use render::render_admin;
pub use state::{AdminState, AdminTab, StoreFormState, UserFormState};
pub use update::{
    handle_admin_key, handle_store_created, handle_stats_loaded, handle_stores_loaded,
    handle_user_created, handle_users_loaded, mount, refresh, switch_tab,
};
