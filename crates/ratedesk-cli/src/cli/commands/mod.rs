//! CLI command handlers.

use anyhow::{Result, bail};
use ratedesk_core::routes::{self, Route};
use ratedesk_core::{ApiClient, ApiError, Role};

pub mod admin;
pub mod auth;
pub mod config;
#[cfg(feature = "demo-role-switch")]
pub mod demo;
pub mod owner;
pub mod password;
pub mod stores;

/// Backend message if there is one, else the fallback.
fn failure(err: &ApiError, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(err.user_message(fallback))
}

/// Same rule as the dashboards: the stored session must carry `role`.
fn require_role(api: &ApiClient, role: Role) -> Result<()> {
    let session = api.session().get();
    let wanted = Route::Dashboard(role);
    match routes::guard(wanted, &session) {
        granted if granted == wanted => Ok(()),
        Route::Dashboard(other) => {
            bail!(
                "This command needs the {} role (signed in as {})",
                role.label(),
                other.label()
            )
        }
        _ => bail!("Not logged in. Run `ratedesk login` first."),
    }
}
