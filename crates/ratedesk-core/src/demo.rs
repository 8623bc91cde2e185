//! Demo role switch.
//!
//! Writes a self-made token for any role straight into the session with no
//! backend involved. The backend will reject these tokens; this only exists
//! to click through the dashboards in a demo build and is compiled only with
//! the `demo-role-switch` feature.

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::routes::Route;
use crate::session::{Role, SessionStore};

/// Forged tokens claim to expire after 24 hours.
pub const TOKEN_LIFETIME_MS: i64 = 86_400_000;

/// A demo account shown in the switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub role: Role,
    pub label: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub user_id: u64,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        role: Role::User,
        label: "User",
        email: "user@test.com",
        password: "Test123!",
        user_id: 3,
    },
    DemoAccount {
        role: Role::Admin,
        label: "Admin",
        email: "admin@admin.com",
        password: "Admin123!",
        user_id: 1,
    },
    DemoAccount {
        role: Role::StoreOwner,
        label: "Store Owner",
        email: "owner@test.com",
        password: "Owner123!",
        user_id: 2,
    },
];

pub fn account_for(role: Role) -> &'static DemoAccount {
    match role {
        Role::User => &DEMO_ACCOUNTS[0],
        Role::Admin => &DEMO_ACCOUNTS[1],
        Role::StoreOwner => &DEMO_ACCOUNTS[2],
    }
}

#[derive(Serialize)]
struct FakeClaims {
    id: u64,
    role: Role,
    exp: i64,
}

/// Base64 of `{"id":..,"role":..,"exp":..}`. Not a JWT.
pub fn forge_token(role: Role, now_ms: i64) -> String {
    let claims = FakeClaims {
        id: account_for(role).user_id,
        role,
        exp: now_ms.saturating_add(TOKEN_LIFETIME_MS),
    };
    // Serializing a plain struct of numbers and a unit enum cannot fail.
    let json = serde_json::to_vec(&claims).unwrap_or_default();
    STANDARD.encode(json)
}

/// Overwrites the session with a forged token for `role` and returns its
/// dashboard. Makes no network call.
///
/// # Errors
/// Returns an error if the session cannot be persisted.
pub fn switch_role(session: &SessionStore, role: Role) -> Result<Route> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    session.set(forge_token(role, now_ms), role)?;
    tracing::warn!(%role, "demo role switch: session forged locally");
    Ok(Route::for_role(role))
}
