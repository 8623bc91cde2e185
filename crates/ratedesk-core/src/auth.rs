//! Login, signup and logout flows.
//!
//! These tie the API client to the session store and return the route the
//! caller should navigate to.

use anyhow::Result;

use crate::api::{ApiClient, ApiError, Credentials, Registration};
use crate::routes::Route;
use crate::session::SessionStore;

/// Authenticates and stores the returned token and role.
///
/// The session is written only after a successful response, so a failed
/// login leaves it exactly as it was.
///
/// # Errors
/// Returns the backend or transport error, or a storage error if the session
/// cannot be persisted.
pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<Route, ApiError> {
    let response = api.login(credentials).await?;
    let role = response.user.role;

    api.session()
        .set(response.token, role)
        .map_err(|err| ApiError::storage(&err))?;

    tracing::info!(%role, "logged in");
    Ok(Route::for_role(role))
}

/// Registers a new end-user account. Success lands on the login screen.
///
/// # Errors
/// Returns the backend or transport error.
pub async fn signup(api: &ApiClient, registration: &Registration) -> Result<Route, ApiError> {
    api.register(registration).await?;
    tracing::info!("registered new account");
    Ok(Route::Login)
}

/// Clears both token and role, whatever they were.
///
/// # Errors
/// Returns an error if the session file cannot be removed.
pub fn logout(session: &SessionStore) -> Result<Route> {
    session.clear()?;
    tracing::info!("logged out");
    Ok(Route::Login)
}
