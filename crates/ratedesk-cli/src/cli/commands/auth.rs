//! Login, signup, logout and whoami.

use anyhow::{Context, Result};
use ratedesk_core::forms::{LoginForm, SignupForm};
use ratedesk_core::{ApiClient, Role, SessionStore, auth, messages};

use super::failure;

pub async fn login(api: &ApiClient, email: String, password: String) -> Result<()> {
    let credentials = LoginForm { email, password }.validate()?;
    let route = auth::login(api, &credentials)
        .await
        .map_err(|err| failure(&err, messages::LOGIN_FAILED))?;

    let role = api.session().get().role.map_or("unknown", Role::label);
    println!("Logged in as {role}. Dashboard: {}", route.path());
    Ok(())
}

pub async fn signup(api: &ApiClient, form: &SignupForm) -> Result<()> {
    let registration = form.validate()?;
    auth::signup(api, &registration)
        .await
        .map_err(|err| failure(&err, messages::SIGNUP_FAILED))?;
    println!("{}", messages::SIGNUP_SUCCESS);
    Ok(())
}

pub fn logout() -> Result<()> {
    let session = SessionStore::open_default().context("open session")?;
    auth::logout(&session).context("clear session")?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami() -> Result<()> {
    let session = SessionStore::open_default().context("open session")?.get();
    match session.role {
        Some(role) if session.has_token() => println!("{role}"),
        _ => println!("Not logged in."),
    }
    Ok(())
}
