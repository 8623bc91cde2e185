//! Demo role switch. Forges a local session without contacting the backend.

use anyhow::{Context, Result};
use ratedesk_core::{Role, SessionStore, demo};

pub fn switch_role(role: Role) -> Result<()> {
    let session = SessionStore::open_default().context("open session")?;
    let route = demo::switch_role(&session, role).context("write demo session")?;
    let account = demo::account_for(role);
    println!(
        "Demo session for {} ({}). Dashboard: {}",
        role.label(),
        account.email,
        route.path()
    );
    Ok(())
}
