//! Password change for the signed-in user.

use anyhow::{Context, Result};
use ratedesk_core::forms::PasswordChange;
use ratedesk_core::{ApiClient, Config, SessionStore, messages};

use super::failure;

pub async fn change(config: &Config, change: &PasswordChange) -> Result<()> {
    // Checked before the client exists so a mismatch never reaches the network.
    let update = change.validate()?;

    let session = SessionStore::open_default().context("open session")?;
    if !session.get().has_token() {
        anyhow::bail!("Not logged in. Run `ratedesk login` first.");
    }
    let api = ApiClient::from_config(config, session)?;
    api.change_password(&update)
        .await
        .map_err(|err| failure(&err, messages::PASSWORD_FAILED))?;
    println!("{}", messages::PASSWORD_SUCCESS);
    Ok(())
}
