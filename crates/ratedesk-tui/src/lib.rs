//! Full-screen terminal UI for ratedesk.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use ratedesk_core::ApiClient;
pub use runtime::TuiRuntime;

/// Runs the TUI until the user quits.
///
/// Must be called inside a Tokio runtime; backend calls are spawned onto it.
///
/// # Errors
/// Returns an error if there is no terminal or terminal I/O fails.
pub async fn run(api: ApiClient) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The dashboard requires a terminal.\n\
             Use subcommands such as `ratedesk stores list` for scripted use."
        );
    }

    tracing::info!(base_url = api.base_url(), "starting tui");
    let mut runtime = TuiRuntime::new(api)?;
    runtime.run()
}
