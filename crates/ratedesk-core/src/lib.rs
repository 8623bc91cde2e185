//! Core of the ratedesk client: configuration, the shared session context,
//! the REST API client and the UI-independent rules (routing guard, sorting,
//! form checks) used by both the TUI and the CLI.

pub mod api;
pub mod auth;
pub mod config;
#[cfg(feature = "demo-role-switch")]
pub mod demo;
pub mod forms;
pub mod listing;
pub mod logging;
pub mod messages;
pub mod routes;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use routes::Route;
pub use session::{Role, Session, SessionStore};
