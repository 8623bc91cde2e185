//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! ## Cancellation Effects
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`.
//! The runtime executes these by calling `token.cancel()` on the provided token.

use ratedesk_core::api::{
    Credentials, NewStore, NewUser, PasswordUpdate, RatingSubmission, Registration,
};
use ratedesk_core::listing::ListQuery;
#[cfg(feature = "demo-role-switch")]
use ratedesk_core::Role;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    Login {
        task: TaskId,
        credentials: Credentials,
    },
    Signup {
        task: TaskId,
        registration: Registration,
    },
    /// Clear the shared session.
    Logout,

    FetchStats {
        task: TaskId,
    },
    FetchUsers {
        task: TaskId,
        query: ListQuery,
    },
    FetchStores {
        task: TaskId,
        query: ListQuery,
    },
    CreateUser {
        task: TaskId,
        user: NewUser,
    },
    CreateStore {
        task: TaskId,
        store: NewStore,
    },

    FetchOwnerDashboard {
        task: TaskId,
    },

    BrowseStores {
        task: TaskId,
        search: String,
    },
    SubmitRating {
        task: TaskId,
        rating: RatingSubmission,
    },

    ChangePassword {
        task: TaskId,
        update: PasswordUpdate,
    },

    /// Forge a local session for `role` (demo builds only).
    #[cfg(feature = "demo-role-switch")]
    SwitchRole {
        role: Role,
    },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}

impl UiEffect {
    /// Task kind and id for effects that run as tracked tasks.
    pub fn task(&self) -> Option<(TaskKind, TaskId)> {
        let pair = match self {
            UiEffect::Login { task, .. } => (TaskKind::Login, *task),
            UiEffect::Signup { task, .. } => (TaskKind::Signup, *task),
            UiEffect::FetchStats { task } => (TaskKind::AdminStats, *task),
            UiEffect::FetchUsers { task, .. } => (TaskKind::AdminUsers, *task),
            UiEffect::FetchStores { task, .. } => (TaskKind::AdminStores, *task),
            UiEffect::CreateUser { task, .. } => (TaskKind::CreateUser, *task),
            UiEffect::CreateStore { task, .. } => (TaskKind::CreateStore, *task),
            UiEffect::FetchOwnerDashboard { task } => (TaskKind::OwnerDashboard, *task),
            UiEffect::BrowseStores { task, .. } => (TaskKind::BrowseStores, *task),
            UiEffect::SubmitRating { task, .. } => (TaskKind::SubmitRating, *task),
            UiEffect::ChangePassword { task, .. } => (TaskKind::ChangePassword, *task),
            _ => return None,
        };
        Some(pair)
    }

    /// True for effects that reach the backend.
    pub fn is_network(&self) -> bool {
        self.task().is_some()
    }
}
