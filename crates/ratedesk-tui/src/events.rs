//! Events consumed by the reducer.
//!
//! Terminal input, ticks, task lifecycle notifications and session changes
//! all arrive as a [`UiEvent`]. Task results travel boxed inside
//! `TaskCompleted` and are only unwrapped if the task is still expected.

use ratedesk_core::api::{
    ApiError, ApiResult, DashboardStats, OwnerDashboard, Store, StoreListing, User,
};
use ratedesk_core::{Route, Session};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    Tick,
    Terminal(crossterm::event::Event),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// The shared session changed (this process or another one).
    SessionChanged(Session),

    // Task results. Only delivered through `TaskCompleted`.
    LoginFinished(Result<Session, ApiError>),
    SignupFinished(ApiResult<Route>),
    StatsLoaded(ApiResult<DashboardStats>),
    UsersLoaded(ApiResult<Vec<User>>),
    StoresLoaded(ApiResult<Vec<Store>>),
    UserCreated(ApiResult<()>),
    StoreCreated(ApiResult<()>),
    OwnerDashboardLoaded(ApiResult<OwnerDashboard>),
    ListingsLoaded(ApiResult<Vec<StoreListing>>),
    RatingSubmitted(ApiResult<()>),
    PasswordChanged(ApiResult<()>),

    /// Local session write failed (logout or demo switch).
    SessionWriteFailed(String),
}
