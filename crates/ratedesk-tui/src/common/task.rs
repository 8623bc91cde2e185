//! Async task bookkeeping.
//!
//! Every fetch or mutation the reducer starts gets a [`TaskId`]. The reducer
//! records the id as *expected* before the runtime spawns anything, so a
//! completion is applied only while its id is still the expected one. Views
//! cancel their tasks when they are torn down or switch tabs, which clears
//! the expectation and drops any late result.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Signup,
    AdminStats,
    AdminUsers,
    AdminStores,
    CreateUser,
    CreateStore,
    OwnerDashboard,
    BrowseStores,
    SubmitRating,
    ChangePassword,
}

impl TaskKind {
    pub const ALL: [TaskKind; 11] = [
        TaskKind::Login,
        TaskKind::Signup,
        TaskKind::AdminStats,
        TaskKind::AdminUsers,
        TaskKind::AdminStores,
        TaskKind::CreateUser,
        TaskKind::CreateStore,
        TaskKind::OwnerDashboard,
        TaskKind::BrowseStores,
        TaskKind::SubmitRating,
        TaskKind::ChangePassword,
    ];
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in `TuiState`, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks `id` as the only result this slot will accept.
    pub fn expect(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Records the cancel token of a started task.
    ///
    /// Returns `false` for a task that is no longer expected; its token is
    /// cancelled right away so the request is dropped.
    pub fn on_started(&mut self, started: &TaskStarted) -> bool {
        if self.active == Some(started.id) {
            self.cancel.clone_from(&started.cancel);
            true
        } else {
            if let Some(cancel) = &started.cancel {
                cancel.cancel();
            }
            false
        }
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the running task and hands back its token for cancellation.
    pub fn take_for_cancel(&mut self) -> Option<Option<CancellationToken>> {
        self.active.take()?;
        Some(self.cancel.take())
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default)]
pub struct Tasks {
    pub seq: TaskSeq,
    pub login: TaskState,
    pub signup: TaskState,
    pub admin_stats: TaskState,
    pub admin_users: TaskState,
    pub admin_stores: TaskState,
    pub create_user: TaskState,
    pub create_store: TaskState,
    pub owner_dashboard: TaskState,
    pub browse_stores: TaskState,
    pub submit_rating: TaskState,
    pub change_password: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Login => &self.login,
            TaskKind::Signup => &self.signup,
            TaskKind::AdminStats => &self.admin_stats,
            TaskKind::AdminUsers => &self.admin_users,
            TaskKind::AdminStores => &self.admin_stores,
            TaskKind::CreateUser => &self.create_user,
            TaskKind::CreateStore => &self.create_store,
            TaskKind::OwnerDashboard => &self.owner_dashboard,
            TaskKind::BrowseStores => &self.browse_stores,
            TaskKind::SubmitRating => &self.submit_rating,
            TaskKind::ChangePassword => &self.change_password,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::Signup => &mut self.signup,
            TaskKind::AdminStats => &mut self.admin_stats,
            TaskKind::AdminUsers => &mut self.admin_users,
            TaskKind::AdminStores => &mut self.admin_stores,
            TaskKind::CreateUser => &mut self.create_user,
            TaskKind::CreateStore => &mut self.create_store,
            TaskKind::OwnerDashboard => &mut self.owner_dashboard,
            TaskKind::BrowseStores => &mut self.browse_stores,
            TaskKind::SubmitRating => &mut self.submit_rating,
            TaskKind::ChangePassword => &mut self.change_password,
        }
    }

    /// Allocates an id for a new `kind` task and marks it expected.
    ///
    /// A still-running task of the same kind is superseded; its token (if it
    /// already started) is returned so the caller can cancel it.
    pub fn begin(&mut self, kind: TaskKind) -> (TaskId, Option<Option<CancellationToken>>) {
        let id = self.seq.next_id();
        let state = self.state_mut(kind);
        let superseded = state.take_for_cancel();
        state.expect(id);
        (id, superseded)
    }

    pub fn is_any_running(&self) -> bool {
        TaskKind::ALL
            .iter()
            .any(|kind| self.state(*kind).is_running())
    }
}
