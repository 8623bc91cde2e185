//! Screens of the TUI. Each feature owns its state, key handling, result
//! handling and rendering.

pub mod admin;
pub mod auth;
pub mod owner;
pub mod shopper;

use ratedesk_core::Route;

use crate::common::{TaskId, TaskKind, Tasks};
use crate::effects::UiEffect;

/// What a view asks the reducer to do beyond its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    Navigate(Route),
    Quit,
}

/// Update returned by view key handlers.
#[derive(Debug, Default)]
pub struct ViewUpdate {
    pub effects: Vec<UiEffect>,
    pub request: Option<ViewRequest>,
}

impl ViewUpdate {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effects(effects: Vec<UiEffect>) -> Self {
        Self {
            effects,
            request: None,
        }
    }

    pub fn request(request: ViewRequest) -> Self {
        Self {
            effects: Vec::new(),
            request: Some(request),
        }
    }
}

/// Starts a tracked task of `kind`, cancelling any it supersedes.
pub fn begin_task(tasks: &mut Tasks, kind: TaskKind, effects: &mut Vec<UiEffect>) -> TaskId {
    let (id, superseded) = tasks.begin(kind);
    if let Some(token) = superseded {
        effects.push(UiEffect::CancelTask { kind, token });
    }
    id
}

/// Cancels the running task of `kind`, if any, so its result is dropped.
pub fn cancel_task(tasks: &mut Tasks, kind: TaskKind, effects: &mut Vec<UiEffect>) {
    if let Some(token) = tasks.state_mut(kind).take_for_cancel() {
        effects.push(UiEffect::CancelTask { kind, token });
    }
}
