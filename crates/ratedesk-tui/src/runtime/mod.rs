//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Spawned tasks send `TaskStarted` and `TaskCompleted` events to `inbox_tx`.
//! The loop drains `inbox_rx` each frame, together with terminal input and
//! the session watch.

mod handlers;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratedesk_core::{ApiClient, Session, auth};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame interval while something is in flight (spinners).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// How often the session file is re-read to catch other processes.
pub const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    api: ApiClient,
    session_rx: watch::Receiver<Session>,
    last_tick: Instant,
    last_session_poll: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and mounts the route the stored session
    /// allows.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(api: ApiClient) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let mut session_rx = api.session().subscribe();
        let session = session_rx.borrow_and_update().clone();
        let state = AppState::new(session);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        let mut runtime = Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            api,
            session_rx,
            last_tick: now,
            last_session_poll: now,
        };
        let effects = update::mount_initial(&mut runtime.state);
        runtime.execute_effects(effects);
        Ok(runtime)
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error on terminal I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            for event in events {
                // Only Tick triggers render; input batches until the next one.
                if matches!(event, UiEvent::Tick) {
                    dirty = true;
                }
                self.dispatch_event(event);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tui.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
        self.collect_session_change(&mut events);

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Forwards session watch updates, re-reading the file now and then so
    /// a login or logout from another process shows up here too.
    fn collect_session_change(&mut self, events: &mut Vec<UiEvent>) {
        if self.last_session_poll.elapsed() >= SESSION_POLL_INTERVAL {
            self.last_session_poll = Instant::now();
            if let Err(err) = self.api.session().reload() {
                tracing::warn!("session reload failed: {err:#}");
            }
        }
        if self.session_rx.has_changed().unwrap_or(false) {
            let session = self.session_rx.borrow_and_update().clone();
            events.push(UiEvent::SessionChanged(session));
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns a cancellable task with a uniform TaskStarted/TaskCompleted
    /// lifecycle. A cancelled task reports nothing.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = CancellationToken::new();
        let started = TaskStarted {
            id,
            cancel: Some(cancel.clone()),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });

        let api = self.api.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(?kind, id = id.0, "task cancelled");
                }
                inner = f(api) => {
                    let completed = TaskCompleted {
                        id,
                        result: Box::new(inner),
                    };
                    let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
                }
            }
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::CancelTask { token, .. } => {
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }

            // Local session writes run inline; the watch reports the change.
            UiEffect::Logout => {
                if let Err(err) = auth::logout(self.api.session()) {
                    tracing::error!("logout failed: {err:#}");
                    self.dispatch_event(UiEvent::SessionWriteFailed(format!("{err:#}")));
                }
            }
            #[cfg(feature = "demo-role-switch")]
            UiEffect::SwitchRole { role } => {
                if let Err(err) = ratedesk_core::demo::switch_role(self.api.session(), role) {
                    tracing::error!("role switch failed: {err:#}");
                    self.dispatch_event(UiEvent::SessionWriteFailed(format!("{err:#}")));
                }
            }

            UiEffect::Login { task, credentials } => {
                self.spawn_task(TaskKind::Login, task, move |api| {
                    handlers::login(api, credentials)
                });
            }
            UiEffect::Signup { task, registration } => {
                self.spawn_task(TaskKind::Signup, task, move |api| {
                    handlers::signup(api, registration)
                });
            }
            UiEffect::FetchStats { task } => {
                self.spawn_task(TaskKind::AdminStats, task, handlers::fetch_stats);
            }
            UiEffect::FetchUsers { task, query } => {
                self.spawn_task(TaskKind::AdminUsers, task, move |api| {
                    handlers::fetch_users(api, query)
                });
            }
            UiEffect::FetchStores { task, query } => {
                self.spawn_task(TaskKind::AdminStores, task, move |api| {
                    handlers::fetch_stores(api, query)
                });
            }
            UiEffect::CreateUser { task, user } => {
                self.spawn_task(TaskKind::CreateUser, task, move |api| {
                    handlers::create_user(api, user)
                });
            }
            UiEffect::CreateStore { task, store } => {
                self.spawn_task(TaskKind::CreateStore, task, move |api| {
                    handlers::create_store(api, store)
                });
            }
            UiEffect::FetchOwnerDashboard { task } => {
                self.spawn_task(
                    TaskKind::OwnerDashboard,
                    task,
                    handlers::fetch_owner_dashboard,
                );
            }
            UiEffect::BrowseStores { task, search } => {
                self.spawn_task(TaskKind::BrowseStores, task, move |api| {
                    handlers::browse_stores(api, search)
                });
            }
            UiEffect::SubmitRating { task, rating } => {
                self.spawn_task(TaskKind::SubmitRating, task, move |api| {
                    handlers::submit_rating(api, rating)
                });
            }
            UiEffect::ChangePassword { task, update } => {
                self.spawn_task(TaskKind::ChangePassword, task, move |api| {
                    handlers::change_password(api, update)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = terminal::restore_terminal();
    }
}
