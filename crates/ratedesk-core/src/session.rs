//! Client-held session: an opaque bearer token plus the role it was issued for.
//!
//! [`SessionStore`] is the one shared context for session state. It is cheap to
//! clone, persists to `session.json` and publishes every change through a
//! `tokio::sync::watch` channel so mounted views can react instead of polling.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::paths;

/// Account role, as spelled by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    StoreOwner,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::StoreOwner];

    /// Wire spelling (`user`, `admin`, `store_owner`).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::StoreOwner => "store_owner",
        }
    }

    /// Human label with the underscore replaced.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::StoreOwner => "store owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown role '{}' (expected user, admin or store_owner)",
            self.0
        )
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "store_owner" | "owner" => Ok(Role::StoreOwner),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Token and role, each possibly absent.
///
/// Nothing checks that the token actually encodes the role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.role.is_none()
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

struct Inner {
    path: Option<PathBuf>,
    tx: watch::Sender<Session>,
    write_lock: Mutex<()>,
}

/// Shared, observable session context.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.get();
        f.debug_struct("SessionStore")
            .field("path", &self.inner.path)
            .field("has_token", &session.has_token())
            .field("role", &session.role)
            .finish()
    }
}

impl SessionStore {
    /// Opens the store at the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open_default() -> Result<Self> {
        Self::open(paths::session_path())
    }

    /// Opens a file-backed store, loading any persisted session.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let initial = read_session(&path)?;
        Ok(Self::with_state(Some(path), initial))
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::with_state(None, Session::default())
    }

    fn with_state(path: Option<PathBuf>, initial: Session) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                tx: watch::Sender::new(initial),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Current session snapshot.
    pub fn get(&self) -> Session {
        self.inner.tx.borrow().clone()
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.tx.borrow().token.clone()
    }

    /// Persists both fields, then notifies subscribers.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written. In that case
    /// the in-memory session is left unchanged.
    pub fn set(&self, token: impl Into<String>, role: Role) -> Result<()> {
        self.replace(Session::new(token, role))
    }

    /// Removes both fields.
    ///
    /// # Errors
    /// Returns an error if the session file exists and cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.replace(Session::default())
    }

    fn replace(&self, session: Session) -> Result<()> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(path) = &self.inner.path {
            write_session(path, &session)?;
        }
        self.inner.tx.send_replace(session);
        Ok(())
    }

    /// Receiver that observes every later change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.tx.subscribe()
    }

    /// Re-reads the file and publishes it if another process changed it.
    ///
    /// Returns `true` when subscribers were notified.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn reload(&self) -> Result<bool> {
        let Some(path) = &self.inner.path else {
            return Ok(false);
        };

        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let on_disk = read_session(path)?;
        Ok(self.inner.tx.send_if_modified(|current| {
            if *current == on_disk {
                false
            } else {
                *current = on_disk;
                true
            }
        }))
    }
}

fn read_session(path: &Path) -> Result<Session> {
    if !path.exists() {
        return Ok(Session::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session from {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Session::default());
    }

    match serde_json::from_str(&contents) {
        Ok(session) => Ok(session),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable session file");
            Ok(Session::default())
        }
    }
}

/// Writes through a temp file in the same directory, then renames.
/// `tempfile` creates the file with 0600 on unix.
fn write_session(path: &Path, session: &Session) -> Result<()> {
    if session.is_empty() {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session {}", path.display()))?;
        }
        return Ok(());
    }

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let contents = serde_json::to_string_pretty(session).context("Failed to serialize session")?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write session to {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move session into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_role_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&Role::StoreOwner).unwrap(),
            "\"store_owner\""
        );
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("store_owner".parse::<Role>().unwrap(), Role::StoreOwner);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::StoreOwner.label(), "store owner");
    }

    #[test]
    fn test_set_persists_and_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path).unwrap();
        assert!(store.get().is_empty());

        store.set("tok-1", Role::Admin).unwrap();
        assert_eq!(store.get(), Session::new("tok-1", Role::Admin));

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok-1"));
        assert_eq!(reopened.get().role, Some(Role::Admin));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::open(&path)
            .unwrap()
            .set("secret", Role::User)
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_clear_removes_both_fields_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path).unwrap();
        store.set("tok", Role::StoreOwner).unwrap();

        store.clear().unwrap();

        assert!(store.get().is_empty());
        assert!(!path.exists());
        // Clearing an empty session is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();

        other.set("shared", Role::User).unwrap();

        assert_eq!(store.token().as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();

        store.set("t", Role::Admin).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().role, Some(Role::Admin));

        store.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path).unwrap();
        let rx = store.subscribe();

        assert!(!store.reload().unwrap());

        // Another process logs in.
        SessionStore::open(&path)
            .unwrap()
            .set("elsewhere", Role::User)
            .unwrap();

        assert!(store.reload().unwrap());
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.token().as_deref(), Some("elsewhere"));

        // And logs out again.
        fs::remove_file(&path).unwrap();
        assert!(store.reload().unwrap());
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_in_memory_reload_is_noop() {
        let store = SessionStore::in_memory();
        assert!(!store.reload().unwrap());
    }
}
