//! Persisted login session and the events emitted when it changes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nursery_api_models::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Route the operator is sent to once a session expires.
pub const LOGIN_PATH: &str = "/login";

/// Bearer token plus the operator it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to every request.
    pub token: String,
    /// Authenticated operator.
    pub user: User,
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded.
    SignedIn {
        /// Operator id.
        user_id: String,
    },
    /// The operator logged out.
    SignedOut,
    /// The backend rejected the token; the session has been cleared.
    Expired,
    /// Follows [`SessionEvent::Expired`] after a short delay.
    RedirectToLogin {
        /// Target route.
        path: String,
    },
}

/// Errors raised by session stores.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Filesystem access failed.
    #[error("failed to {operation} session file {}", path.display())]
    Io {
        /// What was being attempted.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The session file exists but is not a valid session.
    #[error("session file {} is corrupt", path.display())]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Storage backend for the current session.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn load(&self) -> SessionResult<Option<Session>>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn save(&self, session: &Session) -> SessionResult<()>;

    /// Remove the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be modified.
    fn clear(&self) -> SessionResult<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `session`.
    #[must_use]
    pub const fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        self.slot().take();
        Ok(())
    }
}

/// JSON file store. Writes go to a sibling temp file that is then renamed
/// over the target.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store backed by `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str, source: io::Error) -> SessionError {
        SessionError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", err)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error("create directory for", err))?;
        }
        let encoded = serde_json::to_vec_pretty(session)
            .map_err(|err| self.io_error("encode", io::Error::other(err)))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| self.io_error("write", err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error("replace", err))
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}
