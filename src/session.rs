//! Persistent merchant session and the process-wide context that owns it.
//!
//! The token and user returned by login are written to `session.json` in the
//! session directory. A [`SessionContext`] is created once per client and
//! shared with every view; it is the only place the session is read from,
//! and it is invalidated on logout or when the backend answers 401.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::config;
use crate::error::Result;
use crate::models::Session;

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Local storage for the session.
pub struct SessionStore {
    /// Directory holding `session.json`; `None` keeps the session in memory.
    pub dir: Option<PathBuf>,
}

impl SessionStore {
    /// File-backed store. Creates the directory if it does not exist.
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_session_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir: Some(dir) })
    }

    pub fn in_memory() -> Self {
        Self { dir: None }
    }

    fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(config::SESSION_FILE))
    }

    /// Read the stored session.
    ///
    /// A corrupt file is removed and treated as signed out.
    pub fn load(&self) -> Result<Option<Session>> {
        let Some(path) = self.path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt session file, removing");
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Write through a temp file in the same directory and rename, so a crash
    /// never leaves a half-written session behind.
    pub fn save(&self, session: &Session) -> Result<()> {
        let (Some(dir), Some(path)) = (self.dir.as_ref(), self.path()) else {
            return Ok(());
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(path) = self.path() {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Shared, cloneable handle on the current session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: SessionStore,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Restore whatever session the store holds.
    pub fn restore(store: SessionStore) -> Result<Self> {
        let current = store.load()?;
        if let Some(s) = &current {
            info!(user = %s.user.username, "restored merchant session");
        }
        Ok(Self {
            inner: Arc::new(SessionInner {
                store,
                current: RwLock::new(current),
            }),
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .ok()
            .and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn shop_id(&self) -> Option<i64> {
        self.current().and_then(|s| s.user.shop_id)
    }

    /// Persist a freshly issued session and make it current.
    pub fn establish(&self, session: Session) -> Result<()> {
        self.inner.store.save(&session)?;
        info!(user = %session.user.username, "merchant session established");
        if let Ok(mut guard) = self.inner.current.write() {
            *guard = Some(session);
        }
        Ok(())
    }

    /// Drop the session everywhere. Idempotent.
    pub fn invalidate(&self) {
        let had_session = match self.inner.current.write() {
            Ok(mut guard) => guard.take().is_some(),
            Err(_) => false,
        };
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
        if had_session {
            info!("merchant session invalidated");
        }
    }
}
