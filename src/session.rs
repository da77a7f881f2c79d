use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SESSION_FILE: &str = "admin_session.json";

/// Explicitly passed admin session. There is no ambient auth state:
/// whoever makes authenticated calls gets handed one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub token: String,
    pub admin_email: String,
    pub is_admin: bool,
}

/// File-backed persistence for the session context between CLI runs,
/// standing in for the browser's local storage.
pub struct SessionStore {
    root: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn path(&self) -> Option<PathBuf> {
        self.root.as_deref().map(|r| r.join(SESSION_FILE))
    }

    pub fn load(&self) -> Option<SessionContext> {
        let path = self.path()?;
        let raw = fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, session: &SessionContext) -> Result<()> {
        let path = self
            .path()
            .context("no local storage directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tbf-poll-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn save_load_clear_round_trip() {
        let dir = scratch_dir();
        let store = SessionStore::new(Some(dir.clone()));
        assert!(store.load().is_none());

        let session = SessionContext {
            token: "tok".into(),
            admin_email: "admin@tbf.app".into(),
            is_admin: true,
        };
        store.save(&session).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.admin_email, "admin@tbf.app");

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap(); // idempotent
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn no_storage_directory_degrades_quietly() {
        let store = SessionStore::new(None);
        assert!(store.load().is_none());
        assert!(store.clear().is_ok());
        assert!(store
            .save(&SessionContext {
                token: "t".into(),
                admin_email: "a".into(),
                is_admin: false,
            })
            .is_err());
    }
}
