use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{SessionError, StoredUser, TokenStore};

/// On-disk layout. `authToken` is the legacy stand-alone token key: it is
/// read to fill a missing `user.token` and never written back.
#[derive(Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<StoredUser>,
    #[serde(rename = "authToken", default, skip_serializing)]
    auth_token: Option<String>,
}

/// File-backed session for the command-line client.
pub struct FileSessionStore {
    path: PathBuf,
    current: Mutex<Option<StoredUser>>,
}

impl FileSessionStore {
    /// Opens the session file. A missing file means signed out; an
    /// unreadable one is discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<SessionFile>(&raw) {
                Ok(file) => restore(file),
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Discarding unreadable session file");
                    remove_if_exists(&path)?;
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<StoredUser> {
        self.current.lock().unwrap().clone()
    }

    pub fn save(&self, user: StoredUser) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = SessionFile {
            user: Some(user.clone()),
            auth_token: None,
        };
        let raw = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, raw).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        *self.current.lock().unwrap() = Some(user);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), SessionError> {
        *self.current.lock().unwrap() = None;
        remove_if_exists(&self.path)
    }
}

impl TokenStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.current().filter(|u| u.has_token()).map(|u| u.token)
    }

    fn forget(&self) {
        if let Err(e) = self.clear_session() {
            tracing::warn!(%e, "Failed to clear session file");
        }
    }
}

fn restore(file: SessionFile) -> Option<StoredUser> {
    let mut user = file.user?;
    if !user.has_token() {
        if let Some(legacy) = file.auth_token.filter(|t| !t.trim().is_empty()) {
            user.token = legacy;
        }
    }
    Some(user)
}

fn remove_if_exists(path: &Path) -> Result<(), SessionError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SessionError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
