//! Session state: who is signed in, with which role and bearer token.
//!
//! The CLI persists the session to a file ([`FileSessionStore`]); the web
//! dashboard keeps one session per browser cookie ([`WebSession`]). Both
//! hand their token to the API client through [`TokenStore`].

mod file_store;
mod web;

pub use file_store::FileSessionStore;
pub use web::{random_session_id, SessionEntry, SessionMap, WebSession, WEB_SESSION_MAX_AGE};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{CurrentUser, Role};

/// Source of the bearer token for outgoing API calls.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;

    /// Drop the stored session, called when the backend answers 401.
    fn forget(&self);
}

/// Store that never has a token; used before login.
pub struct NoSession;

impl TokenStore for NoSession {
    fn token(&self) -> Option<String> {
        None
    }

    fn forget(&self) {}
}

/// The persisted session record: username, role and token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub token: String,
}

impl StoredUser {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn is_teacher(&self) -> bool {
        self.role().is_teacher()
    }

    pub fn is_student(&self) -> bool {
        self.role().is_student()
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            username: self.username.clone(),
            role: self.role(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}
