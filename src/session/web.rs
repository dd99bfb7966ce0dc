use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{StoredUser, TokenStore};

/// Lifetime of a dashboard session; the cookie carries the same max-age.
pub const WEB_SESSION_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// One signed-in browser.
#[derive(Clone, Debug)]
pub struct SessionEntry {
    pub user: StoredUser,
    pub signed_in_at: Instant,
}

impl SessionEntry {
    pub fn new(user: StoredUser) -> Self {
        Self {
            user,
            signed_in_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.signed_in_at.elapsed() >= max_age
    }
}

/// Browser sessions keyed by the `session_id` cookie.
pub type SessionMap = Arc<Mutex<HashMap<String, SessionEntry>>>;

/// Handle on one browser session inside the shared session map.
pub struct WebSession {
    sessions: SessionMap,
    sid: String,
}

impl WebSession {
    pub fn new(sessions: SessionMap, sid: String) -> Self {
        Self { sessions, sid }
    }
}

impl TokenStore for WebSession {
    fn token(&self) -> Option<String> {
        self.sessions
            .lock()
            .unwrap()
            .get(&self.sid)
            .filter(|e| e.user.has_token())
            .map(|e| e.user.token.clone())
    }

    fn forget(&self) {
        if self.sessions.lock().unwrap().remove(&self.sid).is_some() {
            tracing::info!("Session ended after authentication failure");
        }
    }
}

pub fn random_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
