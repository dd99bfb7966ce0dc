use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::ApiClient;
use crate::models::Flash;
use crate::session::{random_session_id, SessionEntry, SessionMap, StoredUser, WebSession, WEB_SESSION_MAX_AGE};

#[derive(Clone)]
pub struct AppState {
    /// Signed-in browser sessions keyed by the `session_id` cookie.
    pub sessions: SessionMap,
    /// Sessions older than this count as signed out.
    pub session_max_age: Duration,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<Flash>>>>,
    pub api_base_url: String,
    pub public_base_url: String,
    pub client: reqwest::Client,
    pub refresh_interval: Duration,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            session_max_age: WEB_SESSION_MAX_AGE,
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            api_base_url,
            public_base_url: String::new(),
            client,
            refresh_interval: Duration::from_secs(crate::config::DEFAULT_REFRESH_INTERVAL_SECS),
            custom_css: None,
        }
    }

    /// The user behind `sid`. An expired entry is removed and reads as
    /// signed out.
    pub fn session_user(&self, sid: &str) -> Option<StoredUser> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(sid) {
            Some(entry) if entry.is_expired(self.session_max_age) => {
                sessions.remove(sid);
                tracing::info!("Session expired");
                None
            }
            Some(entry) => Some(entry.user.clone()),
            None => None,
        }
    }

    /// Stores a new session under a fresh id, dropping expired ones first.
    pub fn start_session(&self, user: StoredUser) -> String {
        let sid = random_session_id();
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.session_max_age));
        if sessions.len() < before {
            tracing::debug!(removed = before - sessions.len(), "Swept expired sessions");
        }
        sessions.insert(sid.clone(), SessionEntry::new(user));
        sid
    }

    pub fn end_session(&self, sid: &str) -> Option<StoredUser> {
        self.flash_store.lock().unwrap().remove(sid);
        self.sessions.lock().unwrap().remove(sid).map(|e| e.user)
    }

    /// API client bound to one browser session; a 401 ends that session.
    pub fn api_for(&self, sid: &str) -> ApiClient {
        let store = WebSession::new(self.sessions.clone(), sid.to_string());
        ApiClient::new(self.client.clone(), self.api_base_url.clone(), Arc::new(store))
    }

    /// Client without a session, used for the login call.
    pub fn anonymous_api(&self) -> ApiClient {
        ApiClient::anonymous(self.client.clone(), self.api_base_url.clone())
    }

    pub fn push_flash(&self, sid: &str, flash: Flash) {
        let mut store = self.flash_store.lock().unwrap();
        store.entry(sid.to_string()).or_default().push(flash);
    }

    pub fn take_flashes(&self, sid: &str) -> Vec<Flash> {
        self.flash_store.lock().unwrap().remove(sid).unwrap_or_default()
    }
}
