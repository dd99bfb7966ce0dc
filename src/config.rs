use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "";
pub const DEFAULT_SESSION_DIR: &str = ".labdash";
pub const DEFAULT_SESSION_FILE_NAME: &str = "session.json";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_public_base_url() -> String {
    let raw = env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());
    raw.trim().trim_end_matches('/').to_string()
}

/// Location of the CLI session file. `SESSION_FILE` wins, then `$HOME/.labdash/session.json`,
/// then a relative `.labdash/session.json`.
pub fn get_session_file() -> PathBuf {
    if let Ok(path) = env::var("SESSION_FILE") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    let base = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    base.join(DEFAULT_SESSION_DIR).join(DEFAULT_SESSION_FILE_NAME)
}

pub fn get_refresh_interval() -> Duration {
    let secs = env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
    Duration::from_secs(secs)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
