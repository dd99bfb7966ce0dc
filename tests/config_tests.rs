use labdash::config;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

// Env vars are process-wide; tests that touch them take this lock.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://lab.example.edu/api/"),
        "https://lab.example.edu/api"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("https://lab.example.edu/api///"),
        "https://lab.example.edu/api"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  https://lab.example.edu/api/  "),
        "https://lab.example.edu/api"
    );
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), config::DEFAULT_API_BASE_URL);
    assert_eq!(config::sanitize_base_url("   "), config::DEFAULT_API_BASE_URL);
}

#[test]
fn test_get_api_base_url_with_trailing_slash() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("API_BASE_URL", "https://lab.example.edu/api/");
    let result = config::get_api_base_url();
    env::remove_var("API_BASE_URL");
    assert_eq!(result, "https://lab.example.edu/api");
}

#[test]
fn test_get_api_base_url_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("API_BASE_URL");
    assert_eq!(config::get_api_base_url(), "http://localhost:8080/api");
}

#[test]
fn test_refresh_interval_defaults_to_thirty_seconds() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("REFRESH_INTERVAL_SECS");
    assert_eq!(config::get_refresh_interval(), Duration::from_secs(30));

    env::set_var("REFRESH_INTERVAL_SECS", "5");
    assert_eq!(config::get_refresh_interval(), Duration::from_secs(5));

    // Zero and garbage fall back to the default.
    env::set_var("REFRESH_INTERVAL_SECS", "0");
    assert_eq!(config::get_refresh_interval(), Duration::from_secs(30));
    env::set_var("REFRESH_INTERVAL_SECS", "soon");
    assert_eq!(config::get_refresh_interval(), Duration::from_secs(30));
    env::remove_var("REFRESH_INTERVAL_SECS");
}

#[test]
fn test_session_file_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("SESSION_FILE", "/tmp/labdash-test/session.json");
    let path = config::get_session_file();
    env::remove_var("SESSION_FILE");
    assert_eq!(path, PathBuf::from("/tmp/labdash-test/session.json"));

    let default = config::get_session_file();
    assert!(default.ends_with(".labdash/session.json"));
}

#[test]
fn test_public_base_url_trims_trailing_slash() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("PUBLIC_BASE_URL", "https://dash.example.edu/");
    let result = config::get_public_base_url();
    env::remove_var("PUBLIC_BASE_URL");
    assert_eq!(result, "https://dash.example.edu");
}
