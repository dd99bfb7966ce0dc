use labdash::session::{FileSessionStore, StoredUser, TokenStore};
use std::fs;

fn teacher() -> StoredUser {
    StoredUser {
        username: "mr.smith".into(),
        role: "ROLE_TEACHER".into(),
        token: "tok-123".into(),
    }
}

#[test]
fn missing_file_means_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
    assert!(store.current().is_none());
    assert!(store.token().is_none());
}

#[test]
fn save_then_reopen_restores_user() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let store = FileSessionStore::open(&path).unwrap();
    store.save(teacher()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["user"]["username"], "mr.smith");
    assert_eq!(raw["user"]["token"], "tok-123");
    assert!(raw.get("authToken").is_none());

    let reopened = FileSessionStore::open(&path).unwrap();
    assert_eq!(reopened.current(), Some(teacher()));
    assert!(reopened.current().unwrap().is_teacher());
    assert_eq!(reopened.token().as_deref(), Some("tok-123"));
}

#[test]
fn legacy_auth_token_fills_missing_user_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        r#"{"user": {"username": "ana", "role": "STUDENT"}, "authToken": "legacy-tok"}"#,
    )
    .unwrap();

    let store = FileSessionStore::open(&path).unwrap();
    let user = store.current().unwrap();
    assert_eq!(user.token, "legacy-tok");
    assert!(user.is_student());

    // The next save writes the token inside the user record only.
    store.save(user).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["user"]["token"], "legacy-tok");
    assert!(raw.get("authToken").is_none());
}

#[test]
fn user_token_wins_over_legacy_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        r#"{"user": {"username": "ana", "role": "STUDENT", "token": "new"}, "authToken": "old"}"#,
    )
    .unwrap();
    let store = FileSessionStore::open(&path).unwrap();
    assert_eq!(store.token().as_deref(), Some("new"));
}

#[test]
fn corrupt_file_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{not json").unwrap();

    let store = FileSessionStore::open(&path).unwrap();
    assert!(store.current().is_none());
    assert!(!path.exists());
}

#[test]
fn forget_removes_file_and_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileSessionStore::open(&path).unwrap();
    store.save(teacher()).unwrap();
    assert!(path.exists());

    store.forget();
    assert!(store.token().is_none());
    assert!(!path.exists());

    // Clearing twice is harmless.
    store.clear_session().unwrap();
}
