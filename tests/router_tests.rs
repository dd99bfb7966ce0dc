use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use labdash::models::{AppState, Flash, FlashLevel};
use labdash::session::{SessionEntry, StoredUser};
use serde_json::json;
use tower::ServiceExt;

const SID: &str = "test-session";

fn setup(server: &mockito::ServerGuard) -> (Router, AppState) {
    labdash::api::set_silent(true);
    let state = AppState::new(reqwest::Client::new(), server.url());
    (labdash::build_app(state.clone()), state)
}

fn sign_in(state: &AppState, role: &str) -> String {
    state.sessions.lock().unwrap().insert(
        SID.to_string(),
        SessionEntry::new(StoredUser {
            username: "tester".into(),
            role: role.into(),
            token: "tok".into(),
        }),
    );
    format!("session_id={}", SID)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn flashes(state: &AppState) -> Vec<Flash> {
    state.flash_store.lock().unwrap().get(SID).cloned().unwrap_or_default()
}

#[tokio::test]
async fn unauthenticated_navigation_redirects_to_login_with_next() {
    let server = mockito::Server::new_async().await;
    let (app, _) = setup(&server);

    let resp = app.oneshot(get("/containers?tab=mine", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fcontainers%3Ftab%3Dmine");
}

#[tokio::test]
async fn valid_login_stores_session_and_returns_to_target() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"token": "jwt-1", "username": "ana", "role": "ROLE_STUDENT"}).to_string())
        .create_async()
        .await;
    let (app, state) = setup(&server);

    let resp = app
        .oneshot(post_form("/login", None, "username=ana&password=pw&next=%2Fcontainers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/containers");
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("session_id="));
    assert!(cookie.contains("HttpOnly"));

    let sessions = state.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    let user = &sessions.values().next().unwrap().user;
    assert_eq!(user.token, "jwt-1");
    assert!(user.is_student());
}

#[tokio::test]
async fn invalid_login_shows_error_and_stores_nothing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body("Bad credentials")
        .create_async()
        .await;
    let (app, state) = setup(&server);

    let resp = app
        .oneshot(post_form("/login", None, "username=ana&password=wrong&next=%2Fdashboard"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body = body_text(resp).await;
    assert!(body.contains("Invalid username or password"));
    assert!(state.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_credentials_never_reach_the_backend() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/auth/login").expect(0).create_async().await;
    let (app, _) = setup(&server);

    let resp = app
        .oneshot(post_form("/login", None, "username=&password="))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Username and password are required"));
    mock.assert_async().await;
}

#[tokio::test]
async fn students_are_turned_away_from_staff_pages() {
    let server = mockito::Server::new_async().await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "STUDENT");

    for path in ["/kubernetes", "/templates", "/images", "/users"] {
        let resp = app.clone().oneshot(get(path, Some(&cookie))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&resp), "/dashboard", "{}", path);
    }
    let notes = flashes(&state);
    assert_eq!(notes.len(), 4);
    assert!(notes
        .iter()
        .all(|f| f.level == FlashLevel::Error && f.message == "Access denied. Teachers only."));
}

#[tokio::test]
async fn teachers_see_kubernetes_and_templates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/kubernetes/namespaces")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!(["default", "course-101"]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/kubernetes/namespaces/default/pods")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"name": "web-1", "namespace": "default", "status": "Running"}]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/kubernetes/namespaces/default/deployments")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/container-templates")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"id": 1, "name": "python-lab", "dockerImage": "python:3.12"}]).to_string())
        .create_async()
        .await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "ROLE_TEACHER");

    let resp = app.clone().oneshot(get("/kubernetes", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("course-101"));
    assert!(body.contains("web-1"));

    let resp = app.oneshot(get("/templates", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("python-lab"));
}

#[tokio::test]
async fn new_template_form_defaults_to_shared() {
    let server = mockito::Server::new_async().await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "TEACHER");

    let resp = app.oneshot(get("/templates/new", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(r#"name="shared" checked"#));
    assert!(!body.contains(r#"name="ssh_enabled" checked"#));
}

#[tokio::test]
async fn image_form_offers_builder_versions() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/images")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/images/technologies")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!(["python"]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/images/technology-versions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"python": ["3.11", "3.12"]}).to_string())
        .create_async()
        .await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "TEACHER");

    let resp = app.oneshot(get("/images", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("python 3.11"));
    assert!(body.contains("python 3.12"));
}

#[tokio::test]
async fn teachers_cannot_manage_users() {
    let mut server = mockito::Server::new_async().await;
    let create = server.mock("POST", "/users").expect(0).create_async().await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "TEACHER");

    let resp = app
        .oneshot(post_form("/users/new", Some(&cookie), "username=x&password=y&role=ADMIN"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    assert_eq!(flashes(&state)[0].message, "Access denied. Administrators only.");
    create.assert_async().await;
}

#[tokio::test]
async fn admins_cannot_assign_unknown_roles() {
    let mut server = mockito::Server::new_async().await;
    let update = server.mock("PUT", "/users/5").expect(0).create_async().await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "ADMIN");

    let resp = app
        .oneshot(post_form("/users/5/update", Some(&cookie), "email=&password=&role=WIZARD"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/users");
    let notes = flashes(&state);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Unknown role: WIZARD");
    update.assert_async().await;
}

#[tokio::test]
async fn failed_primary_fetch_still_renders_with_banner() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/container-templates")
        .with_status(500)
        .with_body("database unavailable")
        .create_async()
        .await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "TEACHER");

    let resp = app.oneshot(get("/templates", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Failed to load templates: database unavailable"));
    assert!(body.contains("No templates found."));
}

#[tokio::test]
async fn unauthorized_page_load_ends_the_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/containers/my-containers")
        .with_status(401)
        .create_async()
        .await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "STUDENT");

    let resp = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fdashboard");
    assert!(state.sessions.lock().unwrap().is_empty());

    // The login page must not bounce straight back to the dashboard.
    let resp = labdash::build_app(state.clone())
        .oneshot(get("/login?next=%2Fdashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Your session has expired"));
}

#[tokio::test]
async fn expired_sessions_read_as_signed_out() {
    let server = mockito::Server::new_async().await;
    let (_, mut state) = setup(&server);
    let cookie = sign_in(&state, "STUDENT");
    state.session_max_age = std::time::Duration::ZERO;
    let app = labdash::build_app(state.clone());

    let resp = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fdashboard");
    assert!(state.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn login_sweeps_expired_sessions() {
    let server = mockito::Server::new_async().await;
    let (_, mut state) = setup(&server);
    sign_in(&state, "STUDENT");
    state.session_max_age = std::time::Duration::ZERO;
    let sid = state.start_session(StoredUser {
        username: "ana".into(),
        role: "STUDENT".into(),
        token: "jwt-2".into(),
    });

    let sessions = state.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions.contains_key(&sid));
    assert!(!sessions.contains_key(SID));
}

#[tokio::test]
async fn deleting_a_container_twice_reports_the_second_failure() {
    let mut server = mockito::Server::new_async().await;
    let listed = server
        .mock("GET", "/containers/my-containers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"id": 5, "name": "python-lab", "status": "RUNNING"}]).to_string())
        .create_async()
        .await;
    let deleted = server
        .mock("DELETE", "/containers/5")
        .with_status(204)
        .create_async()
        .await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "STUDENT");

    let body = body_text(app.clone().oneshot(get("/containers", Some(&cookie))).await.unwrap()).await;
    assert!(body.contains("python-lab"));

    let resp = app
        .clone()
        .oneshot(post_form("/containers/5/delete", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/containers");

    listed.remove_async().await;
    server
        .mock("GET", "/containers/my-containers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let body = body_text(app.clone().oneshot(get("/containers", Some(&cookie))).await.unwrap()).await;
    assert!(!body.contains("python-lab"));
    assert!(body.contains("Container deleted successfully"));

    deleted.remove_async().await;
    server
        .mock("DELETE", "/containers/5")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Container not found"}"#)
        .create_async()
        .await;
    let resp = app
        .oneshot(post_form("/containers/5/delete", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let notes = flashes(&state);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, FlashLevel::Error);
    assert_eq!(notes[0].message, "Failed to delete container: Container not found");
    // The session survives an ordinary failure.
    assert_eq!(state.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn logout_forgets_the_session() {
    let server = mockito::Server::new_async().await;
    let (app, state) = setup(&server);
    let cookie = sign_in(&state, "STUDENT");

    let resp = app.oneshot(post_form("/logout", Some(&cookie), "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(state.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_paths_render_not_found() {
    let server = mockito::Server::new_async().await;
    let (app, _) = setup(&server);

    let resp = app.clone().oneshot(get("/no/such/page", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Page not found"));

    let resp = app.oneshot(get("/static/styles.css", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/css"));
}
