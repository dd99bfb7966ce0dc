use std::sync::Arc;

use labdash::api::{self, ApiClient, ApiError, NewDeployment, NewPod, ResourceSpec};
use labdash::models::{ContainerStatus, NewContainer};
use labdash::session::{FileSessionStore, StoredUser, TokenStore};
use mockito::Matcher;
use serde_json::{json, Value};

fn signed_in_store(dir: &tempfile::TempDir, token: &str) -> Arc<FileSessionStore> {
    let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
    store
        .save(StoredUser {
            username: "ana".into(),
            role: "STUDENT".into(),
            token: token.into(),
        })
        .unwrap();
    Arc::new(store)
}

fn client_for(server: &mockito::ServerGuard, store: Arc<FileSessionStore>) -> ApiClient {
    api::set_silent(true);
    ApiClient::new(reqwest::Client::new(), server.url(), store)
}

#[tokio::test]
async fn bearer_token_is_attached_and_list_is_decoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/containers/my-containers")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": 7, "name": "python-lab", "status": "RUNNING", "kubernetesPodName": "pod-7",
                 "user": {"id": 3, "username": "ana"}},
                {"id": 8, "name": "node-lab", "status": "stopped"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok-1"));
    let containers = api::containers::list_my_containers(&api).await.unwrap();

    mock.assert_async().await;
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].id, "7");
    assert!(containers[0].status.is_running());
    assert_eq!(containers[0].pod_display(), "pod-7");
    assert_eq!(containers[1].status, ContainerStatus::parse("STOPPED"));
}

#[tokio::test]
async fn unauthorized_clears_the_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/containers")
        .with_status(401)
        .with_body("expired")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = signed_in_store(&dir, "stale");
    let api = client_for(&server, store.clone());

    let err = api::containers::list_containers(&api).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "Authentication failed");
    assert!(store.token().is_none());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn error_body_becomes_the_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/containers/9")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Container not found"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/containers/9/start")
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = signed_in_store(&dir, "tok");
    let api = client_for(&server, store.clone());

    match api::containers::delete_container(&api, "9").await {
        Err(ApiError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Container not found");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let err = api::containers::start_container(&api, "9").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 500");
    // Only 401 ends the session.
    assert!(store.token().is_some());
}

#[tokio::test]
async fn text_and_empty_bodies_are_tolerated() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/containers/5/logs")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("line one\nline two")
        .create_async()
        .await;
    server
        .mock("POST", "/containers/5/stop")
        .with_status(204)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok"));

    let logs = api::containers::container_logs(&api, "5").await.unwrap();
    assert_eq!(logs, "line one\nline two");
    let stopped = api::containers::stop_container(&api, "5").await.unwrap();
    assert_eq!(stopped, Value::Null);
}

#[tokio::test]
async fn create_container_sends_template_and_student() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/containers")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"templateId": "12", "studentId": "40"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 99, "status": "CREATING"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok"));
    let request = NewContainer {
        template_id: "12".into(),
        student_id: Some("40".into()),
    };
    let created = api::containers::create_container(&api, &request).await.unwrap();
    mock.assert_async().await;
    assert_eq!(created["id"], 99);
}

#[tokio::test]
async fn login_returns_token_and_rejects_tokenless_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"username": "mr.smith", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "jwt-abc", "username": "mr.smith", "role": "ROLE_TEACHER"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"username": "ghost", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "ghost"}"#)
        .create_async()
        .await;

    api::set_silent(true);
    let anon = ApiClient::anonymous(reqwest::Client::new(), server.url());
    let resp = api::login(&anon, " mr.smith ", "pw").await.unwrap();
    assert_eq!(resp.token, "jwt-abc");
    let user = resp.into_stored_user("mr.smith");
    assert!(user.is_teacher());

    let err = api::login(&anon, "ghost", "pw").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn failed_login_keeps_the_saved_session() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = signed_in_store(&dir, "still-valid");
    let api = client_for(&server, store.clone());

    let err = api::login(&api.without_session(), "ana", "typo").await.unwrap_err();
    assert!(err.is_unauthorized());
    login.assert_async().await;
    assert_eq!(store.token().as_deref(), Some("still-valid"));
    assert!(store.path().exists());
}

#[tokio::test]
async fn kubernetes_writes_use_query_parameters() {
    let mut server = mockito::Server::new_async().await;
    let create_ns = server
        .mock("POST", "/kubernetes/namespaces")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "course-101".into()),
            Matcher::UrlEncoded("team".into(), "blue".into()),
        ]))
        .with_status(201)
        .create_async()
        .await;
    let scale = server
        .mock("PATCH", "/kubernetes/namespaces/course-101/deployments/web/scale")
        .match_query(Matcher::UrlEncoded("replicas".into(), "3".into()))
        .with_status(200)
        .create_async()
        .await;
    let pods = server
        .mock("GET", "/kubernetes/pods")
        .match_query(Matcher::UrlEncoded("allNamespaces".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{"metadata": {"name": "web-1", "namespace": "course-101"}, "status": {"phase": "Running"}}])
                .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok"));

    let labels = labdash::utils::parse_labels("team=blue,broken,=x");
    api::kubernetes::create_namespace(&api, "course-101", &labels).await.unwrap();
    api::kubernetes::scale_deployment(&api, "course-101", "web", 3).await.unwrap();
    let listed = api::kubernetes::list_all_pods(&api, true).await.unwrap();

    create_ns.assert_async().await;
    scale.assert_async().await;
    pods.assert_async().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "web-1");
    assert!(listed[0].is_running());
}

#[tokio::test]
async fn resource_settings_use_dashed_keys() {
    let mut server = mockito::Server::new_async().await;
    let update = server
        .mock("PUT", "/kubernetes/namespaces/course-101/pods/web-1/resources")
        .match_body(Matcher::Json(json!({"cpu-limit": "500m", "memory-limit": "256Mi"})))
        .with_status(200)
        .create_async()
        .await;
    let create_pod = server
        .mock("POST", "/kubernetes/namespaces/course-101/pods")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "web-2".into()),
            Matcher::UrlEncoded("image".into(), "nginx:1.27".into()),
            Matcher::UrlEncoded("cpu-request".into(), "250m".into()),
        ]))
        .with_status(201)
        .create_async()
        .await;
    let create_deployment = server
        .mock("POST", "/kubernetes/namespaces/course-101/deployments")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "web".into()),
            Matcher::UrlEncoded("replicas".into(), "1".into()),
            Matcher::UrlEncoded("memory-limit".into(), "1Gi".into()),
        ]))
        .with_status(201)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok"));

    let limits = ResourceSpec {
        cpu_limit: "500m".into(),
        memory_limit: " 256Mi ".into(),
        ..Default::default()
    };
    api::kubernetes::update_pod_resources(&api, "course-101", "web-1", &limits)
        .await
        .unwrap();

    let pod = NewPod {
        name: "web-2".into(),
        image: "nginx:1.27".into(),
        resources: ResourceSpec {
            cpu_request: "250m".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    api::kubernetes::create_pod(&api, "course-101", &pod).await.unwrap();

    let deployment = NewDeployment {
        name: "web".into(),
        image: "nginx:1.27".into(),
        replicas: 0,
        resources: ResourceSpec {
            memory_limit: "1Gi".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    api::kubernetes::create_deployment(&api, "course-101", &deployment)
        .await
        .unwrap();

    update.assert_async().await;
    create_pod.assert_async().await;
    create_deployment.assert_async().await;

    let err = api::kubernetes::update_pod_resources(&api, "course-101", "web-1", &ResourceSpec::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn invalid_workloads_are_rejected_before_sending() {
    let server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, signed_in_store(&dir, "tok"));

    let deployment = NewDeployment {
        name: "  ".into(),
        image: "nginx".into(),
        replicas: 1,
        ..Default::default()
    };
    let err = api::kubernetes::create_deployment(&api, "default", &deployment)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));

    let err = api::kubernetes::create_namespace(&api, "", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}
