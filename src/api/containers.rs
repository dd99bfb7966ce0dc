use serde_json::Value;

use super::client::{decode, seg, ApiClient};
use super::error::ApiError;
use crate::models::{ContainerInstance, NewContainer, SshInfo};

/// Every container the caller may see; staff get all students' containers.
pub async fn list_containers(api: &ApiClient) -> Result<Vec<ContainerInstance>, ApiError> {
    api.get_list("/containers").await
}

pub async fn list_my_containers(api: &ApiClient) -> Result<Vec<ContainerInstance>, ApiError> {
    api.get_list("/containers/my-containers").await
}

pub async fn create_container(api: &ApiClient, request: &NewContainer) -> Result<Value, ApiError> {
    let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
    api.post("/containers", Some(body)).await
}

pub async fn start_container(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.post(&format!("/containers/{}/start", seg(id)), None).await
}

pub async fn stop_container(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.post(&format!("/containers/{}/stop", seg(id)), None).await
}

pub async fn restart_container(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.post(&format!("/containers/{}/restart", seg(id)), None).await
}

pub async fn delete_container(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/containers/{}", seg(id))).await
}

pub async fn container_ssh_info(api: &ApiClient, id: &str) -> Result<SshInfo, ApiError> {
    let value = api.get(&format!("/containers/{}/ssh-info", seg(id))).await?;
    decode(value)
}

/// Log output as plain text; JSON `{ "logs": ... }` wrappers are unwrapped.
pub async fn container_logs(api: &ApiClient, id: &str) -> Result<String, ApiError> {
    let value = api.get(&format!("/containers/{}/logs", seg(id))).await?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Object(ref obj) => match obj.get("logs").or_else(|| obj.get("log")) {
            Some(Value::String(s)) => s.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    })
}

/// Asks the backend to resync statuses from Kubernetes. Failures are only
/// logged: the following list fetch still shows the last known state.
pub async fn refresh_container_statuses(api: &ApiClient) {
    if let Err(e) = api.post("/containers/refresh-status", None).await {
        tracing::warn!(error = %e, "Container status refresh failed");
    }
}
