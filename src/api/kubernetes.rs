//! Kubernetes console endpoints. The backend takes creation parameters as
//! query parameters rather than JSON bodies.

use serde_json::Value;

use super::client::{list_items, seg, ApiClient};
use super::error::ApiError;
use crate::models::{DeploymentView, NamespaceView, PodView};

/// Optional resource settings for pods and deployments, e.g. `500m` / `256Mi`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceSpec {
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub memory_request: String,
}

impl ResourceSpec {
    /// Non-empty settings under the keys the backend reads, e.g. `cpu-limit`.
    fn entries(&self) -> Vec<(&'static str, String)> {
        [
            ("cpu-limit", &self.cpu_limit),
            ("memory-limit", &self.memory_limit),
            ("cpu-request", &self.cpu_request),
            ("memory-request", &self.memory_request),
        ]
        .into_iter()
        .map(|(key, value)| (key, value.trim().to_string()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    fn push_params(&self, params: &mut Vec<(String, String)>) {
        params.extend(self.entries().into_iter().map(|(k, v)| (k.to_string(), v)));
    }

    fn to_body(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        [&self.cpu_limit, &self.memory_limit, &self.cpu_request, &self.memory_request]
            .iter()
            .all(|v| v.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewPod {
    pub name: String,
    pub image: String,
    pub labels: Vec<(String, String)>,
    pub resources: ResourceSpec,
}

#[derive(Clone, Debug, Default)]
pub struct NewDeployment {
    pub name: String,
    pub image: String,
    pub replicas: u32,
    pub labels: Vec<(String, String)>,
    pub resources: ResourceSpec,
}

fn require_name_and_image(name: &str, image: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() || image.trim().is_empty() {
        return Err(ApiError::Invalid("Name and image are required".into()));
    }
    Ok(())
}

fn pods_from(value: Value) -> Result<Vec<PodView>, ApiError> {
    Ok(list_items(value)?.iter().map(PodView::from_value).collect())
}

fn deployments_from(value: Value) -> Result<Vec<DeploymentView>, ApiError> {
    Ok(list_items(value)?.iter().map(DeploymentView::from_value).collect())
}

pub async fn list_all_pods(api: &ApiClient, all_namespaces: bool) -> Result<Vec<PodView>, ApiError> {
    let params = vec![("allNamespaces".to_string(), all_namespaces.to_string())];
    let value = api.request("GET", "/kubernetes/pods", None, Some(params)).await?;
    pods_from(value)
}

pub async fn list_pods(api: &ApiClient, namespace: &str) -> Result<Vec<PodView>, ApiError> {
    let value = api
        .get(&format!("/kubernetes/namespaces/{}/pods", seg(namespace)))
        .await?;
    pods_from(value)
}

pub async fn get_pod(api: &ApiClient, namespace: &str, name: &str) -> Result<PodView, ApiError> {
    let value = api
        .get(&format!("/kubernetes/namespaces/{}/pods/{}", seg(namespace), seg(name)))
        .await?;
    Ok(PodView::from_value(&value))
}

pub async fn create_pod(api: &ApiClient, namespace: &str, pod: &NewPod) -> Result<Value, ApiError> {
    require_name_and_image(&pod.name, &pod.image)?;
    let mut params = vec![
        ("name".to_string(), pod.name.trim().to_string()),
        ("image".to_string(), pod.image.trim().to_string()),
    ];
    params.extend(pod.labels.iter().cloned());
    pod.resources.push_params(&mut params);
    api.request(
        "POST",
        &format!("/kubernetes/namespaces/{}/pods", seg(namespace)),
        None,
        Some(params),
    )
    .await
}

pub async fn delete_pod(api: &ApiClient, namespace: &str, name: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/kubernetes/namespaces/{}/pods/{}", seg(namespace), seg(name)))
        .await
}

pub async fn update_pod_resources(
    api: &ApiClient,
    namespace: &str,
    name: &str,
    resources: &ResourceSpec,
) -> Result<Value, ApiError> {
    if resources.is_empty() {
        return Err(ApiError::Invalid("Enter at least one resource value".into()));
    }
    api.put(
        &format!("/kubernetes/namespaces/{}/pods/{}/resources", seg(namespace), seg(name)),
        resources.to_body(),
    )
    .await
}

pub async fn list_all_deployments(api: &ApiClient, all_namespaces: bool) -> Result<Vec<DeploymentView>, ApiError> {
    let params = vec![("allNamespaces".to_string(), all_namespaces.to_string())];
    let value = api
        .request("GET", "/kubernetes/deployments", None, Some(params))
        .await?;
    deployments_from(value)
}

pub async fn list_deployments(api: &ApiClient, namespace: &str) -> Result<Vec<DeploymentView>, ApiError> {
    let value = api
        .get(&format!("/kubernetes/namespaces/{}/deployments", seg(namespace)))
        .await?;
    deployments_from(value)
}

pub async fn create_deployment(api: &ApiClient, namespace: &str, deployment: &NewDeployment) -> Result<Value, ApiError> {
    require_name_and_image(&deployment.name, &deployment.image)?;
    let mut params = vec![
        ("name".to_string(), deployment.name.trim().to_string()),
        ("image".to_string(), deployment.image.trim().to_string()),
        ("replicas".to_string(), deployment.replicas.max(1).to_string()),
    ];
    params.extend(deployment.labels.iter().cloned());
    deployment.resources.push_params(&mut params);
    api.request(
        "POST",
        &format!("/kubernetes/namespaces/{}/deployments", seg(namespace)),
        None,
        Some(params),
    )
    .await
}

pub async fn delete_deployment(api: &ApiClient, namespace: &str, name: &str) -> Result<Value, ApiError> {
    api.delete(&format!(
        "/kubernetes/namespaces/{}/deployments/{}",
        seg(namespace),
        seg(name)
    ))
    .await
}

pub async fn scale_deployment(api: &ApiClient, namespace: &str, name: &str, replicas: u32) -> Result<Value, ApiError> {
    let params = vec![("replicas".to_string(), replicas.to_string())];
    api.request(
        "PATCH",
        &format!("/kubernetes/namespaces/{}/deployments/{}/scale", seg(namespace), seg(name)),
        None,
        Some(params),
    )
    .await
}

pub async fn update_deployment_image(api: &ApiClient, namespace: &str, name: &str, image: &str) -> Result<Value, ApiError> {
    let params = vec![("image".to_string(), image.trim().to_string())];
    api.request(
        "PATCH",
        &format!("/kubernetes/namespaces/{}/deployments/{}/image", seg(namespace), seg(name)),
        None,
        Some(params),
    )
    .await
}

pub async fn list_namespaces(api: &ApiClient) -> Result<Vec<NamespaceView>, ApiError> {
    let value = api.get("/kubernetes/namespaces").await?;
    Ok(list_items(value)?.iter().map(NamespaceView::from_value).collect())
}

pub async fn create_namespace(api: &ApiClient, name: &str, labels: &[(String, String)]) -> Result<Value, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Invalid("Namespace name is required".into()));
    }
    let mut params = vec![("name".to_string(), name.trim().to_string())];
    params.extend(labels.iter().cloned());
    api.request("POST", "/kubernetes/namespaces", None, Some(params))
        .await
}

pub async fn delete_namespace(api: &ApiClient, name: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/kubernetes/namespaces/{}", seg(name))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_non_empty_resources_become_params() {
        let spec = ResourceSpec {
            cpu_limit: "500m".into(),
            memory_request: " ".into(),
            ..Default::default()
        };
        let mut params = Vec::new();
        spec.push_params(&mut params);
        assert_eq!(params, vec![("cpu-limit".to_string(), "500m".to_string())]);
        assert!(!spec.is_empty());
        assert!(ResourceSpec::default().is_empty());
        assert_eq!(spec.to_body(), json!({"cpu-limit": "500m"}));
    }
}
