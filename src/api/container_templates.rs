use serde_json::Value;

use super::client::{seg, ApiClient};
use super::error::ApiError;
use crate::models::{ContainerTemplate, ContainerTemplatePayload};

fn to_body(payload: &ContainerTemplatePayload) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

pub async fn list_templates(api: &ApiClient) -> Result<Vec<ContainerTemplate>, ApiError> {
    api.get_list("/container-templates").await
}

pub async fn list_my_templates(api: &ApiClient) -> Result<Vec<ContainerTemplate>, ApiError> {
    api.get_list("/container-templates/my-templates").await
}

pub async fn list_ssh_enabled_templates(api: &ApiClient) -> Result<Vec<ContainerTemplate>, ApiError> {
    api.get_list("/container-templates/ssh-enabled").await
}

pub async fn list_example_templates(api: &ApiClient) -> Result<Vec<ContainerTemplate>, ApiError> {
    api.get_list("/container-templates/examples").await
}

pub async fn list_templates_by_category(api: &ApiClient, category: &str) -> Result<Vec<ContainerTemplate>, ApiError> {
    api.get_list(&format!("/container-templates/category/{}", seg(category)))
        .await
}

pub async fn search_templates(api: &ApiClient, name: &str) -> Result<Vec<ContainerTemplate>, ApiError> {
    let params = vec![("name".to_string(), name.trim().to_string())];
    let value = api
        .request("GET", "/container-templates/search", None, Some(params))
        .await?;
    super::client::decode_list(value)
}

pub async fn create_template(api: &ApiClient, payload: &ContainerTemplatePayload) -> Result<Value, ApiError> {
    api.post("/container-templates", Some(to_body(payload)?)).await
}

pub async fn update_template(
    api: &ApiClient,
    id: &str,
    payload: &ContainerTemplatePayload,
) -> Result<Value, ApiError> {
    api.put(&format!("/container-templates/{}", seg(id)), to_body(payload)?)
        .await
}

pub async fn delete_template(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/container-templates/{}", seg(id))).await
}
