use serde_json::Value;

use super::client::{decode, seg, ApiClient};
use super::error::ApiError;
use crate::models::SshConnection;

pub async fn create_ssh_connection(api: &ApiClient, container_id: &str) -> Result<SshConnection, ApiError> {
    let value = api
        .post(&format!("/ssh/connect/{}", seg(container_id)), None)
        .await?;
    decode(value)
}

pub async fn list_ssh_connections(api: &ApiClient) -> Result<Vec<SshConnection>, ApiError> {
    api.get_list("/ssh/connections").await
}

pub async fn get_ssh_connection(api: &ApiClient, id: &str) -> Result<SshConnection, ApiError> {
    let value = api.get(&format!("/ssh/connections/{}", seg(id))).await?;
    decode(value)
}

pub async fn revoke_ssh_connection(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/ssh/connections/{}", seg(id))).await
}
