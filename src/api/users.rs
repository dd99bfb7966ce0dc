use serde_json::Value;

use super::client::{decode, seg, ApiClient};
use super::error::ApiError;
use crate::models::{NewUser, User, UserUpdate};

pub async fn list_users(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get_list("/users").await
}

pub async fn list_students(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get_list("/users/students").await
}

pub async fn current_user(api: &ApiClient) -> Result<User, ApiError> {
    let value = api.get("/users/me").await?;
    decode(value)
}

pub async fn create_user(api: &ApiClient, user: &NewUser) -> Result<Value, ApiError> {
    let body = serde_json::to_value(user).map_err(|e| ApiError::Decode(e.to_string()))?;
    api.post("/users", Some(body)).await
}

pub async fn update_user(api: &ApiClient, id: &str, update: &UserUpdate) -> Result<Value, ApiError> {
    let body = serde_json::to_value(update).map_err(|e| ApiError::Decode(e.to_string()))?;
    api.put(&format!("/users/{}", seg(id)), body).await
}

pub async fn delete_user(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/users/{}", seg(id))).await
}
