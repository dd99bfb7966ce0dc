use super::client::{list_items, ApiClient};
use super::error::ApiError;
use crate::models::{Activity, SystemStatus};

pub async fn system_status(api: &ApiClient) -> Result<SystemStatus, ApiError> {
    let value = api.get("/system/status").await?;
    Ok(SystemStatus::from_value(&value))
}

pub async fn recent_activities(api: &ApiClient) -> Result<Vec<Activity>, ApiError> {
    let value = api.get("/activities/recent").await?;
    Ok(list_items(value)?.iter().map(Activity::from_value).collect())
}

pub async fn my_activities(api: &ApiClient) -> Result<Vec<Activity>, ApiError> {
    let value = api.get("/activities/my-activities").await?;
    Ok(list_items(value)?.iter().map(Activity::from_value).collect())
}
