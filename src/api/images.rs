use serde_json::Value;

use super::client::{list_items, seg, ApiClient};
use super::error::ApiError;
use crate::models::{ImageTemplate, ImageTemplatePayload};
use crate::utils::display_json;

pub async fn list_images(api: &ApiClient) -> Result<Vec<ImageTemplate>, ApiError> {
    api.get_list("/images").await
}

pub async fn list_available_images(api: &ApiClient) -> Result<Vec<ImageTemplate>, ApiError> {
    api.get_list("/images/available").await
}

/// Technology names offered by the image builder (`python`, `node`, ...).
pub async fn list_technologies(api: &ApiClient) -> Result<Vec<String>, ApiError> {
    let value = api.get("/images/technologies").await?;
    Ok(list_items(value)?
        .iter()
        .map(|v| match v.get("name") {
            Some(name) => display_json(name),
            None => display_json(v),
        })
        .filter(|s| !s.is_empty())
        .collect())
}

/// Versions the builder supports per technology, e.g. `python -> [3.11, 3.12]`.
/// The backend answers with a JSON object of lists; entries come back
/// sorted by technology.
pub async fn list_technology_versions(api: &ApiClient) -> Result<Vec<(String, Vec<String>)>, ApiError> {
    let value = api.get("/images/technology-versions").await?;
    technology_versions_from(value)
}

fn technology_versions_from(value: Value) -> Result<Vec<(String, Vec<String>)>, ApiError> {
    let Value::Object(map) = value else {
        return match value {
            Value::Null => Ok(Vec::new()),
            other => Err(ApiError::Decode(format!("expected an object of versions, got {}", other))),
        };
    };
    // serde_json's default map is ordered by key.
    Ok(map
        .into_iter()
        .map(|(tech, versions)| {
            let versions = match versions {
                Value::Array(items) => items.iter().map(display_json).filter(|v| !v.is_empty()).collect(),
                Value::Null => Vec::new(),
                single => vec![display_json(&single)],
            };
            (tech, versions)
        })
        .collect())
}

pub async fn create_image(api: &ApiClient, payload: &ImageTemplatePayload) -> Result<Value, ApiError> {
    let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    api.post("/images", Some(body)).await
}

pub async fn update_image(api: &ApiClient, id: &str, payload: &ImageTemplatePayload) -> Result<Value, ApiError> {
    let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    api.put(&format!("/images/{}", seg(id)), body).await
}

pub async fn delete_image(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.delete(&format!("/images/{}", seg(id))).await
}

pub async fn build_image(api: &ApiClient, id: &str) -> Result<Value, ApiError> {
    api.post(&format!("/images/{}/build", seg(id)), None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn versions_are_grouped_by_technology() {
        let parsed = technology_versions_from(json!({
            "python": ["3.11", "3.12"],
            "java": [17, 21],
            "go": null
        }))
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                ("go".to_string(), vec![]),
                ("java".to_string(), vec!["17".to_string(), "21".to_string()]),
                ("python".to_string(), vec!["3.11".to_string(), "3.12".to_string()]),
            ]
        );
        assert!(technology_versions_from(Value::Null).unwrap().is_empty());
        assert!(technology_versions_from(json!(["python"])).is_err());
    }
}
