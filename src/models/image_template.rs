use serde::{Deserialize, Serialize};

use crate::models::wire::{lenient_bool, lenient_opt_string, lenient_string};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageTemplate {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(alias = "image", deserialize_with = "lenient_string")]
    pub docker_image: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub technology: Option<String>,
    #[serde(alias = "technologyVersion", deserialize_with = "lenient_opt_string")]
    pub version: Option<String>,
    #[serde(alias = "isBuilt", deserialize_with = "lenient_bool")]
    pub built: bool,
}

impl ImageTemplate {
    pub fn technology_display(&self) -> String {
        match (&self.technology, &self.version) {
            (Some(t), Some(v)) => format!("{} {}", t, v),
            (Some(t), None) => t.clone(),
            _ => "—".into(),
        }
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTemplatePayload {
    pub name: String,
    pub docker_image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub technology: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl ImageTemplatePayload {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.docker_image.trim().is_empty() {
            return Err("Name and Docker image are required".into());
        }
        Ok(())
    }
}
