use serde::{Deserialize, Serialize};

use crate::models::wire::{lenient_bool, lenient_opt_string, lenient_string, string_list, EntityRef};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerTemplate {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(alias = "image", deserialize_with = "lenient_string")]
    pub docker_image: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub cpu_limit: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub memory_limit: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub cpu_request: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub memory_request: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub ssh_enabled: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub persistent_storage: bool,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub storage_size: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub shared: bool,
    #[serde(alias = "environmentVariables", deserialize_with = "string_list")]
    pub environment_vars: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub command: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub args: Vec<String>,
    #[serde(alias = "owner")]
    pub creator: Option<EntityRef>,
}

impl ContainerTemplate {
    pub fn resources_display(&self) -> String {
        let requests = format!(
            "{} / {}",
            self.cpu_request.as_deref().unwrap_or("—"),
            self.memory_request.as_deref().unwrap_or("—")
        );
        let limits = format!(
            "{} / {}",
            self.cpu_limit.as_deref().unwrap_or("—"),
            self.memory_limit.as_deref().unwrap_or("—")
        );
        format!("req {} · lim {}", requests, limits)
    }

    pub fn owner_display(&self) -> &str {
        self.creator.as_ref().map(|c| c.display()).unwrap_or("—")
    }

    pub fn env_text(&self) -> String {
        self.environment_vars.join("\n")
    }

    pub fn args_text(&self) -> String {
        self.args.join("\n")
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of `POST /container-templates` and `PUT /container-templates/{id}`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTemplatePayload {
    pub name: String,
    pub description: String,
    pub docker_image: String,
    pub category: String,
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub memory_request: String,
    pub ssh_enabled: bool,
    pub persistent_storage: bool,
    pub storage_size: String,
    pub shared: bool,
    pub environment_vars: Vec<String>,
    pub command: String,
    pub args: Vec<String>,
}

impl ContainerTemplatePayload {
    /// Starting values for the "new template" form. Templates are shared
    /// unless the author unticks the box.
    pub fn new_form() -> Self {
        Self {
            shared: true,
            ..Default::default()
        }
    }

    /// Name and image are the only fields the backend cannot default.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.docker_image.trim().is_empty() {
            return Err("Name and Docker image are required".into());
        }
        Ok(())
    }
}

impl From<&ContainerTemplate> for ContainerTemplatePayload {
    fn from(t: &ContainerTemplate) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone().unwrap_or_default(),
            docker_image: t.docker_image.clone(),
            category: t.category.clone().unwrap_or_default(),
            cpu_limit: t.cpu_limit.clone().unwrap_or_default(),
            memory_limit: t.memory_limit.clone().unwrap_or_default(),
            cpu_request: t.cpu_request.clone().unwrap_or_default(),
            memory_request: t.memory_request.clone().unwrap_or_default(),
            ssh_enabled: t.ssh_enabled,
            persistent_storage: t.persistent_storage,
            storage_size: t.storage_size.clone().unwrap_or_default(),
            shared: t.shared,
            environment_vars: t.environment_vars.clone(),
            command: t.command.clone().unwrap_or_default(),
            args: t.args.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_backend_model_shape() {
        let t: ContainerTemplate = serde_json::from_value(json!({
            "id": 7,
            "name": "python-lab",
            "image": "python:3.12",
            "environmentVariables": {"PORT": "8000"},
            "shared": true,
            "creator": {"id": 2, "username": "prof"}
        }))
        .unwrap();
        assert_eq!(t.id, "7");
        assert_eq!(t.docker_image, "python:3.12");
        assert_eq!(t.environment_vars, vec!["PORT=8000".to_string()]);
        assert_eq!(t.owner_display(), "prof");
        assert!(!t.ssh_enabled);
    }

    #[test]
    fn new_templates_start_shared() {
        let p = ContainerTemplatePayload::new_form();
        assert!(p.shared);
        assert!(!p.ssh_enabled);
        assert!(p.name.is_empty());
    }

    #[test]
    fn validation_requires_name_and_image() {
        let mut p = ContainerTemplatePayload {
            name: "web".into(),
            ..Default::default()
        };
        assert!(p.validate().is_err());
        p.docker_image = "nginx".into();
        assert!(p.validate().is_ok());
    }
}
