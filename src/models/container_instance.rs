use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::models::wire::{lenient_opt_string, lenient_string, EntityRef};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ContainerStatus {
    Creating,
    Pending,
    Running,
    Stopped,
    Error,
    #[default]
    Unknown,
    Other(String),
}

impl ContainerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" => ContainerStatus::Unknown,
            "creating" | "containercreating" => ContainerStatus::Creating,
            "pending" => ContainerStatus::Pending,
            "running" | "active" => ContainerStatus::Running,
            "stopped" | "terminated" | "succeeded" => ContainerStatus::Stopped,
            "error" | "failed" | "crashloopbackoff" => ContainerStatus::Error,
            _ => ContainerStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContainerStatus::Creating => "Creating",
            ContainerStatus::Pending => "Pending",
            ContainerStatus::Running => "Running",
            ContainerStatus::Stopped => "Stopped",
            ContainerStatus::Error => "Error",
            ContainerStatus::Unknown => "Unknown",
            ContainerStatus::Other(s) => s.as_str(),
        }
    }

    /// CSS modifier for the status badge.
    pub fn badge_class(&self) -> &'static str {
        crate::utils::status_badge_class(self.label())
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerStatus::Running)
    }

    pub fn can_start(&self) -> bool {
        matches!(self, ContainerStatus::Stopped | ContainerStatus::Error)
    }

    pub fn can_stop(&self) -> bool {
        matches!(
            self,
            ContainerStatus::Running | ContainerStatus::Pending | ContainerStatus::Creating
        )
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ContainerStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient_string(deserializer)?;
        Ok(ContainerStatus::parse(&raw))
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerInstance {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    pub status: ContainerStatus,
    #[serde(alias = "user", alias = "student")]
    pub owner: Option<EntityRef>,
    #[serde(alias = "podName", deserialize_with = "lenient_opt_string")]
    pub kubernetes_pod_name: Option<String>,
    #[serde(alias = "template", alias = "containerTemplate")]
    pub image_template: Option<EntityRef>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub created_at: Option<String>,
}

impl ContainerInstance {
    pub fn owner_display(&self) -> &str {
        self.owner.as_ref().map(|o| o.display()).unwrap_or("—")
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.id.as_str())
    }

    pub fn pod_display(&self) -> &str {
        self.kubernetes_pod_name.as_deref().unwrap_or("—")
    }

    pub fn template_display(&self) -> &str {
        self.image_template.as_ref().map(|t| t.display()).unwrap_or("—")
    }

    pub fn created_display(&self) -> String {
        self.created_at
            .as_deref()
            .map(crate::utils::format_timestamp)
            .unwrap_or_else(|| "—".into())
    }
}

/// Body of `POST /containers`.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContainer {
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(ContainerStatus::parse("running"), ContainerStatus::Running);
        assert_eq!(ContainerStatus::parse("Stopped"), ContainerStatus::Stopped);
        assert_eq!(ContainerStatus::parse("ContainerCreating"), ContainerStatus::Creating);
        assert_eq!(ContainerStatus::parse("Evicted"), ContainerStatus::Other("Evicted".into()));
        assert_eq!(ContainerStatus::parse(""), ContainerStatus::Unknown);
    }

    #[test]
    fn decodes_instance_with_nested_refs() {
        let c: ContainerInstance = serde_json::from_value(json!({
            "id": 12,
            "name": "lab-ana",
            "status": "Running",
            "kubernetesPodName": "lab-ana-7f9",
            "owner": {"id": 4, "username": "ana"},
            "imageTemplate": {"id": 1, "name": "python"}
        }))
        .unwrap();
        assert_eq!(c.id, "12");
        assert!(c.status.can_stop());
        assert!(!c.status.can_start());
        assert_eq!(c.owner_display(), "ana");
        assert_eq!(c.owner_id(), Some("4"));
        assert_eq!(c.template_display(), "python");
    }
}
