use serde_json::Value;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{ContainerInstance, ContainerTemplate, CurrentUser, SshConnection, User};

use super::degrade;

#[derive(Clone, Debug, Default)]
pub struct ContainersPage {
    pub containers: Vec<ContainerInstance>,
    pub templates: Vec<ContainerTemplate>,
    /// Only loaded for staff, who may create containers on a student's behalf.
    pub students: Vec<User>,
    pub connections: Vec<SshConnection>,
    pub error: Option<String>,
}

/// Loads the container list with the data its forms need. Staff first ask
/// the backend to resync statuses from Kubernetes.
pub async fn load_containers_page(api: &ApiClient, user: &CurrentUser) -> Result<ContainersPage, ApiError> {
    if user.is_staff() {
        api::containers::refresh_container_statuses(api).await;
        let (containers, templates, students) = tokio::join!(
            api::containers::list_containers(api),
            api::container_templates::list_templates(api),
            api::users::list_students(api),
        );
        let (containers, error) = match containers {
            Ok(c) => (c, None),
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
            Err(e) => (Vec::new(), Some(format!("Failed to load containers: {}", e))),
        };
        Ok(ContainersPage {
            containers,
            templates: degrade("templates", templates)?,
            students: degrade("students", students)?,
            connections: Vec::new(),
            error,
        })
    } else {
        let (containers, templates, connections) = tokio::join!(
            api::containers::list_my_containers(api),
            api::container_templates::list_templates(api),
            api::ssh::list_ssh_connections(api),
        );
        let (containers, error) = match containers {
            Ok(c) => (c, None),
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
            Err(e) => (Vec::new(), Some(format!("Failed to load containers: {}", e))),
        };
        Ok(ContainersPage {
            containers,
            templates: degrade("templates", templates)?,
            students: Vec::new(),
            connections: degrade("SSH connections", connections)?,
            error,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Delete,
}

impl ContainerAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
            Self::Delete => "deleted",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Delete => "delete",
        }
    }
}

pub async fn container_action(api: &ApiClient, action: ContainerAction, id: &str) -> Result<Value, ApiError> {
    match action {
        ContainerAction::Start => api::containers::start_container(api, id).await,
        ContainerAction::Stop => api::containers::stop_container(api, id).await,
        ContainerAction::Restart => api::containers::restart_container(api, id).await,
        ContainerAction::Delete => api::containers::delete_container(api, id).await,
    }
}
