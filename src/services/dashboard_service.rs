use crate::api::{self, ApiClient, ApiError};
use crate::models::{Activity, ContainerInstance, CurrentUser, DashboardStats, SystemStatus};

use super::degrade;

#[derive(Clone, Debug, Default)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub system: SystemStatus,
    pub activities: Vec<Activity>,
    pub containers: Vec<ContainerInstance>,
    /// Set when the container list itself could not be loaded.
    pub error: Option<String>,
}

/// One fetch batch for the dashboard. Staff get platform-wide counters and
/// system status, students only their own containers and activity.
///
/// Returns `Err` only for [`ApiError::Unauthorized`]; every other failure
/// is folded into the data.
pub async fn load_dashboard(api: &ApiClient, user: &CurrentUser) -> Result<DashboardData, ApiError> {
    if user.is_staff() {
        load_staff_dashboard(api).await
    } else {
        load_student_dashboard(api).await
    }
}

async fn load_staff_dashboard(api: &ApiClient) -> Result<DashboardData, ApiError> {
    let (pods, containers, users, templates, activities, system) = tokio::join!(
        api::kubernetes::list_all_pods(api, true),
        api::containers::list_containers(api),
        api::users::list_users(api),
        api::container_templates::list_templates(api),
        api::system::recent_activities(api),
        api::system::system_status(api),
    );

    let (containers, error) = split_primary(containers)?;
    let pods = degrade("pods", pods)?;
    let users = degrade("users", users)?;
    let templates = degrade("templates", templates)?;
    let activities = degrade("activities", activities)?;
    let system = match system {
        Ok(s) => s,
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load system status");
            SystemStatus::default()
        }
    };

    let stats = DashboardStats {
        total_pods: pods.len(),
        running_pods: pods.iter().filter(|p| p.is_running()).count(),
        total_containers: containers.len(),
        active_containers: containers.iter().filter(|c| c.status.is_running()).count(),
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active()).count(),
        templates: templates.len(),
    };

    Ok(DashboardData {
        stats,
        system,
        activities,
        containers,
        error,
    })
}

async fn load_student_dashboard(api: &ApiClient) -> Result<DashboardData, ApiError> {
    let (containers, activities) = tokio::join!(
        api::containers::list_my_containers(api),
        api::system::my_activities(api),
    );

    let (containers, error) = split_primary(containers)?;
    let activities = degrade("activities", activities)?;

    let stats = DashboardStats {
        total_containers: containers.len(),
        active_containers: containers.iter().filter(|c| c.status.is_running()).count(),
        ..Default::default()
    };

    Ok(DashboardData {
        stats,
        system: SystemStatus::default(),
        activities,
        containers,
        error,
    })
}

fn split_primary<T>(result: Result<Vec<T>, ApiError>) -> Result<(Vec<T>, Option<String>), ApiError> {
    match result {
        Ok(items) => Ok((items, None)),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard data");
            Ok((Vec::new(), Some(format!("Failed to load dashboard data: {}", e))))
        }
    }
}
