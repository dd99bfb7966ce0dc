pub mod container_service;
pub mod dashboard_service;

// Re-export commonly used functions
pub use container_service::{container_action, load_containers_page, ContainerAction, ContainersPage};
pub use dashboard_service::{load_dashboard, DashboardData};

use crate::api::ApiError;

/// Secondary fetches degrade to an empty list. A 401 still propagates so the
/// caller can send the user back to the login page.
pub(crate) fn degrade<T>(what: &str, result: Result<Vec<T>, ApiError>) -> Result<Vec<T>, ApiError> {
    match result {
        Ok(items) => Ok(items),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load {}", what);
            Ok(Vec::new())
        }
    }
}
