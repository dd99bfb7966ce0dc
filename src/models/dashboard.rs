use serde_json::Value;

use crate::utils::display_json;

/// Counters shown on the dashboard cards. Missing sources count as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_pods: usize,
    pub running_pods: usize,
    pub total_containers: usize,
    pub active_containers: usize,
    pub total_users: usize,
    pub active_users: usize,
    pub templates: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemStatus {
    pub kubernetes: String,
    pub database: String,
    pub ssh: String,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            kubernetes: "unknown".into(),
            database: "unknown".into(),
            ssh: "unknown".into(),
        }
    }
}

impl SystemStatus {
    pub fn from_value(v: &Value) -> Self {
        let read = |key: &str| {
            v.get(key)
                .map(|s| match s {
                    Value::Object(o) => o
                        .get("status")
                        .map(display_json)
                        .unwrap_or_else(|| "unknown".into()),
                    other => display_json(other),
                })
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "unknown".into())
        };
        Self {
            kubernetes: read("kubernetes"),
            database: read("database"),
            ssh: read("ssh"),
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("Kubernetes", &self.kubernetes, crate::utils::status_badge_class(&self.kubernetes)),
            ("Database", &self.database, crate::utils::status_badge_class(&self.database)),
            ("SSH", &self.ssh, crate::utils::status_badge_class(&self.ssh)),
        ]
    }
}

#[derive(Clone, Debug, Default)]
pub struct Activity {
    pub message: String,
    pub user: String,
    pub timestamp: String,
}

impl Activity {
    pub fn from_value(v: &Value) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| v.get(*k).filter(|x| !x.is_null()))
                .map(display_json)
                .unwrap_or_default()
        };
        let message = if let Some(s) = v.as_str() {
            s.to_string()
        } else {
            field(&["description", "message", "action", "type"])
        };
        Self {
            message,
            user: field(&["username", "user"]),
            timestamp: field(&["timestamp", "createdAt", "time"]),
        }
    }

    pub fn when(&self) -> String {
        crate::utils::format_timestamp(&self.timestamp)
    }
}
