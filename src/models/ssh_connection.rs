use serde::Deserialize;

use crate::models::wire::{lenient_bool, lenient_opt_string, lenient_string};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SshConnection {
    #[serde(alias = "connectionId", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(alias = "containerInstanceId", deserialize_with = "lenient_string")]
    pub container_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub container_name: String,
    #[serde(alias = "sshHost", alias = "containerIp", deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(alias = "sshPort", alias = "connectionPort", deserialize_with = "lenient_string")]
    pub port: String,
    #[serde(alias = "sshUsername", deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(alias = "sshPassword", deserialize_with = "lenient_opt_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub expires_at: Option<String>,
}

impl SshConnection {
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("ACTIVE")
    }

    pub fn is_active(&self) -> bool {
        self.status_label().eq_ignore_ascii_case("active")
    }

    pub fn expires_display(&self) -> String {
        self.expires_at
            .as_deref()
            .map(crate::utils::format_timestamp)
            .unwrap_or_else(|| "—".into())
    }

    pub fn command(&self) -> String {
        ssh_command(&self.username, &self.host, &self.port)
    }
}

/// Response of `GET /containers/{id}/ssh-info`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SshInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(deserialize_with = "lenient_string")]
    pub port: String,
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub ready: bool,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub docker_image: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub port_forward_command: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub note: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub message: Option<String>,
}

impl SshInfo {
    pub fn command(&self) -> String {
        ssh_command(&self.username, &self.host, &self.port)
    }
}

pub fn ssh_command(username: &str, host: &str, port: &str) -> String {
    let host = if host.is_empty() { "localhost" } else { host };
    let target = if username.is_empty() {
        host.to_string()
    } else {
        format!("{}@{}", username, host)
    };
    if port.is_empty() || port == "22" {
        format!("ssh {}", target)
    } else {
        format!("ssh -p {} {}", port, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_accepts_connect_response_shape() {
        let c: SshConnection = serde_json::from_value(json!({
            "connectionId": 9,
            "sshUsername": "student",
            "sshPassword": "s3cret",
            "connectionPort": 30022,
            "containerName": "lab-ana",
            "expiresAt": "2025-03-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(c.id, "9");
        assert_eq!(c.port, "30022");
        assert!(c.is_active());
        assert_eq!(c.command(), "ssh -p 30022 student@localhost");
    }

    #[test]
    fn default_port_is_omitted() {
        assert_eq!(ssh_command("dev", "10.0.0.5", "22"), "ssh dev@10.0.0.5");
    }
}
