use serde::{Deserialize, Serialize};

use crate::models::role::Role;
use crate::models::wire::{lenient_opt_string, lenient_string};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub username: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub kubernetes_namespace: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("active"))
            .unwrap_or(false)
    }

    pub fn email_display(&self) -> &str {
        self.email.as_deref().unwrap_or("—")
    }

    pub fn namespace_display(&self) -> &str {
        self.kubernetes_namespace.as_deref().unwrap_or("—")
    }
}

/// Body of `POST /users`.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
}

/// Body of `PUT /users/{id}`; only the fields that changed are sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.role.is_none()
    }
}
