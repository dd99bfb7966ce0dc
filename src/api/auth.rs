use serde::Deserialize;
use serde_json::json;

use super::client::{decode, ApiClient};
use super::error::ApiError;
use crate::models::wire::lenient_string;
use crate::session::StoredUser;

/// Response of `POST /auth/login`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", deserialize_with = "lenient_string")]
    pub token: String,
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
}

impl LoginResponse {
    /// The record to persist; falls back to the submitted username when the
    /// backend omits it.
    pub fn into_stored_user(self, submitted_username: &str) -> StoredUser {
        let username = if self.username.trim().is_empty() {
            submitted_username.trim().to_string()
        } else {
            self.username
        };
        StoredUser {
            username,
            role: self.role,
            token: self.token,
        }
    }
}

/// Exchanges credentials for a bearer token. A response without a token is
/// treated as a failed login.
pub async fn login(api: &ApiClient, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let body = json!({ "username": username.trim(), "password": password });
    let value = api.post("/auth/login", Some(body)).await?;
    let resp: LoginResponse = decode(value)?;
    if resp.token.trim().is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_user_falls_back_to_submitted_name() {
        let resp = LoginResponse {
            token: "t".into(),
            username: String::new(),
            role: "TEACHER".into(),
        };
        let user = resp.into_stored_user(" ana ");
        assert_eq!(user.username, "ana");
        assert!(user.is_teacher());
    }
}
