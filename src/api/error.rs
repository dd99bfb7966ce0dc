use thiserror::Error;

/// Failures surfaced by the API client. Everything the pages show to the
/// user is one of these.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401; the stored session has been cleared.
    #[error("Authentication failed")]
    Unauthorized,

    /// Any other non-success status. `message` is the response body, or a
    /// generic text when the body is empty.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected before any request was sent.
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        let message = extract_message(body)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        ApiError::Http { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Error bodies are either plain text or `{"error": "..."}` / `{"message": "..."}`.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message", "detail"] {
            if let Some(s) = v.get(key).and_then(|m| m.as_str()) {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
        }
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_gets_generic_message() {
        let e = ApiError::from_status(500, "");
        assert_eq!(e.to_string(), "HTTP error! status: 500");
        assert_eq!(e.status(), Some(500));
    }

    #[test]
    fn json_error_body_is_unwrapped() {
        let e = ApiError::from_status(400, r#"{"error": "Username already exists"}"#);
        assert_eq!(e.to_string(), "Username already exists");
    }

    #[test]
    fn unauthorized_is_classified() {
        assert!(ApiError::from_status(401, "nope").is_unauthorized());
    }
}
