use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::ApiError;
use crate::session::{NoSession, TokenStore};

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        eprintln!("{}", msg);
    }
}

/// Shows enough of a token to tell sessions apart.
fn mask_token(token: &str) -> String {
    let tail: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("***{}", tail)
}

fn log_curl(method: &str, url: &str, token: Option<&str>, body: Option<&Value>, params: Option<&[(String, String)]>) {
    use yansi::Paint;

    if SILENT.load(Ordering::Relaxed) {
        return;
    }
    let mut url_for_log = url.to_string();
    if let Some(p) = params {
        if !p.is_empty() {
            url_for_log = format!("{}?{}", url_for_log, crate::utils::build_query_string(p));
        }
    }

    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(&url_for_log).fg(yansi::Color::Cyan)));

    if let Some(t) = token {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new(format!("'Authorization: Bearer {}'", mask_token(t))).fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(parts.join(" "));
}

/// Core HTTP call: builds the request, attaches the bearer token, and
/// normalizes the response. JSON bodies are parsed, anything else comes
/// back as a JSON string, an empty body as `null`.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    token: Option<&str>,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Result<Value, ApiError> {
    let url = format!("{}{}", api_base_url, endpoint);
    log_curl(method, &url, token, body.as_ref(), params.as_deref());

    let mut req = match method {
        "GET" => client.get(&url),
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "PATCH" => client.patch(&url),
        "DELETE" => client.delete(&url),
        other => {
            return Err(ApiError::Invalid(format!("unsupported method {}", other)));
        }
    };

    if let Some(t) = token.filter(|t| !t.is_empty()) {
        req = req.bearer_auth(t);
    }
    if let Some(p) = params {
        req = req.query(&p);
    }
    if let Some(b) = body {
        req = req.json(&b);
    }

    let resp = req.send().await?;
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    let text = resp.text().await?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), endpoint, "API error response");
        return Err(ApiError::from_status(status.as_u16(), &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    if is_json {
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    } else {
        Ok(Value::String(text))
    }
}

/// The single HTTP client wrapper every page and command goes through.
/// The token is read from the session store before each request and the
/// store is cleared when the backend rejects it.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            store,
        }
    }

    pub fn anonymous(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::new(http, base_url, Arc::new(NoSession))
    }

    /// Same backend, no session: a 401 here leaves the stored session alone.
    pub fn without_session(&self) -> Self {
        Self::anonymous(self.http.clone(), self.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.store.token().is_some()
    }

    pub async fn request(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<Value>,
        params: Option<Vec<(String, String)>>,
    ) -> Result<Value, ApiError> {
        let token = self.store.token();
        tracing::info!(method, endpoint, "API request");
        let result = api_call(&self.http, &self.base_url, token.as_deref(), method, endpoint, body, params).await;
        match &result {
            Ok(value) => tracing::debug!(response = ?value, "API response"),
            Err(ApiError::Unauthorized) => {
                tracing::warn!(endpoint, "Authentication failed, clearing session");
                self.store.forget();
            }
            Err(e) => tracing::debug!(%e, "API call failed"),
        }
        result
    }

    /// Like [`request`](Self::request) but with an explicit token; the
    /// session store is left untouched on 401.
    pub async fn request_with_token(
        &self,
        token: &str,
        method: &str,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        api_call(&self.http, &self.base_url, Some(token), method, endpoint, body, None).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request("GET", endpoint, None, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request("POST", endpoint, body, None).await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.request("PUT", endpoint, Some(body), None).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request("DELETE", endpoint, None, None).await
    }

    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ApiError> {
        let value = self.get(endpoint).await?;
        decode_list(value)
    }
}

/// Unwraps `{"data": [...]}`-style envelopes and tolerates empty bodies.
pub fn list_items(value: Value) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::Object(mut obj) => {
            for key in ["data", "content", "items", "results"] {
                if let Some(Value::Array(items)) = obj.remove(key) {
                    return Ok(items);
                }
            }
            Err(ApiError::Decode("expected a list".into()))
        }
        _ => Err(ApiError::Decode("expected a list".into())),
    }
}

pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    list_items(value)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
        .collect()
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let value = match value {
        Value::Object(mut obj) if obj.len() == 1 && obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Percent-encodes one path segment (namespace, pod name, search term).
pub fn seg(s: &str) -> String {
    urlencoding::encode(s.trim()).into_owned()
}
