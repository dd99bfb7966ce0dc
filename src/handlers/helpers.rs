use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::models::{AppState, CurrentUser, Flash};
use crate::session::StoredUser;
use crate::templates::PageContext;

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// The signed-in user for this browser, if the session still holds a token.
pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<(String, StoredUser)> {
    let sid = session_id_from_jar(jar)?;
    let user = state.session_user(&sid)?;
    if user.has_token() {
        Some((sid, user))
    } else {
        None
    }
}

pub fn build_current_user(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    current_session(state, jar).map(|(_, u)| u.to_current_user())
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<Flash> {
    match session_id_from_jar(jar) {
        Some(sid) => state.take_flashes(&sid),
        None => vec![],
    }
}

pub fn push_flash(state: &AppState, jar: &CookieJar, flash: Flash) {
    if let Some(sid) = session_id_from_jar(jar) {
        state.push_flash(&sid, flash);
    }
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let current_user = build_current_user(state, jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        api_hostname: crate::utils::hostname_from_url(&state.api_base_url),
        base_url: state.public_base_url.clone(),
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template + PageContext>(t: T) -> Response {
    tracing::trace!(
        viewer = t.viewer().map(|u| u.username.as_str()).unwrap_or("-"),
        flashes = t.flashes().len(),
        api = t.api_hostname(),
        "Rendering page"
    );
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub fn absolute_url_from_state(state: &AppState, path: &str) -> String {
    crate::utils::absolute_url(&state.public_base_url, path)
}

/// API client carrying this browser's token. A 401 on any call ends the session.
pub fn api_from_jar(state: &AppState, jar: &CookieJar) -> ApiClient {
    match session_id_from_jar(jar) {
        Some(sid) => state.api_for(&sid),
        None => state.anonymous_api(),
    }
}

pub fn login_redirect(state: &AppState, next: &str) -> Response {
    let target = format!("/login?next={}", urlencoding::encode(next));
    Redirect::to(&absolute_url_from_state(state, &target)).into_response()
}

/// Response for a page whose load was rejected with 401: the session is
/// already gone, so send the user to log in again.
pub fn session_expired(state: &AppState, jar: &CookieJar, next: &str) -> Response {
    push_flash(state, jar, Flash::error("Your session has expired. Please log in again."));
    login_redirect(state, next)
}

/// Turns the outcome of a user action into a flash and a redirect back to
/// `back`, which re-fetches the list.
pub fn finish_action(
    state: &AppState,
    jar: &CookieJar,
    result: Result<Value, ApiError>,
    success: &str,
    failure: &str,
    back: &str,
) -> Response {
    match result {
        Ok(_) => {
            push_flash(state, jar, Flash::success(success));
            Redirect::to(&absolute_url_from_state(state, back)).into_response()
        }
        Err(ApiError::Unauthorized) => session_expired(state, jar, back),
        Err(e) => {
            tracing::warn!(error = %e, "{}", failure);
            push_flash(state, jar, Flash::error(format!("{}: {}", failure, e)));
            Redirect::to(&absolute_url_from_state(state, back)).into_response()
        }
    }
}

/// Rejects a form before it reaches the backend.
pub fn invalid_form(state: &AppState, jar: &CookieJar, message: &str, back: &str) -> Response {
    push_flash(state, jar, Flash::error(message));
    Redirect::to(&absolute_url_from_state(state, back)).into_response()
}

/// Error banner text for a failed primary fetch.
pub fn load_error(what: &str, e: &ApiError) -> String {
    format!("Failed to load {}: {}", what, e)
}
