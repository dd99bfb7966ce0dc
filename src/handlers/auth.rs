use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::AppState;
use crate::templates::LoginTemplate;
use crate::utils::safe_next;

use super::helpers::{
    absolute_url_from_state, build_current_user, build_template_globals, render_template, session_id_from_jar,
    TemplateGlobals, SESSION_COOKIE,
};

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

fn login_page(state: &AppState, jar: &CookieJar, error: Option<String>, username: String, next: String) -> axum::response::Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(LoginTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        error,
        username,
        next,
    })
}

pub async fn login_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(q): Query<LoginQuery>,
) -> impl IntoResponse {
    let next = safe_next(q.next.as_deref());
    if build_current_user(&state, &jar).is_some() {
        return Redirect::to(&absolute_url_from_state(&state, &next)).into_response();
    }
    login_page(&state, &jar, None, String::new(), next)
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let next = safe_next(form.next.as_deref());
    if form.username.trim().is_empty() || form.password.is_empty() {
        return login_page(
            &state,
            &jar,
            Some("Username and password are required".into()),
            form.username,
            next,
        );
    }

    match api::login(&state.anonymous_api(), &form.username, &form.password).await {
        Ok(resp) => {
            let user = resp.into_stored_user(&form.username);
            tracing::info!(username = %user.username, role = %user.role, "Login successful");
            let sid = state.start_session(user);
            let mut cookie = Cookie::new(SESSION_COOKIE, sid);
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_max_age(time::Duration::seconds(state.session_max_age.as_secs() as i64));
            (jar.add(cookie), Redirect::to(&absolute_url_from_state(&state, &next))).into_response()
        }
        Err(e) => {
            tracing::warn!(username = %form.username.trim(), error = %e, "Login failed");
            let message = match e {
                ApiError::Unauthorized => "Invalid username or password".to_string(),
                ApiError::Http { status, .. } if status == 400 || status == 403 => {
                    "Invalid username or password".to_string()
                }
                other => format!("Login failed: {}", other),
            };
            login_page(&state, &jar, Some(message), form.username, next)
        }
    }
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(sid) = session_id_from_jar(&jar) {
        if let Some(user) = state.end_session(&sid) {
            tracing::info!(username = %user.username, "Logged out");
        }
    }
    let mut expired = Cookie::new(SESSION_COOKIE, "");
    expired.set_path("/");
    let cleared = jar.remove(expired);
    (cleared, Redirect::to(&absolute_url_from_state(&state, "/login"))).into_response()
}

pub async fn root_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if build_current_user(&state, &jar).is_some() {
        return Redirect::to(&absolute_url_from_state(&state, "/dashboard")).into_response();
    }
    Redirect::to(&absolute_url_from_state(&state, "/login")).into_response()
}
