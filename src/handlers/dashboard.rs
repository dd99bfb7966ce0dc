use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AppState;
use crate::services::load_dashboard;
use crate::templates::DashboardTemplate;

use super::helpers::{api_from_jar, build_template_globals, login_redirect, render_template, session_expired, TemplateGlobals};

pub async fn dashboard_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let Some(user) = current_user.clone() else {
        return login_redirect(&state, "/dashboard");
    };

    let api = api_from_jar(&state, &jar);
    let data = match load_dashboard(&api, &user).await {
        Ok(d) => d,
        Err(_) => return session_expired(&state, &jar, "/dashboard"),
    };

    render_template(DashboardTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        data,
        is_staff: user.is_staff(),
        refresh_secs: state.refresh_interval.as_secs(),
    })
    .into_response()
}
