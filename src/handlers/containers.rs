use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::{AppState, NewContainer};
use crate::services::{container_action, load_containers_page, ContainerAction};
use crate::templates::{ContainerSshTemplate, ContainersTemplate};

use super::helpers::{
    api_from_jar, build_template_globals, finish_action, invalid_form, load_error, login_redirect, render_template,
    session_expired, TemplateGlobals,
};

#[derive(Deserialize)]
pub struct CreateContainerForm {
    pub template_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

pub async fn containers_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let Some(user) = current_user.clone() else {
        return login_redirect(&state, "/containers");
    };

    let api = api_from_jar(&state, &jar);
    let page = match load_containers_page(&api, &user).await {
        Ok(p) => p,
        Err(_) => return session_expired(&state, &jar, "/containers"),
    };

    render_template(ContainersTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        page,
        is_staff: user.is_staff(),
        refresh_secs: state.refresh_interval.as_secs(),
    })
}

pub async fn container_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CreateContainerForm>,
) -> Response {
    if form.template_id.trim().is_empty() {
        return invalid_form(&state, &jar, "Please select a template", "/containers");
    }
    let is_staff = super::helpers::build_current_user(&state, &jar)
        .map(|u| u.is_staff())
        .unwrap_or(false);
    // Only staff may create on a student's behalf; students always get their own.
    let student_id = form
        .student_id
        .map(|s| s.trim().to_string())
        .filter(|s| is_staff && !s.is_empty());
    let request = NewContainer {
        template_id: form.template_id.trim().to_string(),
        student_id,
    };
    let api = api_from_jar(&state, &jar);
    let result = api::containers::create_container(&api, &request).await;
    finish_action(
        &state,
        &jar,
        result,
        "Container created successfully!",
        "Failed to create container",
        "/containers",
    )
}

pub async fn container_action_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((id, action)): Path<(String, String)>,
) -> Response {
    let Some(action) = ContainerAction::parse(&action) else {
        return invalid_form(&state, &jar, "Unknown container action", "/containers");
    };
    let api = api_from_jar(&state, &jar);
    let result = container_action(&api, action, &id).await;
    let success = format!("Container {} successfully", action.past_tense());
    let failure = format!("Failed to {} container", action.verb());
    finish_action(&state, &jar, result, &success, &failure, "/containers")
}

/// SSH details and logs for one container; either may fail on its own.
pub async fn container_ssh_get(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let back = format!("/containers/{}/ssh", id);
    if current_user.is_none() {
        return login_redirect(&state, &back);
    }

    let api = api_from_jar(&state, &jar);
    let (info, logs) = tokio::join!(
        api::containers::container_ssh_info(&api, &id),
        api::containers::container_logs(&api, &id),
    );

    let (info, error) = match info {
        Ok(i) => (Some(i), None),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, &back),
        Err(e) => (None, Some(load_error("SSH information", &e))),
    };
    let logs = match logs {
        Ok(l) => Some(l),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, &back),
        Err(e) => {
            tracing::warn!(error = %e, container = %id, "Failed to load container logs");
            None
        }
    };

    render_template(ContainerSshTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        container_id: id,
        info,
        logs,
        error,
    })
    .into_response()
}
