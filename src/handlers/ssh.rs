use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::{self, ApiError};
use crate::models::{AppState, Flash};
use crate::templates::SshTemplate;

use super::helpers::{
    absolute_url_from_state, api_from_jar, build_template_globals, finish_action, load_error, push_flash,
    render_template, session_expired, TemplateGlobals,
};

pub async fn ssh_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let api = api_from_jar(&state, &jar);
    let (connections, error) = match api::ssh::list_ssh_connections(&api).await {
        Ok(c) => (c, None),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, "/ssh"),
        Err(e) => (Vec::new(), Some(load_error("SSH connections", &e))),
    };

    render_template(SshTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        connections,
        error,
    })
}

/// Opens a connection and shows the command once; the password is not
/// retrievable afterwards.
pub async fn ssh_connect_post(State(state): State<AppState>, jar: CookieJar, Path(container_id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    match api::ssh::create_ssh_connection(&api, &container_id).await {
        Ok(conn) => {
            let mut message = format!("SSH connection created: {}", conn.command());
            if let Some(password) = conn.password.as_deref().filter(|p| !p.is_empty()) {
                message.push_str(&format!(" (password: {})", password));
            }
            push_flash(&state, &jar, Flash::success(message));
            Redirect::to(&absolute_url_from_state(&state, "/ssh")).into_response()
        }
        Err(e) => finish_action(
            &state,
            &jar,
            Err(e),
            "",
            "Failed to create SSH connection",
            "/containers",
        ),
    }
}

pub async fn ssh_revoke_post(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::ssh::revoke_ssh_connection(&api, &id).await;
    finish_action(
        &state,
        &jar,
        result,
        "SSH connection revoked",
        "Failed to revoke SSH connection",
        "/ssh",
    )
}
