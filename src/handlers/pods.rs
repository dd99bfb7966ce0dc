use axum::{
    extract::{Query, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::AppState;
use crate::templates::PodsTemplate;
use crate::utils::parse_flag;

use super::helpers::{api_from_jar, build_template_globals, load_error, render_template, session_expired, TemplateGlobals};

#[derive(Deserialize, Default)]
pub struct PodsQuery {
    #[serde(default)]
    pub all: Option<String>,
}

/// Read-only pod and deployment overview.
pub async fn pods_get(State(state): State<AppState>, jar: CookieJar, Query(q): Query<PodsQuery>) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let all_namespaces = parse_flag(q.all.as_deref(), true);
    let api = api_from_jar(&state, &jar);
    let (pods, deployments) = tokio::join!(
        api::kubernetes::list_all_pods(&api, all_namespaces),
        api::kubernetes::list_all_deployments(&api, all_namespaces),
    );

    let (pods, error) = match pods {
        Ok(p) => (p, None),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, "/pods"),
        Err(e) => (Vec::new(), Some(load_error("pods", &e))),
    };
    let deployments = match crate::services::degrade("deployments", deployments) {
        Ok(d) => d,
        Err(_) => return session_expired(&state, &jar, "/pods"),
    };

    render_template(PodsTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        pods,
        deployments,
        all_namespaces,
        error,
        refresh_secs: state.refresh_interval.as_secs(),
    })
}
