use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AppState;
use crate::templates::NotFoundTemplate;

use super::helpers::{build_template_globals, render_template, TemplateGlobals};

pub async fn not_found(State(state): State<AppState>, jar: CookieJar, uri: Uri) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let page = render_template(NotFoundTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        path: uri.path().to_string(),
    });
    (StatusCode::NOT_FOUND, page).into_response()
}

/// Serves the stylesheet compiled into the binary, or the one loaded from
/// `--stylesheet` at startup.
pub async fn styles_css(State(state): State<AppState>) -> Response {
    let css = state
        .custom_css
        .clone()
        .unwrap_or_else(|| crate::DEFAULT_STYLES.to_string());
    ([(axum::http::header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response()
}
