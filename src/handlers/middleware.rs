use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::handlers::helpers::{absolute_url_from_state, build_current_user, login_redirect, push_flash};
use crate::models::{AppState, Flash, RoleGate};

fn requested_path(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/dashboard".into())
}

/// Unauthenticated navigation goes to the login page, which returns the
/// user here afterwards.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if build_current_user(&state, &jar).is_some() {
        next.run(request).await
    } else {
        let target = requested_path(&request);
        tracing::debug!(%target, "Unauthenticated request, redirecting to login");
        login_redirect(&state, &target)
    }
}

async fn role_gate(state: AppState, jar: CookieJar, request: Request, next: Next, gate: RoleGate) -> Response {
    let Some(user) = build_current_user(&state, &jar) else {
        let target = requested_path(&request);
        return login_redirect(&state, &target);
    };
    if user.role.satisfies(gate) {
        return next.run(request).await;
    }
    tracing::info!(username = %user.username, role = %user.role, path = %request.uri().path(), "Access denied");
    let message = match gate {
        RoleGate::Staff => "Access denied. Teachers only.",
        RoleGate::Admin => "Access denied. Administrators only.",
    };
    push_flash(&state, &jar, Flash::error(message));
    Redirect::to(&absolute_url_from_state(&state, "/dashboard")).into_response()
}

pub async fn staff_middleware(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    role_gate(state, jar, request, next, RoleGate::Staff).await
}

pub async fn admin_middleware(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    role_gate(state, jar, request, next, RoleGate::Admin).await
}
