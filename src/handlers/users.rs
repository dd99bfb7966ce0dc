use axum::{
    extract::{Form, Path, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::{AppState, NewUser, Role, UserUpdate};
use crate::templates::UsersPageTemplate;

use super::helpers::{
    api_from_jar, build_template_globals, finish_action, invalid_form, load_error, render_template, session_expired,
    TemplateGlobals,
};

#[derive(Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct UpdateUserForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Staff see the student roster; administrators see everyone and get the
/// management forms.
pub async fn users_list(State(state): State<AppState>, jar: CookieJar) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let can_manage = current_user.as_ref().map(|u| u.is_admin()).unwrap_or(false);
    let api = api_from_jar(&state, &jar);
    let result = if can_manage {
        api::users::list_users(&api).await
    } else {
        api::users::list_students(&api).await
    };
    let (users, error) = match result {
        Ok(u) => (u, None),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, "/users"),
        Err(e) => (Vec::new(), Some(load_error("users", &e))),
    };

    render_template(UsersPageTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        users,
        roles: Role::all_assignable().to_vec(),
        can_manage,
        error,
    })
}

pub async fn users_create(State(state): State<AppState>, jar: CookieJar, Form(form): Form<CreateUserForm>) -> Response {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return invalid_form(&state, &jar, "Username and password are required", "/users");
    }
    let role = match Role::parse_assignable(&form.role) {
        Ok(r) => r,
        Err(message) => return invalid_form(&state, &jar, &message, "/users"),
    };
    let user = NewUser {
        username: form.username.trim().to_string(),
        password: form.password,
        email: non_empty(&form.email),
        role: role.as_str().to_string(),
    };
    let api = api_from_jar(&state, &jar);
    let result = api::users::create_user(&api, &user).await;
    finish_action(
        &state,
        &jar,
        result,
        &format!("User {} created", user.username),
        "Failed to create user",
        "/users",
    )
}

pub async fn users_update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<UpdateUserForm>,
) -> Response {
    let role = match non_empty(&form.role).map(|r| Role::parse_assignable(&r)).transpose() {
        Ok(r) => r,
        Err(message) => return invalid_form(&state, &jar, &message, "/users"),
    };
    let update = UserUpdate {
        email: non_empty(&form.email),
        password: non_empty(&form.password),
        role: role.map(|r| r.as_str().to_string()),
    };
    if update.is_empty() {
        return invalid_form(&state, &jar, "Nothing to update", "/users");
    }
    let api = api_from_jar(&state, &jar);
    let result = api::users::update_user(&api, &id, &update).await;
    finish_action(&state, &jar, result, "User updated", "Failed to update user", "/users")
}

pub async fn users_delete(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::users::delete_user(&api, &id).await;
    finish_action(&state, &jar, result, "User deleted", "Failed to delete user", "/users")
}
