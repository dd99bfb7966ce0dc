use std::collections::HashMap;

use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{AppState, ContainerTemplate, ContainerTemplatePayload, Flash};
use crate::templates::{TemplateEditTemplate, TemplatesPageTemplate};
use crate::utils::{non_empty_lines, parse_flag};

use super::helpers::{
    absolute_url_from_state, api_from_jar, build_template_globals, finish_action, load_error, push_flash,
    render_template, session_expired, TemplateGlobals,
};

#[derive(Deserialize, Default)]
pub struct TemplatesQuery {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Builds the request body from the template form. Checkboxes are absent
/// from the form when unchecked.
pub fn payload_from_form(form: &HashMap<String, String>) -> ContainerTemplatePayload {
    let text = |key: &str| form.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
    let flag = |key: &str| parse_flag(form.get(key).map(String::as_str), false);
    ContainerTemplatePayload {
        name: text("name"),
        description: text("description"),
        docker_image: text("docker_image"),
        category: text("category"),
        cpu_limit: text("cpu_limit"),
        memory_limit: text("memory_limit"),
        cpu_request: text("cpu_request"),
        memory_request: text("memory_request"),
        ssh_enabled: flag("ssh_enabled"),
        persistent_storage: flag("persistent_storage"),
        storage_size: text("storage_size"),
        shared: flag("shared"),
        environment_vars: non_empty_lines(form.get("environment_vars").map(String::as_str).unwrap_or("")),
        command: text("command"),
        args: non_empty_lines(form.get("args").map(String::as_str).unwrap_or("")),
    }
}

async fn fetch_templates(api: &ApiClient, q: &TemplatesQuery) -> Result<Vec<ContainerTemplate>, ApiError> {
    let search = q.search.as_deref().map(str::trim).unwrap_or("");
    let category = q.category.as_deref().map(str::trim).unwrap_or("");
    if !search.is_empty() {
        return api::container_templates::search_templates(api, search).await;
    }
    if !category.is_empty() {
        return api::container_templates::list_templates_by_category(api, category).await;
    }
    match q.scope.as_deref().unwrap_or("all") {
        "mine" => api::container_templates::list_my_templates(api).await,
        "ssh" => api::container_templates::list_ssh_enabled_templates(api).await,
        "examples" => api::container_templates::list_example_templates(api).await,
        _ => api::container_templates::list_templates(api).await,
    }
}

pub async fn templates_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(q): Query<TemplatesQuery>,
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let api = api_from_jar(&state, &jar);
    let (templates, error) = match fetch_templates(&api, &q).await {
        Ok(t) => (t, None),
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, "/templates"),
        Err(e) => (Vec::new(), Some(load_error("templates", &e))),
    };

    render_template(TemplatesPageTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        templates,
        error,
        scope: q.scope.unwrap_or_else(|| "all".into()),
        search: q.search.unwrap_or_default(),
        category: q.category.unwrap_or_default(),
    })
}

fn edit_page(
    state: &AppState,
    jar: &CookieJar,
    template_id: Option<String>,
    form: ContainerTemplatePayload,
    error: Option<String>,
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    let env_text = form.environment_vars.join("\n");
    let args_text = form.args.join("\n");
    render_template(TemplateEditTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        template_id,
        form,
        env_text,
        args_text,
        error,
    })
}

pub async fn template_new_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    edit_page(&state, &jar, None, ContainerTemplatePayload::new_form(), None)
}

pub async fn template_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let payload = payload_from_form(&form);
    if let Err(message) = payload.validate() {
        return edit_page(&state, &jar, None, payload, Some(message));
    }
    let api = api_from_jar(&state, &jar);
    let result = api::container_templates::create_template(&api, &payload).await;
    match result {
        Err(ApiError::Unauthorized) => session_expired(&state, &jar, "/templates/new"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create template");
            edit_page(&state, &jar, None, payload, Some(format!("Failed to create template: {}", e)))
        }
        ok => finish_action(&state, &jar, ok, "Template created successfully", "", "/templates"),
    }
}

/// The backend has no single-template endpoint; the edit form is filled
/// from the list.
pub async fn template_edit_get(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    match api::container_templates::list_templates(&api).await {
        Ok(templates) => match templates.iter().find(|t| t.id == id) {
            Some(t) => edit_page(&state, &jar, Some(id), ContainerTemplatePayload::from(t), None),
            None => {
                push_flash(&state, &jar, Flash::error("Template not found"));
                Redirect::to(&absolute_url_from_state(&state, "/templates")).into_response()
            }
        },
        Err(ApiError::Unauthorized) => session_expired(&state, &jar, &format!("/templates/{}/edit", id)),
        Err(e) => edit_page(
            &state,
            &jar,
            Some(id),
            ContainerTemplatePayload::default(),
            Some(load_error("template", &e)),
        ),
    }
}

pub async fn template_update_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let payload = payload_from_form(&form);
    if let Err(message) = payload.validate() {
        return edit_page(&state, &jar, Some(id), payload, Some(message));
    }
    let api = api_from_jar(&state, &jar);
    match api::container_templates::update_template(&api, &id, &payload).await {
        Err(ApiError::Unauthorized) => session_expired(&state, &jar, &format!("/templates/{}/edit", id)),
        Err(e) => {
            tracing::warn!(error = %e, template = %id, "Failed to update template");
            edit_page(&state, &jar, Some(id), payload, Some(format!("Failed to update template: {}", e)))
        }
        ok => finish_action(&state, &jar, ok, "Template updated successfully", "", "/templates"),
    }
}

pub async fn template_delete_post(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::container_templates::delete_template(&api, &id).await;
    finish_action(
        &state,
        &jar,
        result,
        "Template deleted successfully",
        "Failed to delete template",
        "/templates",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_checkboxes_and_lines() {
        let mut form = HashMap::new();
        form.insert("name".to_string(), " python-lab ".to_string());
        form.insert("docker_image".to_string(), "python:3.12".to_string());
        form.insert("ssh_enabled".to_string(), "on".to_string());
        form.insert("environment_vars".to_string(), "A=1\n\n B=2 \n".to_string());
        let p = payload_from_form(&form);
        assert_eq!(p.name, "python-lab");
        assert!(p.ssh_enabled);
        assert!(!p.shared);
        assert_eq!(p.environment_vars, vec!["A=1", "B=2"]);
        assert!(p.validate().is_ok());
    }
}
