use axum::{
    extract::{Form, Path, Query, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError, NewDeployment, NewPod, ResourceSpec};
use crate::models::AppState;
use crate::templates::KubernetesTemplate;
use crate::utils::{parse_labels, parse_optional_u32};

use super::helpers::{
    api_from_jar, build_template_globals, finish_action, invalid_form, load_error, render_template, session_expired,
    TemplateGlobals,
};

const DEFAULT_NAMESPACE: &str = "default";

#[derive(Deserialize, Default)]
pub struct KubernetesQuery {
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Deserialize)]
pub struct NamespaceForm {
    pub name: String,
    #[serde(default)]
    pub labels: String,
}

#[derive(Deserialize, Default)]
pub struct ResourceFields {
    #[serde(default)]
    pub cpu_limit: String,
    #[serde(default)]
    pub memory_limit: String,
    #[serde(default)]
    pub cpu_request: String,
    #[serde(default)]
    pub memory_request: String,
}

impl From<ResourceFields> for ResourceSpec {
    fn from(f: ResourceFields) -> Self {
        Self {
            cpu_limit: f.cpu_limit,
            memory_limit: f.memory_limit,
            cpu_request: f.cpu_request,
            memory_request: f.memory_request,
        }
    }
}

#[derive(Deserialize)]
pub struct WorkloadForm {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub labels: String,
    #[serde(default)]
    pub replicas: Option<String>,
    #[serde(flatten)]
    pub resources: ResourceFields,
}

#[derive(Deserialize)]
pub struct ScaleForm {
    pub replicas: String,
}

#[derive(Deserialize)]
pub struct ImageForm {
    pub image: String,
}

fn back_to(namespace: &str) -> String {
    format!("/kubernetes?namespace={}", urlencoding::encode(namespace))
}

/// `None` on 401; other failures become an empty list plus a note for the
/// error banner.
fn collect_or_note<T>(what: &str, result: Result<Vec<T>, ApiError>, errors: &mut Vec<String>) -> Option<Vec<T>> {
    match result {
        Ok(v) => Some(v),
        Err(ApiError::Unauthorized) => None,
        Err(e) => {
            errors.push(load_error(what, &e));
            Some(Vec::new())
        }
    }
}

pub async fn kubernetes_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(q): Query<KubernetesQuery>,
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let selected_namespace = q
        .namespace
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let back = back_to(&selected_namespace);

    let api = api_from_jar(&state, &jar);
    let (namespaces, pods, deployments) = tokio::join!(
        api::kubernetes::list_namespaces(&api),
        api::kubernetes::list_pods(&api, &selected_namespace),
        api::kubernetes::list_deployments(&api, &selected_namespace),
    );

    let mut errors = Vec::new();
    let (Some(namespaces), Some(pods), Some(deployments)) = (
        collect_or_note("namespaces", namespaces, &mut errors),
        collect_or_note("pods", pods, &mut errors),
        collect_or_note("deployments", deployments, &mut errors),
    ) else {
        return session_expired(&state, &jar, &back);
    };
    let error = if errors.is_empty() { None } else { Some(errors.join("; ")) };

    render_template(KubernetesTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        namespaces,
        selected_namespace,
        pods,
        deployments,
        error,
    })
}

pub async fn namespace_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<NamespaceForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return invalid_form(&state, &jar, "Namespace name is required", "/kubernetes");
    }
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::create_namespace(&api, name, &parse_labels(&form.labels)).await;
    finish_action(
        &state,
        &jar,
        result,
        "Namespace created successfully",
        "Failed to create namespace",
        &back_to(name),
    )
}

pub async fn namespace_delete_post(State(state): State<AppState>, jar: CookieJar, Path(ns): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::delete_namespace(&api, &ns).await;
    finish_action(
        &state,
        &jar,
        result,
        "Namespace deleted successfully",
        "Failed to delete namespace",
        "/kubernetes",
    )
}

pub async fn pod_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(ns): Path<String>,
    Form(form): Form<WorkloadForm>,
) -> Response {
    let back = back_to(&ns);
    if form.name.trim().is_empty() || form.image.trim().is_empty() {
        return invalid_form(&state, &jar, "Name and image are required", &back);
    }
    let pod = NewPod {
        name: form.name,
        image: form.image,
        labels: parse_labels(&form.labels),
        resources: form.resources.into(),
    };
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::create_pod(&api, &ns, &pod).await;
    finish_action(&state, &jar, result, "Pod created successfully", "Failed to create pod", &back)
}

pub async fn pod_delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((ns, name)): Path<(String, String)>,
) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::delete_pod(&api, &ns, &name).await;
    finish_action(
        &state,
        &jar,
        result,
        "Pod deleted successfully",
        "Failed to delete pod",
        &back_to(&ns),
    )
}

pub async fn pod_resources_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((ns, name)): Path<(String, String)>,
    Form(form): Form<ResourceFields>,
) -> Response {
    let back = back_to(&ns);
    let resources = ResourceSpec::from(form);
    if resources.is_empty() {
        return invalid_form(&state, &jar, "Enter at least one resource value", &back);
    }
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::update_pod_resources(&api, &ns, &name, &resources).await;
    finish_action(
        &state,
        &jar,
        result,
        "Pod resources updated",
        "Failed to update pod resources",
        &back,
    )
}

pub async fn deployment_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(ns): Path<String>,
    Form(form): Form<WorkloadForm>,
) -> Response {
    let back = back_to(&ns);
    if form.name.trim().is_empty() || form.image.trim().is_empty() {
        return invalid_form(&state, &jar, "Name and image are required", &back);
    }
    let deployment = NewDeployment {
        name: form.name,
        image: form.image,
        replicas: parse_optional_u32(form.replicas.as_deref()).unwrap_or(1),
        labels: parse_labels(&form.labels),
        resources: form.resources.into(),
    };
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::create_deployment(&api, &ns, &deployment).await;
    finish_action(
        &state,
        &jar,
        result,
        "Deployment created successfully",
        "Failed to create deployment",
        &back,
    )
}

pub async fn deployment_delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((ns, name)): Path<(String, String)>,
) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::delete_deployment(&api, &ns, &name).await;
    finish_action(
        &state,
        &jar,
        result,
        "Deployment deleted successfully",
        "Failed to delete deployment",
        &back_to(&ns),
    )
}

pub async fn deployment_scale_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((ns, name)): Path<(String, String)>,
    Form(form): Form<ScaleForm>,
) -> Response {
    let back = back_to(&ns);
    let Some(replicas) = parse_optional_u32(Some(&form.replicas)) else {
        return invalid_form(&state, &jar, "Replicas must be a non-negative number", &back);
    };
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::scale_deployment(&api, &ns, &name, replicas).await;
    let success = format!("Deployment scaled to {} replicas", replicas);
    finish_action(&state, &jar, result, &success, "Failed to scale deployment", &back)
}

pub async fn deployment_image_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((ns, name)): Path<(String, String)>,
    Form(form): Form<ImageForm>,
) -> Response {
    let back = back_to(&ns);
    if form.image.trim().is_empty() {
        return invalid_form(&state, &jar, "Image is required", &back);
    }
    let api = api_from_jar(&state, &jar);
    let result = api::kubernetes::update_deployment_image(&api, &ns, &name, &form.image).await;
    finish_action(
        &state,
        &jar,
        result,
        "Deployment image updated",
        "Failed to update deployment image",
        &back,
    )
}
