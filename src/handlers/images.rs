use axum::{
    extract::{Form, Path, Query, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::{AppState, ImageTemplatePayload};
use crate::templates::ImagesTemplate;

use super::helpers::{
    api_from_jar, build_template_globals, finish_action, invalid_form, load_error, render_template, session_expired,
    TemplateGlobals,
};

#[derive(Deserialize, Default)]
pub struct ImagesQuery {
    #[serde(default)]
    pub technology: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageForm {
    pub name: String,
    pub docker_image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub version: String,
}

impl From<ImageForm> for ImageTemplatePayload {
    fn from(f: ImageForm) -> Self {
        Self {
            name: f.name.trim().to_string(),
            docker_image: f.docker_image.trim().to_string(),
            description: f.description.trim().to_string(),
            technology: f.technology.trim().to_string(),
            version: f.version.trim().to_string(),
        }
    }
}

pub async fn images_get(State(state): State<AppState>, jar: CookieJar, Query(q): Query<ImagesQuery>) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let api = api_from_jar(&state, &jar);
    let (images, technologies, technology_versions) = tokio::join!(
        api::images::list_images(&api),
        api::images::list_technologies(&api),
        api::images::list_technology_versions(&api),
    );

    let technology_filter = q.technology.unwrap_or_default();
    let (images, error) = match images {
        Ok(list) => {
            let filter = technology_filter.trim();
            let list = if filter.is_empty() {
                list
            } else {
                list.into_iter()
                    .filter(|i| {
                        i.technology
                            .as_deref()
                            .map(|t| t.eq_ignore_ascii_case(filter))
                            .unwrap_or(false)
                    })
                    .collect()
            };
            (list, None)
        }
        Err(ApiError::Unauthorized) => return session_expired(&state, &jar, "/images"),
        Err(e) => (Vec::new(), Some(load_error("image templates", &e))),
    };
    let technologies = crate::services::degrade("technologies", technologies).unwrap_or_default();
    let technology_versions =
        crate::services::degrade("technology versions", technology_versions).unwrap_or_default();

    render_template(ImagesTemplate {
        current_user,
        api_hostname,
        base_url,
        flash_messages,
        has_flash_messages,
        images,
        technologies,
        technology_versions,
        technology_filter,
        error,
    })
}

pub async fn image_create_post(State(state): State<AppState>, jar: CookieJar, Form(form): Form<ImageForm>) -> Response {
    let payload = ImageTemplatePayload::from(form);
    if let Err(message) = payload.validate() {
        return invalid_form(&state, &jar, &message, "/images");
    }
    let api = api_from_jar(&state, &jar);
    let result = api::images::create_image(&api, &payload).await;
    finish_action(
        &state,
        &jar,
        result,
        "Image template created successfully",
        "Failed to create image template",
        "/images",
    )
}

pub async fn image_build_post(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::images::build_image(&api, &id).await;
    finish_action(&state, &jar, result, "Image build started", "Failed to build image", "/images")
}

pub async fn image_delete_post(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let api = api_from_jar(&state, &jar);
    let result = api::images::delete_image(&api, &id).await;
    finish_action(
        &state,
        &jar,
        result,
        "Image template deleted successfully",
        "Failed to delete image template",
        "/images",
    )
}
