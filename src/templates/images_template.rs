use askama::Template;
use crate::models::{CurrentUser, Flash, ImageTemplate};

#[derive(Template)]
#[template(path = "images.html")]
pub struct ImagesTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub images: Vec<ImageTemplate>,
    pub technologies: Vec<String>,
    pub technology_versions: Vec<(String, Vec<String>)>,
    pub technology_filter: String,
    pub error: Option<String>,
}

crate::impl_page_context!(ImagesTemplate);
