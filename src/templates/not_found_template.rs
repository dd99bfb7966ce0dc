use askama::Template;
use crate::models::{CurrentUser, Flash};

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub path: String,
}

crate::impl_page_context!(NotFoundTemplate);
