use askama::Template;
use crate::models::{CurrentUser, Flash};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub error: Option<String>,
    pub username: String,
    pub next: String,
}

crate::impl_page_context!(LoginTemplate);
