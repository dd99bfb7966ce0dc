use askama::Template;
use crate::models::{CurrentUser, Flash};
use crate::services::ContainersPage;

#[derive(Template)]
#[template(path = "containers.html")]
pub struct ContainersTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub page: ContainersPage,
    pub is_staff: bool,
    pub refresh_secs: u64,
}

crate::impl_page_context!(ContainersTemplate);
