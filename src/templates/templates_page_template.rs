use askama::Template;
use crate::models::{ContainerTemplate, CurrentUser, Flash};

#[derive(Template)]
#[template(path = "templates.html")]
pub struct TemplatesPageTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub templates: Vec<ContainerTemplate>,
    pub error: Option<String>,
    pub scope: String,
    pub search: String,
    pub category: String,
}

crate::impl_page_context!(TemplatesPageTemplate);
