use askama::Template;
use crate::models::{ContainerTemplatePayload, CurrentUser, Flash};

/// Create form when `template_id` is `None`, edit form otherwise.
#[derive(Template)]
#[template(path = "template_edit.html")]
pub struct TemplateEditTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub template_id: Option<String>,
    pub form: ContainerTemplatePayload,
    pub env_text: String,
    pub args_text: String,
    pub error: Option<String>,
}

crate::impl_page_context!(TemplateEditTemplate);
