use askama::Template;
use crate::models::{CurrentUser, Flash, SshConnection};

#[derive(Template)]
#[template(path = "ssh.html")]
pub struct SshTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub connections: Vec<SshConnection>,
    pub error: Option<String>,
}

crate::impl_page_context!(SshTemplate);
