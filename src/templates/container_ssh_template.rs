use askama::Template;
use crate::models::{CurrentUser, Flash, SshInfo};

/// SSH details and recent logs for one container.
#[derive(Template)]
#[template(path = "container_ssh.html")]
pub struct ContainerSshTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub container_id: String,
    pub info: Option<SshInfo>,
    pub logs: Option<String>,
    pub error: Option<String>,
}

crate::impl_page_context!(ContainerSshTemplate);
