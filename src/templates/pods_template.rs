use askama::Template;
use crate::models::{CurrentUser, DeploymentView, Flash, PodView};

#[derive(Template)]
#[template(path = "pods.html")]
pub struct PodsTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub pods: Vec<PodView>,
    pub deployments: Vec<DeploymentView>,
    pub all_namespaces: bool,
    pub error: Option<String>,
    pub refresh_secs: u64,
}

crate::impl_page_context!(PodsTemplate);
