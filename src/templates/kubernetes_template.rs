use askama::Template;
use crate::models::{CurrentUser, DeploymentView, Flash, NamespaceView, PodView};

#[derive(Template)]
#[template(path = "kubernetes.html")]
pub struct KubernetesTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub namespaces: Vec<NamespaceView>,
    pub selected_namespace: String,
    pub pods: Vec<PodView>,
    pub deployments: Vec<DeploymentView>,
    pub error: Option<String>,
}

crate::impl_page_context!(KubernetesTemplate);
