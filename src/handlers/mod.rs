pub mod auth;
pub mod containers;
pub mod dashboard;
pub mod helpers;
pub mod images;
pub mod kubernetes;
pub mod middleware;
pub mod pods;
pub mod ssh;
pub mod system;
pub mod templates;
pub mod users;

pub use auth::{login_get, login_post, logout_post, root_get};
pub use containers::{container_action_post, container_create_post, container_ssh_get, containers_get};
pub use dashboard::dashboard_get;
pub use images::{image_build_post, image_create_post, image_delete_post, images_get};
pub use kubernetes::{
    deployment_create_post, deployment_delete_post, deployment_image_post, deployment_scale_post, kubernetes_get,
    namespace_create_post, namespace_delete_post, pod_create_post, pod_delete_post, pod_resources_post,
};
pub use pods::pods_get;
pub use ssh::{ssh_connect_post, ssh_get, ssh_revoke_post};
pub use system::{not_found, styles_css};
pub use templates::{template_create_post, template_delete_post, template_edit_get, template_new_get, template_update_post, templates_get};
pub use users::{users_create, users_delete, users_list, users_update};
