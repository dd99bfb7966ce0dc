// Shared page fields rendered by base.html
pub mod page_context;
pub use page_context::PageContext;

// Individual template files
pub mod login_template;
pub mod dashboard_template;
pub mod containers_template;
pub mod container_ssh_template;
pub mod templates_page_template;
pub mod template_edit_template;
pub mod images_template;
pub mod pods_template;
pub mod kubernetes_template;
pub mod ssh_template;
pub mod users_page_template;
pub mod not_found_template;

// Re-export all templates for convenient access
pub use login_template::LoginTemplate;
pub use dashboard_template::DashboardTemplate;
pub use containers_template::ContainersTemplate;
pub use container_ssh_template::ContainerSshTemplate;
pub use templates_page_template::TemplatesPageTemplate;
pub use template_edit_template::TemplateEditTemplate;
pub use images_template::ImagesTemplate;
pub use pods_template::PodsTemplate;
pub use kubernetes_template::KubernetesTemplate;
pub use ssh_template::SshTemplate;
pub use users_page_template::UsersPageTemplate;
pub use not_found_template::NotFoundTemplate;
