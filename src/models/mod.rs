pub mod app_state;
pub mod container_instance;
pub mod container_template;
pub mod current_user;
pub mod dashboard;
pub mod flash;
pub mod image_template;
pub mod kube;
pub mod role;
pub mod ssh_connection;
pub mod user;
pub mod wire;

pub use app_state::AppState;
pub use container_instance::{ContainerInstance, ContainerStatus, NewContainer};
pub use container_template::{ContainerTemplate, ContainerTemplatePayload};
pub use current_user::CurrentUser;
pub use dashboard::{Activity, DashboardStats, SystemStatus};
pub use flash::{Flash, FlashLevel};
pub use image_template::{ImageTemplate, ImageTemplatePayload};
pub use kube::{DeploymentView, NamespaceView, PodView};
pub use role::{Role, RoleGate};
pub use ssh_connection::{SshConnection, SshInfo};
pub use user::{NewUser, User, UserUpdate};
