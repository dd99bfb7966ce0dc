//! REST client for the educational-platform backend.
//!
//! Everything goes through [`ApiClient`]; the submodules are thin typed
//! wrappers over one endpoint family each.

pub mod auth;
pub mod client;
pub mod container_templates;
pub mod containers;
pub mod error;
pub mod images;
pub mod kubernetes;
pub mod ssh;
pub mod system;
pub mod users;

pub use auth::{login, LoginResponse};
pub use client::{api_call, set_silent, ApiClient};
pub use error::ApiError;
pub use kubernetes::{NewDeployment, NewPod, ResourceSpec};
