//! `labdash`: a dashboard and command-line client for Kubernetes-backed
//! student development containers.
//!
//! The web dashboard ([`routes::build_app`]) and the `labdash` CLI share the
//! same API client, session handling and view models.

pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod poll;
pub mod routes;
pub mod services;
pub mod session;
pub mod templates;
pub mod utils;

pub use routes::build_app;

/// Stylesheet embedded in the binary; `serve --stylesheet` overrides it.
pub const DEFAULT_STYLES: &str = include_str!("../static/styles.css");
