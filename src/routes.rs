use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, middleware};
use crate::models::AppState;

/// The dashboard router. Every page except login sits behind the session
/// guard; management pages additionally require a staff or admin role.
pub fn build_app(state: AppState) -> Router {
    let staff_routes = Router::new()
        .route("/templates", get(handlers::templates_get).post(handlers::template_create_post))
        .route("/templates/new", get(handlers::template_new_get))
        .route(
            "/templates/:id/edit",
            get(handlers::template_edit_get).post(handlers::template_update_post),
        )
        .route("/templates/:id/delete", post(handlers::template_delete_post))
        .route("/images", get(handlers::images_get).post(handlers::image_create_post))
        .route("/images/:id/build", post(handlers::image_build_post))
        .route("/images/:id/delete", post(handlers::image_delete_post))
        .route("/kubernetes", get(handlers::kubernetes_get))
        .route("/kubernetes/namespaces", post(handlers::namespace_create_post))
        .route("/kubernetes/namespaces/:ns/delete", post(handlers::namespace_delete_post))
        .route("/kubernetes/namespaces/:ns/pods", post(handlers::pod_create_post))
        .route("/kubernetes/namespaces/:ns/pods/:name/delete", post(handlers::pod_delete_post))
        .route(
            "/kubernetes/namespaces/:ns/pods/:name/resources",
            post(handlers::pod_resources_post),
        )
        .route("/kubernetes/namespaces/:ns/deployments", post(handlers::deployment_create_post))
        .route(
            "/kubernetes/namespaces/:ns/deployments/:name/delete",
            post(handlers::deployment_delete_post),
        )
        .route(
            "/kubernetes/namespaces/:ns/deployments/:name/scale",
            post(handlers::deployment_scale_post),
        )
        .route(
            "/kubernetes/namespaces/:ns/deployments/:name/image",
            post(handlers::deployment_image_post),
        )
        .route("/users", get(handlers::users_list))
        .route_layer(from_fn_with_state(state.clone(), middleware::staff_middleware));

    let admin_routes = Router::new()
        .route("/users/new", post(handlers::users_create))
        .route("/users/:id/update", post(handlers::users_update))
        .route("/users/:id/delete", post(handlers::users_delete))
        .route_layer(from_fn_with_state(state.clone(), middleware::admin_middleware));

    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard_get))
        .route("/containers", get(handlers::containers_get).post(handlers::container_create_post))
        .route("/containers/:id/ssh", get(handlers::container_ssh_get))
        .route("/containers/:id/:action", post(handlers::container_action_post))
        .route("/pods", get(handlers::pods_get))
        .route("/ssh", get(handlers::ssh_get))
        .route("/ssh/connect/:container_id", post(handlers::ssh_connect_post))
        .route("/ssh/:id/revoke", post(handlers::ssh_revoke_post))
        .merge(staff_routes)
        .merge(admin_routes)
        .route_layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    let static_routes = Router::new()
        .route("/static/styles.css", get(handlers::styles_css))
        .layer(ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )));

    Router::new()
        .route("/", get(handlers::root_get))
        .route("/login", get(handlers::login_get).post(handlers::login_post))
        .route("/logout", post(handlers::logout_post))
        .merge(static_routes)
        .merge(protected_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
