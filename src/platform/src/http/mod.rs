pub mod accounts;
pub mod analytics;
pub mod comments;
pub mod permissions;
pub mod projects;
pub mod tasks;

use std::sync::Arc;

use axum::middleware;
use axum::Extension;
use axum::Router;
use common::http::measure_request_response;
use common::http::print_request_response;
use metadata::MetadataProvider;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::PlatformProvider;

pub const API_PREFIX: &str = "/api/v1";

pub fn attach_routes(
    mut router: Router,
    md: &Arc<MetadataProvider>,
    platform: &Arc<PlatformProvider>,
) -> Router {
    let mut api = Router::new();
    api = permissions::attach_routes(api);
    api = accounts::attach_routes(api);
    api = projects::attach_routes(api);
    api = tasks::attach_routes(api);
    api = comments::attach_routes(api);
    api = analytics::attach_routes(api);

    router = router
        .nest(API_PREFIX, api)
        .layer(Extension(md.accounts.clone()))
        .layer(Extension(platform.accounts.clone()))
        .layer(Extension(platform.projects.clone()))
        .layer(Extension(platform.tasks.clone()))
        .layer(Extension(platform.comments.clone()))
        .layer(Extension(platform.analytics.clone()))
        .layer(Extension(platform.permissions.clone()))
        .layer(Extension(platform.auth.clone()));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(print_request_response))
        .layer(middleware::from_fn(measure_request_response))
}
