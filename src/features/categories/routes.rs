use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use crate::core::middleware::basic_auth_middleware;
use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create public routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories/{uuid}", get(handlers::get_category))
        .with_state(service)
}

/// Create admin routes for the categories feature
///
/// Note: Requires HTTP basic auth matching `credentials` ("username:password")
pub fn admin_routes(service: Arc<CategoryService>, credentials: Arc<String>) -> Router {
    Router::new()
        .route("/api/admin/categories/{uuid}", put(handlers::update_category))
        .layer(middleware::from_fn(basic_auth_middleware(
            credentials,
            "Catalog Admin",
        )))
        .with_state(service)
}
