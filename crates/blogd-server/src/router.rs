use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use blogd_protocol::endpoints;

use crate::handler::{self, AppState};

/// Build the axum router with all blogd endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::CREATE_BLOG, post(handler::create_blog_handler))
        .route(endpoints::FIND_BLOG, post(handler::find_blog_handler))
        .route(endpoints::UPDATE_BLOG, post(handler::update_blog_handler))
        .route(endpoints::DELETE_BLOG, post(handler::delete_blog_handler))
        .route(
            endpoints::LIST_BLOGS,
            get(handler::list_blogs_handler).post(handler::list_blogs_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
