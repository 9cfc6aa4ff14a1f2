use super::{
    handlers::{comments, health},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Threads and stats per post
        .route(
            "/api/v1/posts/{slug}/comments",
            get(comments::list_thread),
        )
        .route(
            "/api/v1/posts/{slug}/comments/stats",
            get(comments::get_stats),
        )
        // Comment lifecycle
        .route("/api/v1/comments", post(comments::create_comment))
        .route(
            "/api/v1/comments/{id}",
            axum::routing::patch(comments::update_comment).delete(comments::delete_comment),
        )
        // Reactions
        .route("/api/v1/comments/{id}/react", post(comments::react))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
