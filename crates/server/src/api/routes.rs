use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{handlers, jobs, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    // `/` serves index.html, `/static/*` the assets next to it
    let index = ServeFile::new(server.static_dir.join("index.html"));
    let assets = ServeDir::new(&server.static_dir);
    let max_upload = server.max_upload_bytes;

    Router::new()
        // Jobs
        .route("/upload", post(jobs::upload))
        .route("/status/{id}", get(jobs::status))
        .route("/download/{id}", get(jobs::download))
        // Health and metrics
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        // Frontend
        .route_service("/", index)
        .nest_service("/static", assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .with_state(state)
}
