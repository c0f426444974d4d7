//! API routes for the zip-starter server.

pub mod starter;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use zip_starter_core::Fetcher;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// Creates the router. Every path is served by the starter handler.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .fallback(starter::create_starter)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
