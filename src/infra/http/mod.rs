mod error;
mod middleware;
mod outline;

pub use error::OutlineErrorBody;
pub use outline::{MARKDOWN_CONTENT_TYPE, OUTLINE_PATH};

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};

use crate::application::outline::OutlineService;

use self::middleware::{apply_cors_headers, log_responses, set_request_context};

pub const HEALTH_PATH: &str = "/_health";

#[derive(Clone)]
pub struct HttpState {
    pub outlines: Arc<OutlineService>,
}

impl HttpState {
    pub fn new(outlines: OutlineService) -> Self {
        Self {
            outlines: Arc::new(outlines),
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route(OUTLINE_PATH, get(outline::outline))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_responses))
        .layer(axum::middleware::from_fn(set_request_context))
        .layer(axum::middleware::from_fn(apply_cors_headers))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
