mod event;
mod handler;

use crate::pipeline::Pipeline;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handler::webhook))
        .route("/health", get(handler::health))
        .with_state(state)
}
