//! Narrative generator service — keyword aggregation and the two-stage
//! completion flow.

pub mod generator;
pub mod handlers;
pub mod prompts;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::GenerateState;

pub fn build_router(state: GenerateState) -> Router {
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/generate", post(handlers::handle_generate))
        .with_state(state)
}
