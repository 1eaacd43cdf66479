//! Keyword store service — CRUD over the four-table observation schema.

pub mod handlers;
pub mod queries;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::StoreState;

pub fn build_router(state: StoreState) -> Router {
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/insert", post(handlers::handle_insert))
        .route("/keywords", post(handlers::handle_keywords))
        .with_state(state)
}
