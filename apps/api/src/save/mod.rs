//! Save proxy service — stamps a timestamp and relays submissions to the store.

pub mod handlers;
pub mod normalize;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::SaveState;

pub fn build_router(state: SaveState) -> Router {
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/save", post(handlers::handle_save))
        .with_state(state)
}
