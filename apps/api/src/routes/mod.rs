pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/parse_resume/", post(handlers::handle_parse_resume))
        .route("/parse_resume", post(handlers::handle_parse_resume))
        .with_state(state)
}
