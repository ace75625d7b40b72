//! ballot-api library - HTTP adapter over the election store
//!
//! Maps each store operation onto one route. Any unmatched path is a bare 404.

use axum::{http::StatusCode, Router};
use ballot_common::ElectionStore;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single store connection, shared by every request
    pub store: ElectionStore,
}

impl AppState {
    pub fn new(store: ElectionStore) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::candidate_routes())
        .merge(api::party_routes())
        .merge(api::vote_routes())
        .merge(api::health_routes())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}
