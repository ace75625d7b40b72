//! Vote casting and tally endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use ballot_common::db::models::VoteInput;
use serde_json::{json, Value};

use super::Payload;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/vote
///
/// Under the one-vote-per-voter policy a repeat voter gets 409.
pub async fn cast_vote(
    State(state): State<AppState>,
    Payload(input): Payload<VoteInput>,
) -> ApiResult<Json<Value>> {
    let inserted = state.store.cast_vote(input).await?;

    Ok(Json(json!({
        "message": "success",
        "data": inserted.data,
        "id": inserted.id,
    })))
}

/// GET /api/votes
pub async fn tally_votes(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let tally = state.store.tally().await.map_err(ApiError::listing)?;

    Ok(Json(json!({
        "message": "success",
        "data": tally,
    })))
}

pub fn vote_routes() -> Router<AppState> {
    Router::new()
        .route("/api/vote", post(cast_vote))
        .route("/api/votes", get(tally_votes))
}
