//! Candidate endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ballot_common::db::models::{CandidateInput, PartyAssignment};
use serde_json::{json, Value};

use super::Payload;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/candidates
pub async fn list_candidates(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let candidates = state
        .store
        .list_candidates()
        .await
        .map_err(ApiError::listing)?;

    Ok(Json(json!({
        "message": "success",
        "data": candidates,
    })))
}

/// GET /api/candidate/:id
///
/// An unknown id is a success with `"data": null`.
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let candidate = state.store.get_candidate(id).await?;

    Ok(Json(json!({
        "message": "success",
        "data": candidate,
    })))
}

/// POST /api/candidate
pub async fn create_candidate(
    State(state): State<AppState>,
    Payload(input): Payload<CandidateInput>,
) -> ApiResult<Json<Value>> {
    let inserted = state.store.create_candidate(input).await?;

    Ok(Json(json!({
        "message": "success",
        "data": inserted.data,
        "id": inserted.id,
    })))
}

/// PUT /api/candidate/:id
pub async fn update_candidate_party(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload(input): Payload<PartyAssignment>,
) -> ApiResult<Json<Value>> {
    let echo = json!({ "party_id": input.party_id });
    let changed = state.store.update_candidate_party(id, input).await?;

    if !changed.matched() {
        return Err(ApiError::NotFound("Candidate not found".to_string()));
    }

    Ok(Json(json!({
        "message": "success",
        "data": echo,
        "changes": changed.changes,
    })))
}

/// DELETE /api/candidate/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let changed = state.store.delete_candidate(id).await?;

    if !changed.matched() {
        return Err(ApiError::NotFound("Candidate not found".to_string()));
    }

    Ok(Json(json!({
        "message": "deleted",
        "changes": changed.changes,
        "id": id,
    })))
}

pub fn candidate_routes() -> Router<AppState> {
    Router::new()
        .route("/api/candidates", get(list_candidates))
        .route("/api/candidate", post(create_candidate))
        .route(
            "/api/candidate/:id",
            get(get_candidate)
                .put(update_candidate_party)
                .delete(delete_candidate),
        )
}
