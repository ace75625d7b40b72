//! Party endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ballot_common::db::models::PartyInput;
use serde_json::{json, Value};

use super::Payload;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/parties
pub async fn list_parties(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let parties = state.store.list_parties().await.map_err(ApiError::listing)?;

    Ok(Json(json!({
        "message": "success",
        "data": parties,
    })))
}

/// GET /api/party/:id
pub async fn get_party(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let party = state.store.get_party(id).await?;

    Ok(Json(json!({
        "message": "success",
        "data": party,
    })))
}

/// POST /api/party
pub async fn create_party(
    State(state): State<AppState>,
    Payload(input): Payload<PartyInput>,
) -> ApiResult<Json<Value>> {
    let inserted = state.store.create_party(input).await?;

    Ok(Json(json!({
        "message": "success",
        "data": inserted.data,
        "id": inserted.id,
    })))
}

/// DELETE /api/party/:id
///
/// Candidates affiliated with the party keep their `party_id`.
pub async fn delete_party(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let changed = state.store.delete_party(id).await?;

    if !changed.matched() {
        return Err(ApiError::NotFound("Party not found".to_string()));
    }

    Ok(Json(json!({
        "message": "deleted",
        "changes": changed.changes,
        "id": id,
    })))
}

pub fn party_routes() -> Router<AppState> {
    Router::new()
        .route("/api/parties", get(list_parties))
        .route("/api/party", post(create_party))
        .route("/api/party/:id", get(get_party).delete(delete_party))
}
