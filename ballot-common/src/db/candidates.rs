//! Candidate database operations
//!
//! Reads join each candidate with its party's name. A `party_id` that no
//! longer matches a party reads back with `party_name = None`.

use sqlx::SqlitePool;
use tracing::debug;

use super::models::{Candidate, Changed, Inserted, NewCandidate};
use crate::Result;

const SELECT_CANDIDATES: &str = r#"
    SELECT candidates.id, candidates.first_name, candidates.last_name,
           candidates.industry_connected, candidates.party_id,
           parties.name AS party_name
    FROM candidates
    LEFT JOIN parties ON candidates.party_id = parties.id
"#;

/// List every candidate, ordered by id
pub async fn list_candidates(pool: &SqlitePool) -> Result<Vec<Candidate>> {
    let sql = format!("{} ORDER BY candidates.id ASC", SELECT_CANDIDATES);

    let candidates = sqlx::query_as::<_, Candidate>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(candidates)
}

/// Load a single candidate by id
pub async fn get_candidate(pool: &SqlitePool, id: i64) -> Result<Option<Candidate>> {
    let sql = format!("{} WHERE candidates.id = ?", SELECT_CANDIDATES);

    let candidate = sqlx::query_as::<_, Candidate>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(candidate)
}

/// Insert a validated candidate
pub async fn insert_candidate(
    pool: &SqlitePool,
    candidate: NewCandidate,
) -> Result<Inserted<NewCandidate>> {
    let result = sqlx::query(
        r#"
        INSERT INTO candidates (first_name, last_name, industry_connected, party_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&candidate.first_name)
    .bind(&candidate.last_name)
    .bind(candidate.industry_connected)
    .bind(candidate.party_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, "Inserted candidate");

    Ok(Inserted { id, data: candidate })
}

/// Point a candidate at a different party. Only `party_id` is written.
pub async fn update_candidate_party(pool: &SqlitePool, id: i64, party_id: i64) -> Result<Changed> {
    let result = sqlx::query("UPDATE candidates SET party_id = ? WHERE id = ?")
        .bind(party_id)
        .bind(id)
        .execute(pool)
        .await?;

    let changes = result.rows_affected();
    debug!(id, party_id, changes, "Updated candidate party");

    Ok(Changed { changes })
}

pub async fn delete_candidate(pool: &SqlitePool, id: i64) -> Result<Changed> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    let changes = result.rows_affected();
    debug!(id, changes, "Deleted candidate");

    Ok(Changed { changes })
}
