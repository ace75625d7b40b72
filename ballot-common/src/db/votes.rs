//! Vote recording
//!
//! Votes are append-only. Neither path checks that `candidate_id` names an
//! existing candidate; that is left to the store's foreign-key setting.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::models::{Inserted, NewVote};
use crate::{Error, Result};

/// Append a vote without looking for an earlier vote by the same voter
pub async fn insert_vote(pool: &SqlitePool, vote: NewVote) -> Result<Inserted<NewVote>> {
    let result = sqlx::query("INSERT INTO votes (voter_id, candidate_id) VALUES (?, ?)")
        .bind(&vote.voter_id)
        .bind(vote.candidate_id)
        .execute(pool)
        .await
        .map_err(|e| duplicate_or_database(e, &vote.voter_id))?;

    let id = result.last_insert_rowid();
    debug!(id, candidate_id = vote.candidate_id, "Recorded vote");

    Ok(Inserted { id, data: vote })
}

/// Append a vote only if this voter has not voted yet
///
/// The lookup and the insert share one transaction, so a rejected ballot
/// leaves no row behind.
pub async fn insert_vote_once(pool: &SqlitePool, vote: NewVote) -> Result<Inserted<NewVote>> {
    let mut tx = pool.begin().await?;

    if count_votes_by_voter(&mut *tx, &vote.voter_id).await? > 0 {
        tx.rollback().await?;
        return Err(Error::DuplicateVote(vote.voter_id));
    }

    let result = sqlx::query("INSERT INTO votes (voter_id, candidate_id) VALUES (?, ?)")
        .bind(&vote.voter_id)
        .bind(vote.candidate_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_or_database(e, &vote.voter_id))?;

    tx.commit().await?;

    let id = result.last_insert_rowid();
    debug!(id, candidate_id = vote.candidate_id, "Recorded first vote for voter");

    Ok(Inserted { id, data: vote })
}

/// Number of votes recorded for a voter
pub async fn count_votes_by_voter(conn: &mut SqliteConnection, voter_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE voter_id = ?")
        .bind(voter_id)
        .fetch_one(conn)
        .await?;

    Ok(count)
}

fn duplicate_or_database(error: sqlx::Error, voter_id: &str) -> Error {
    match error {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            Error::DuplicateVote(voter_id.to_string())
        }
        other => Error::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::init::connect_memory;

    fn ballot(voter_id: &str) -> NewVote {
        NewVote {
            voter_id: voter_id.to_string(),
            candidate_id: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_vote_allows_repeat_voter() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();

        let first = insert_vote(&pool, ballot("v1")).await.unwrap();
        let second = insert_vote(&pool, ballot("v1")).await.unwrap();

        assert_ne!(first.id, second.id);
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(count_votes_by_voter(&mut conn, "v1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_vote_once_rejects_repeat_voter() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();

        insert_vote_once(&pool, ballot("v1")).await.unwrap();
        let err = insert_vote_once(&pool, ballot("v1")).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateVote(ref voter) if voter == "v1"));
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(count_votes_by_voter(&mut conn, "v1").await.unwrap(), 1);
        assert_eq!(count_votes_by_voter(&mut conn, "v2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unique_index_maps_to_duplicate_vote() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();
        sqlx::query("CREATE UNIQUE INDEX uq_votes_voter ON votes(voter_id)")
            .execute(&pool)
            .await
            .unwrap();

        insert_vote(&pool, ballot("v9")).await.unwrap();
        let err = insert_vote(&pool, ballot("v9")).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateVote(_)));
    }
}
