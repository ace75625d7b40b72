//! Election store facade
//!
//! [`ElectionStore`] owns the single database connection and the store
//! configuration. Mutations are validated before any statement runs; every
//! database call is bounded by the store's deadline. Dropping a timed-out
//! call cancels the in-flight statement.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::{StoreConfig, VotePolicy};
use crate::db::models::{
    Candidate, CandidateInput, Changed, Inserted, NewCandidate, NewParty, NewVote, Party,
    PartyAssignment, PartyInput, TallyRow, VoteInput,
};
use crate::db::{candidates, init, parties, tally, votes};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ElectionStore {
    pool: SqlitePool,
    config: StoreConfig,
    deadline: Option<Duration>,
}

impl ElectionStore {
    /// Wrap an already-initialized pool
    pub fn new(pool: SqlitePool, config: StoreConfig) -> Self {
        let deadline = match config.operation_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        Self {
            pool,
            config,
            deadline,
        }
    }

    /// Open or create the database file
    pub async fn open(db_path: &Path, config: StoreConfig) -> Result<Self> {
        let pool = init::init_database(db_path, &config).await?;
        Ok(Self::new(pool, config))
    }

    /// Private in-memory store
    pub async fn open_in_memory(config: StoreConfig) -> Result<Self> {
        let pool = init::connect_memory(&config).await?;
        Ok(Self::new(pool, config))
    }

    /// Handle sharing this connection with a caller-supplied deadline
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => operation.await,
        }
    }

    // ------------------------------------------------------------------
    // Candidates
    // ------------------------------------------------------------------

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.bounded(candidates::list_candidates(&self.pool)).await
    }

    /// `None` when no candidate has this id
    pub async fn get_candidate(&self, id: i64) -> Result<Option<Candidate>> {
        self.bounded(candidates::get_candidate(&self.pool, id)).await
    }

    pub async fn create_candidate(&self, input: CandidateInput) -> Result<Inserted<NewCandidate>> {
        let candidate = input.into_new()?;
        self.bounded(candidates::insert_candidate(&self.pool, candidate)).await
    }

    /// Zero changes means no candidate has this id
    pub async fn update_candidate_party(&self, id: i64, input: PartyAssignment) -> Result<Changed> {
        let party_id = input.into_party_id()?;
        self.bounded(candidates::update_candidate_party(&self.pool, id, party_id)).await
    }

    pub async fn delete_candidate(&self, id: i64) -> Result<Changed> {
        self.bounded(candidates::delete_candidate(&self.pool, id)).await
    }

    // ------------------------------------------------------------------
    // Parties
    // ------------------------------------------------------------------

    pub async fn list_parties(&self) -> Result<Vec<Party>> {
        self.bounded(parties::list_parties(&self.pool)).await
    }

    pub async fn get_party(&self, id: i64) -> Result<Option<Party>> {
        self.bounded(parties::get_party(&self.pool, id)).await
    }

    pub async fn create_party(&self, input: PartyInput) -> Result<Inserted<NewParty>> {
        let party = input.into_new()?;
        self.bounded(parties::insert_party(&self.pool, party)).await
    }

    pub async fn delete_party(&self, id: i64) -> Result<Changed> {
        self.bounded(parties::delete_party(&self.pool, id)).await
    }

    // ------------------------------------------------------------------
    // Votes
    // ------------------------------------------------------------------

    /// Record a ballot according to the configured [`VotePolicy`]
    pub async fn cast_vote(&self, input: VoteInput) -> Result<Inserted<NewVote>> {
        let vote = input.into_new()?;

        match self.config.vote_policy {
            VotePolicy::Unrestricted => self.bounded(votes::insert_vote(&self.pool, vote)).await,
            VotePolicy::OneVotePerVoter => {
                self.bounded(votes::insert_vote_once(&self.pool, vote)).await
            }
        }
    }

    /// Per-candidate vote counts, highest first
    pub async fn tally(&self) -> Result<Vec<TallyRow>> {
        self.bounded(tally::tally_votes(&self.pool)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_timeout_disables_deadline() {
        let store = ElectionStore::open_in_memory(StoreConfig {
            operation_timeout_ms: 0,
            ..StoreConfig::default()
        })
        .await
        .unwrap();

        assert_eq!(store.deadline(), None);
        assert!(store.list_candidates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_deadline_shares_connection() {
        let store = ElectionStore::open_in_memory(StoreConfig::default())
            .await
            .unwrap();
        let bounded = store.with_deadline(Duration::from_secs(2));

        let created = bounded
            .create_party(PartyInput {
                name: Some("Independent".to_string()),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(bounded.deadline(), Some(Duration::from_secs(2)));
        assert!(store.get_party(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deadline_expires_while_connection_busy() {
        let store = ElectionStore::open_in_memory(StoreConfig::default())
            .await
            .unwrap();

        // Hold the only connection so the next statement cannot start
        let _held = store.pool().acquire().await.unwrap();

        let err = store
            .with_deadline(Duration::from_millis(50))
            .tally()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(limit) if limit == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_validation_runs_before_store() {
        let store = ElectionStore::open_in_memory(StoreConfig::default())
            .await
            .unwrap();

        // Validation must fail even though the connection is unavailable
        let _held = store.pool().acquire().await.unwrap();

        let err = store
            .with_deadline(Duration::from_millis(50))
            .cast_vote(VoteInput::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(ref m) if m.len() == 2));
    }
}
