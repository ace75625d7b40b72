//! Vote tally aggregation
//!
//! Only candidates with at least one vote appear. Rows are ordered by vote
//! count descending, then candidate id ascending.

use sqlx::SqlitePool;

use super::models::TallyRow;
use crate::Result;

pub async fn tally_votes(pool: &SqlitePool) -> Result<Vec<TallyRow>> {
    let rows = sqlx::query_as::<_, TallyRow>(
        r#"
        SELECT candidates.id, candidates.first_name, candidates.last_name,
               candidates.industry_connected, candidates.party_id,
               parties.name AS party_name,
               COUNT(votes.candidate_id) AS count
        FROM votes
        JOIN candidates ON votes.candidate_id = candidates.id
        LEFT JOIN parties ON candidates.party_id = parties.id
        GROUP BY votes.candidate_id
        ORDER BY count DESC, candidates.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::init::connect_memory;

    async fn seed(pool: &SqlitePool) {
        sqlx::query("INSERT INTO parties (id, name) VALUES (1, 'Independent')")
            .execute(pool)
            .await
            .unwrap();
        for (id, first) in [(1, "Ada"), (2, "Charles"), (3, "Mary")] {
            sqlx::query(
                "INSERT INTO candidates (id, first_name, last_name, industry_connected, party_id) VALUES (?, ?, 'Test', 0, ?)",
            )
            .bind(id)
            .bind(first)
            .bind(if id == 1 { Some(1i64) } else { None })
            .execute(pool)
            .await
            .unwrap();
        }
    }

    async fn vote(pool: &SqlitePool, voter: &str, candidate_id: i64) {
        sqlx::query("INSERT INTO votes (voter_id, candidate_id) VALUES (?, ?)")
            .bind(voter)
            .bind(candidate_id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tally_orders_by_count_then_id() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();
        seed(&pool).await;

        vote(&pool, "a", 2).await;
        vote(&pool, "b", 2).await;
        vote(&pool, "c", 3).await;
        vote(&pool, "d", 1).await;

        let rows = tally_votes(&pool).await.unwrap();
        let order: Vec<(i64, i64)> = rows.iter().map(|r| (r.id, r.count)).collect();

        assert_eq!(order, vec![(2, 2), (1, 1), (3, 1)]);
        assert_eq!(rows[1].party_name.as_deref(), Some("Independent"));
        assert_eq!(rows[0].party_name, None);
    }

    #[tokio::test]
    async fn test_tally_excludes_candidates_without_votes() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();
        seed(&pool).await;

        vote(&pool, "a", 3).await;

        let rows = tally_votes(&pool).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name, "Mary");
    }

    #[tokio::test]
    async fn test_tally_skips_votes_for_unknown_candidates() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();
        seed(&pool).await;

        vote(&pool, "a", 42).await;

        assert!(tally_votes(&pool).await.unwrap().is_empty());
    }
}
