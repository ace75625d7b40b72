//! Party database operations

use sqlx::SqlitePool;
use tracing::debug;

use super::models::{Changed, Inserted, NewParty, Party};
use crate::Result;

pub async fn list_parties(pool: &SqlitePool) -> Result<Vec<Party>> {
    let parties = sqlx::query_as::<_, Party>(
        "SELECT id, name, description FROM parties ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(parties)
}

pub async fn get_party(pool: &SqlitePool, id: i64) -> Result<Option<Party>> {
    let party = sqlx::query_as::<_, Party>(
        "SELECT id, name, description FROM parties WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(party)
}

pub async fn insert_party(pool: &SqlitePool, party: NewParty) -> Result<Inserted<NewParty>> {
    let result = sqlx::query("INSERT INTO parties (name, description) VALUES (?, ?)")
        .bind(&party.name)
        .bind(&party.description)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    debug!(id, "Inserted party");

    Ok(Inserted { id, data: party })
}

/// Delete a party. Candidates referencing it keep their `party_id`.
pub async fn delete_party(pool: &SqlitePool, id: i64) -> Result<Changed> {
    let result = sqlx::query("DELETE FROM parties WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    let changes = result.rows_affected();
    debug!(id, changes, "Deleted party");

    Ok(Changed { changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::init::connect_memory;

    #[tokio::test]
    async fn test_party_crud() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();

        let inserted = insert_party(
            &pool,
            NewParty {
                name: "Independent".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let party = get_party(&pool, inserted.id).await.unwrap().unwrap();
        assert_eq!(party.name, "Independent");
        assert_eq!(list_parties(&pool).await.unwrap(), vec![party]);

        assert_eq!(delete_party(&pool, inserted.id).await.unwrap().changes, 1);
        assert_eq!(delete_party(&pool, inserted.id).await.unwrap().changes, 0);
        assert_eq!(get_party(&pool, inserted.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_party_leaves_candidate_reference() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();
        sqlx::query("INSERT INTO parties (id, name) VALUES (1, 'Whigs')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO candidates (first_name, last_name, industry_connected, party_id) VALUES ('Ada', 'Byron', 0, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        delete_party(&pool, 1).await.unwrap();

        let party_id: Option<i64> = sqlx::query_scalar("SELECT party_id FROM candidates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(party_id, Some(1));
    }
}
