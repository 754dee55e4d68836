//! # Market Repository
//!
//! Database operations for markets.
//!
//! A market is the top of the ownership chain: deleting one cascades to its
//! shops, their listings, and the player sessions that joined it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use emporium_core::Market;

const MARKET_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Repository for market database operations.
#[derive(Debug, Clone)]
pub struct MarketRepository {
    pool: SqlitePool,
}

impl MarketRepository {
    /// Creates a new MarketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MarketRepository { pool }
    }

    /// Creates a new market.
    pub async fn create(&self, name: &str, description: Option<&str>) -> DbResult<Market> {
        let now = Utc::now();
        let market = Market {
            id: generate_id(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %market.id, name = %market.name, "Creating market");

        sqlx::query(
            r#"
            INSERT INTO markets (id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&market.id)
        .bind(&market.name)
        .bind(&market.description)
        .bind(market.created_at)
        .bind(market.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(market)
    }

    /// Gets a market by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Market>> {
        let market = sqlx::query_as::<_, Market>(&format!(
            "SELECT {MARKET_COLUMNS} FROM markets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(market)
    }

    /// Lists all markets, newest first.
    pub async fn list(&self) -> DbResult<Vec<Market>> {
        let markets = sqlx::query_as::<_, Market>(&format!(
            "SELECT {MARKET_COLUMNS} FROM markets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(markets)
    }

    /// Updates a market's name and description.
    pub async fn update(&self, id: &str, name: &str, description: Option<&str>) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE markets SET name = ?2, description = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Market", id));
        }

        Ok(())
    }

    /// Deletes a market and, via cascade, everything it owns.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM markets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Market", id));
        }

        debug!(id = %id, "Deleted market");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_market() {
        let db = test_db().await;
        let repo = db.markets();

        let market = repo
            .create("Waterdeep Bazaar", Some("The city's open market"))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&market.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Waterdeep Bazaar");
        assert_eq!(loaded.description.as_deref(), Some("The city's open market"));
    }

    #[tokio::test]
    async fn test_get_missing_market() {
        let db = test_db().await;
        assert!(db.markets().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_market() {
        let db = test_db().await;
        let repo = db.markets();

        let market = repo.create("Old Name", None).await.unwrap();
        repo.update(&market.id, "New Name", Some("now with flavor"))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&market.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "New Name");
        assert_eq!(loaded.description.as_deref(), Some("now with flavor"));
    }

    #[tokio::test]
    async fn test_update_missing_market_is_not_found() {
        let db = test_db().await;
        let err = db.markets().update("nope", "x", None).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_delete_market() {
        let db = test_db().await;
        let repo = db.markets();

        let market = repo.create("Doomed", None).await.unwrap();
        repo.delete(&market.id).await.unwrap();
        assert!(repo.get_by_id(&market.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_markets() {
        let db = test_db().await;
        let repo = db.markets();

        repo.create("One", None).await.unwrap();
        repo.create("Two", None).await.unwrap();

        let markets = repo.list().await.unwrap();
        assert_eq!(markets.len(), 2);
    }
}
