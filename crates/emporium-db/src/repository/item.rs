//! # Library Item Repository
//!
//! Database operations for the shared item catalog.
//!
//! Catalog items carry the canonical single-denomination cost; shop listings
//! reference them and may override the price per shop.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use emporium_core::{ItemCost, LibraryItem};

const ITEM_COLUMNS: &str = "id, name, description, category, rarity, \
                            cost_amount, cost_denomination, created_at, updated_at";

/// Fields a caller supplies when creating a catalog item.
#[derive(Debug, Clone, Default)]
pub struct NewLibraryItem {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<String>,
    /// Canonical price; `None` leaves the item unpriced (not purchasable).
    pub cost: Option<ItemCost>,
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct LibraryItemRepository {
    pool: SqlitePool,
}

impl LibraryItemRepository {
    /// Creates a new LibraryItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LibraryItemRepository { pool }
    }

    /// Creates a catalog item.
    pub async fn create(&self, new: NewLibraryItem) -> DbResult<LibraryItem> {
        let now = Utc::now();
        let item = LibraryItem {
            id: generate_id(),
            name: new.name,
            description: new.description,
            category: new.category,
            rarity: new.rarity,
            cost_amount: new.cost.map(|c| c.amount),
            cost_denomination: new.cost.map(|c| c.denomination),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, "Creating library item");

        sqlx::query(
            r#"
            INSERT INTO library_items (
                id, name, description, category, rarity,
                cost_amount, cost_denomination, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.rarity)
        .bind(item.cost_amount)
        .bind(item.cost_denomination)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a catalog item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LibraryItem>> {
        let item = sqlx::query_as::<_, LibraryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM library_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Searches catalog items by name substring (case-insensitive).
    ///
    /// An empty query lists the catalog up to `limit`.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<LibraryItem>> {
        let query = query.trim();
        debug!(query = %query, limit = %limit, "Searching library items");

        let pattern = format!("%{query}%");
        let items = sqlx::query_as::<_, LibraryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM library_items
            WHERE name LIKE ?1 COLLATE NOCASE
            ORDER BY name
            LIMIT ?2
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Sets or clears the canonical cost.
    pub async fn update_cost(&self, id: &str, cost: Option<ItemCost>) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE library_items SET
                cost_amount = ?2, cost_denomination = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost.map(|c| c.amount))
        .bind(cost.map(|c| c.denomination))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Library item", id));
        }

        Ok(())
    }

    /// Updates a catalog item's descriptive fields.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
        rarity: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE library_items SET
                name = ?2, description = ?3, category = ?4, rarity = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(rarity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Library item", id));
        }

        Ok(())
    }

    /// Deletes a catalog item. Listings keep their snapshot name; their
    /// back-reference is set NULL by the schema.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM library_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Library item", id));
        }

        debug!(id = %id, "Deleted library item");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use emporium_core::Denomination;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn longsword() -> NewLibraryItem {
        NewLibraryItem {
            name: "Longsword".to_string(),
            description: Some("A standard longsword".to_string()),
            category: Some("weapon".to_string()),
            rarity: Some("common".to_string()),
            cost: Some(ItemCost::new(15, Denomination::Gold)),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_item_with_cost() {
        let db = test_db().await;
        let repo = db.library_items();

        let item = repo.create(longsword()).await.unwrap();
        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();

        assert_eq!(loaded.name, "Longsword");
        assert_eq!(loaded.cost(), Some(ItemCost::new(15, Denomination::Gold)));
    }

    #[tokio::test]
    async fn test_create_unpriced_item() {
        let db = test_db().await;
        let repo = db.library_items();

        let item = repo
            .create(NewLibraryItem {
                name: "Mystery Orb".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.cost(), None);
    }

    #[tokio::test]
    async fn test_update_cost() {
        let db = test_db().await;
        let repo = db.library_items();

        let item = repo.create(longsword()).await.unwrap();
        repo.update_cost(&item.id, Some(ItemCost::new(20, Denomination::Silver)))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.cost(), Some(ItemCost::new(20, Denomination::Silver)));

        repo.update_cost(&item.id, None).await.unwrap();
        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.cost(), None);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let repo = db.library_items();

        repo.create(longsword()).await.unwrap();
        repo.create(NewLibraryItem {
            name: "Shortsword".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.create(NewLibraryItem {
            name: "Healing Potion".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let hits = repo.search("sword", 20).await.unwrap();
        let names: Vec<_> = hits.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Longsword", "Shortsword"]);

        // Empty query lists everything
        assert_eq!(repo.search("", 20).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let db = test_db().await;
        let err = db.library_items().delete("nope").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
