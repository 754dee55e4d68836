//! # Shop Repository
//!
//! Database operations for shops, including the till.
//!
//! ## Till Writes
//! `update_till` overwrites the three till columns wholesale with a value
//! the caller computed from an earlier read. Two concurrent settlements
//! against the same shop can therefore lose one update (the stock counter,
//! not the till, is the conflict-detected resource). Callers that need a
//! strictly accurate till must serialize settlements per shop.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use emporium_core::{Currency, Shop, StoreError, TillStore, DEFAULT_SELL_PRICE_MODIFIER};

const SHOP_COLUMNS: &str = "id, market_id, name, description, shopkeeper, sell_price_modifier, \
                            till_gold, till_silver, till_copper, created_at, updated_at";

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Creates a new shop in a market.
    ///
    /// The till starts empty and the sell price modifier at the default
    /// (0.5); use [`update_till`](ShopRepository::update_till) and
    /// [`set_sell_price_modifier`](ShopRepository::set_sell_price_modifier)
    /// to adjust them.
    pub async fn create(
        &self,
        market_id: &str,
        name: &str,
        shopkeeper: Option<&str>,
    ) -> DbResult<Shop> {
        let now = Utc::now();
        let shop = Shop {
            id: generate_id(),
            market_id: market_id.to_string(),
            name: name.to_string(),
            description: None,
            shopkeeper: shopkeeper.map(str::to_string),
            sell_price_modifier: DEFAULT_SELL_PRICE_MODIFIER,
            till_gold: 0,
            till_silver: 0,
            till_copper: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %shop.id, market_id = %market_id, name = %name, "Creating shop");

        sqlx::query(
            r#"
            INSERT INTO shops (
                id, market_id, name, description, shopkeeper,
                sell_price_modifier, till_gold, till_silver, till_copper,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&shop.id)
        .bind(&shop.market_id)
        .bind(&shop.name)
        .bind(&shop.description)
        .bind(&shop.shopkeeper)
        .bind(shop.sell_price_modifier)
        .bind(shop.till_gold)
        .bind(shop.till_silver)
        .bind(shop.till_copper)
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Gets a shop by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Lists the shops in a market, by name.
    pub async fn list_by_market(&self, market_id: &str) -> DbResult<Vec<Shop>> {
        let shops = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE market_id = ?1 ORDER BY name"
        ))
        .bind(market_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shops)
    }

    /// Updates a shop's display fields.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        shopkeeper: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE shops SET name = ?2, description = ?3, shopkeeper = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(shopkeeper)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        Ok(())
    }

    /// Overwrites the shop's till.
    ///
    /// Used both by the DM (funding a shop so it can buy items back) and by
    /// settlement (persisting the post-transaction till).
    pub async fn update_till(&self, id: &str, till: Currency) -> DbResult<()> {
        debug!(id = %id, till = %till, "Updating shop till");

        let result = sqlx::query(
            r#"
            UPDATE shops SET
                till_gold = ?2, till_silver = ?3, till_copper = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(till.gold)
        .bind(till.silver)
        .bind(till.copper)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        Ok(())
    }

    /// Sets the fraction of cost the shop pays on buy-back.
    pub async fn set_sell_price_modifier(&self, id: &str, modifier: f64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE shops SET sell_price_modifier = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(modifier)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        Ok(())
    }

    /// Deletes a shop and, via cascade, its listings.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM shops WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        debug!(id = %id, "Deleted shop");
        Ok(())
    }
}

/// Settlement persists tills through this contract.
#[async_trait]
impl TillStore for ShopRepository {
    async fn persist_till(&self, shop_id: &str, till: Currency) -> Result<(), StoreError> {
        self.update_till(shop_id, till).await.map_err(StoreError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db_with_market() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let market = db.markets().create("Test Market", None).await.unwrap();
        (db, market.id)
    }

    #[tokio::test]
    async fn test_create_shop_defaults() {
        let (db, market_id) = db_with_market().await;
        let shop = db
            .shops()
            .create(&market_id, "The Gilded Flagon", Some("Marta"))
            .await
            .unwrap();

        assert_eq!(shop.sell_price_modifier, DEFAULT_SELL_PRICE_MODIFIER);
        assert!(shop.till().is_zero());

        let loaded = db.shops().get_by_id(&shop.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "The Gilded Flagon");
        assert_eq!(loaded.shopkeeper.as_deref(), Some("Marta"));
    }

    #[tokio::test]
    async fn test_create_shop_in_missing_market_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.shops().create("nope", "Shop", None).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_till_round_trips() {
        let (db, market_id) = db_with_market().await;
        let shop = db.shops().create(&market_id, "Shop", None).await.unwrap();

        db.shops()
            .update_till(&shop.id, Currency::new(10, 2, 7))
            .await
            .unwrap();

        let loaded = db.shops().get_by_id(&shop.id).await.unwrap().unwrap();
        assert_eq!(loaded.till(), Currency::new(10, 2, 7));
    }

    #[tokio::test]
    async fn test_update_till_missing_shop() {
        let (db, _) = db_with_market().await;
        let err = db
            .shops()
            .update_till("nope", Currency::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_market_sorted() {
        let (db, market_id) = db_with_market().await;
        db.shops().create(&market_id, "Zephyr Goods", None).await.unwrap();
        db.shops().create(&market_id, "Alchemy Hut", None).await.unwrap();

        let shops = db.shops().list_by_market(&market_id).await.unwrap();
        let names: Vec<_> = shops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alchemy Hut", "Zephyr Goods"]);
    }

    #[tokio::test]
    async fn test_delete_market_cascades_to_shops() {
        let (db, market_id) = db_with_market().await;
        let shop = db.shops().create(&market_id, "Shop", None).await.unwrap();

        db.markets().delete(&market_id).await.unwrap();
        assert!(db.shops().get_by_id(&shop.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_sell_price_modifier() {
        let (db, market_id) = db_with_market().await;
        let shop = db.shops().create(&market_id, "Shop", None).await.unwrap();

        db.shops()
            .set_sell_price_modifier(&shop.id, 0.25)
            .await
            .unwrap();

        let loaded = db.shops().get_by_id(&shop.id).await.unwrap().unwrap();
        assert_eq!(loaded.sell_price_modifier, 0.25);
    }
}
