//! # Shop Listing Repository
//!
//! Database operations for items stocked in a shop, including the stock
//! counter settlement depends on.
//!
//! ## Atomic Stock Decrement
//! `try_decrement_stock` is a single conditional UPDATE: the availability
//! check and the write happen in one statement, so two concurrent purchases
//! of the last unit cannot both succeed. `rows_affected` is the signal - one
//! row means the reservation took, zero means insufficient stock (or no such
//! listing, which settlement reports the same way).
//!
//! A NULL stock column means unlimited: the decrement matches but writes
//! NULL back, and the increment skips NULL rows entirely.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use emporium_core::{Currency, ShopItem, StockStore, StoreError};

const LISTING_COLUMNS: &str = "id, shop_id, library_item_id, name, \
                               price_gold, price_silver, price_copper, \
                               stock, created_at, updated_at";

/// Repository for shop listing database operations.
#[derive(Debug, Clone)]
pub struct ShopItemRepository {
    pool: SqlitePool,
}

impl ShopItemRepository {
    /// Creates a new ShopItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopItemRepository { pool }
    }

    /// Stocks a catalog item in a shop.
    ///
    /// The name is snapshotted from the catalog entry; `stock` of `None`
    /// means unlimited.
    pub async fn add_listing(
        &self,
        shop_id: &str,
        library_item_id: &str,
        name: &str,
        stock: Option<u32>,
    ) -> DbResult<ShopItem> {
        self.insert(shop_id, Some(library_item_id), name, stock)
            .await
    }

    /// Stocks a one-off item that has no catalog entry.
    ///
    /// Custom listings have no canonical cost, so they need a price override
    /// before they can be purchased.
    pub async fn add_custom_listing(
        &self,
        shop_id: &str,
        name: &str,
        price: Currency,
        stock: Option<u32>,
    ) -> DbResult<ShopItem> {
        let listing = self.insert(shop_id, None, name, stock).await?;
        self.set_price_override(&listing.id, Some(price)).await?;
        Ok(ShopItem {
            price_gold: Some(price.gold),
            price_silver: Some(price.silver),
            price_copper: Some(price.copper),
            ..listing
        })
    }

    async fn insert(
        &self,
        shop_id: &str,
        library_item_id: Option<&str>,
        name: &str,
        stock: Option<u32>,
    ) -> DbResult<ShopItem> {
        let now = Utc::now();
        let listing = ShopItem {
            id: generate_id(),
            shop_id: shop_id.to_string(),
            library_item_id: library_item_id.map(str::to_string),
            name: name.to_string(),
            price_gold: None,
            price_silver: None,
            price_copper: None,
            stock,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %listing.id, shop_id = %shop_id, name = %name, "Creating listing");

        sqlx::query(
            r#"
            INSERT INTO shop_items (
                id, shop_id, library_item_id, name,
                price_gold, price_silver, price_copper,
                stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.shop_id)
        .bind(&listing.library_item_id)
        .bind(&listing.name)
        .bind(listing.price_gold)
        .bind(listing.price_silver)
        .bind(listing.price_copper)
        .bind(listing.stock)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Gets a listing by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ShopItem>> {
        let listing = sqlx::query_as::<_, ShopItem>(&format!(
            "SELECT {LISTING_COLUMNS} FROM shop_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Lists a shop's listings, by name.
    pub async fn list_by_shop(&self, shop_id: &str) -> DbResult<Vec<ShopItem>> {
        let listings = sqlx::query_as::<_, ShopItem>(&format!(
            "SELECT {LISTING_COLUMNS} FROM shop_items WHERE shop_id = ?1 ORDER BY name"
        ))
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Sets the stock counter outright. `None` makes the listing unlimited.
    ///
    /// DM bookkeeping only; settlement goes through the relative operations
    /// below.
    pub async fn set_stock(&self, id: &str, stock: Option<u32>) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE shop_items SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Listing", id));
        }

        Ok(())
    }

    /// Sets or clears the shop-specific price override.
    pub async fn set_price_override(&self, id: &str, price: Option<Currency>) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE shop_items SET
                price_gold = ?2, price_silver = ?3, price_copper = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price.map(|p| p.gold))
        .bind(price.map(|p| p.silver))
        .bind(price.map(|p| p.copper))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Listing", id));
        }

        Ok(())
    }

    /// Atomically decrements stock by `quantity` if that much is available.
    ///
    /// Returns `Ok(false)` on insufficient stock and on a missing listing.
    /// Unlimited (NULL) stock always matches and stays NULL.
    pub async fn try_decrement_stock(&self, id: &str, quantity: u32) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shop_items SET
                stock = CASE WHEN stock IS NULL THEN NULL ELSE stock - ?2 END,
                updated_at = ?3
            WHERE id = ?1 AND (stock IS NULL OR stock >= ?2)
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let reserved = result.rows_affected() > 0;
        debug!(id = %id, quantity = %quantity, reserved = %reserved, "Stock decrement");
        Ok(reserved)
    }

    /// Increments stock by `quantity`. No-op on unlimited (NULL) stock.
    pub async fn increment_stock(&self, id: &str, quantity: u32) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE shop_items SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1 AND stock IS NOT NULL
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a listing from a shop.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM shop_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Listing", id));
        }

        debug!(id = %id, "Deleted listing");
        Ok(())
    }
}

/// Settlement reserves and restores stock through this contract.
#[async_trait]
impl StockStore for ShopItemRepository {
    async fn try_decrement(&self, item_id: &str, quantity: u32) -> Result<bool, StoreError> {
        self.try_decrement_stock(item_id, quantity)
            .await
            .map_err(StoreError::from)
    }

    async fn increment(&self, item_id: &str, quantity: u32) -> Result<(), StoreError> {
        self.increment_stock(item_id, quantity)
            .await
            .map_err(StoreError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::item::NewLibraryItem;
    use emporium_core::{Availability, Stock};

    async fn db_with_shop() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let market = db.markets().create("Market", None).await.unwrap();
        let shop = db.shops().create(&market.id, "Shop", None).await.unwrap();
        (db, shop.id)
    }

    async fn catalog_item(db: &Database, name: &str) -> String {
        db.library_items()
            .create(NewLibraryItem {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_listing_snapshots_name() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Longsword").await;

        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Longsword", Some(3))
            .await
            .unwrap();

        db.library_items()
            .update(&item_id, "Longsword +1", None, None, None)
            .await
            .unwrap();

        let loaded = db.listings().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Longsword");
        assert_eq!(loaded.stock(), Stock::Limited(3));
    }

    #[tokio::test]
    async fn test_decrement_counts_down_to_zero_then_refuses() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Potion").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Potion", Some(2))
            .await
            .unwrap();
        let repo = db.listings();

        assert!(repo.try_decrement_stock(&listing.id, 1).await.unwrap());
        assert!(repo.try_decrement_stock(&listing.id, 1).await.unwrap());
        // 0 left: the conditional UPDATE no longer matches
        assert!(!repo.try_decrement_stock(&listing.id, 1).await.unwrap());

        let loaded = repo.get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock(), Stock::Limited(0));
        assert_eq!(loaded.stock().availability(), Availability::OutOfStock);
    }

    #[tokio::test]
    async fn test_decrement_refuses_partial_quantity() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Arrow").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Arrow", Some(3))
            .await
            .unwrap();

        // All-or-nothing: 5 > 3 leaves the counter untouched
        assert!(!db.listings().try_decrement_stock(&listing.id, 5).await.unwrap());
        let loaded = db.listings().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock(), Stock::Limited(3));
    }

    #[tokio::test]
    async fn test_unlimited_stock_always_reserves_and_stays_null() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Ale").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Ale", None)
            .await
            .unwrap();
        let repo = db.listings();

        assert!(repo.try_decrement_stock(&listing.id, 1).await.unwrap());
        repo.increment_stock(&listing.id, 1).await.unwrap();

        let loaded = repo.get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock(), Stock::Unlimited);
    }

    #[tokio::test]
    async fn test_decrement_missing_listing_returns_false() {
        let (db, _) = db_with_shop().await;
        assert!(!db.listings().try_decrement_stock("nope", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_stock() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Potion").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Potion", Some(0))
            .await
            .unwrap();

        db.listings().increment_stock(&listing.id, 2).await.unwrap();
        let loaded = db.listings().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock(), Stock::Limited(2));
    }

    #[tokio::test]
    async fn test_custom_listing_carries_price_override() {
        let (db, shop_id) = db_with_shop().await;

        let listing = db
            .listings()
            .add_custom_listing(&shop_id, "House Special", Currency::new(2, 5, 0), Some(1))
            .await
            .unwrap();

        assert_eq!(listing.price_override(), Some(Currency::new(2, 5, 0)));
        assert_eq!(listing.library_item_id, None);

        let loaded = db.listings().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.effective_price(None), Some(Currency::new(2, 5, 0)));
    }

    #[tokio::test]
    async fn test_set_price_override_and_clear() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Shield").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Shield", Some(1))
            .await
            .unwrap();
        let repo = db.listings();

        repo.set_price_override(&listing.id, Some(Currency::new(9, 0, 0)))
            .await
            .unwrap();
        let loaded = repo.get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_override(), Some(Currency::new(9, 0, 0)));

        repo.set_price_override(&listing.id, None).await.unwrap();
        let loaded = repo.get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_override(), None);
    }

    #[tokio::test]
    async fn test_deleting_catalog_item_keeps_listing() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Relic").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Relic", Some(1))
            .await
            .unwrap();

        db.library_items().delete(&item_id).await.unwrap();

        // FK is ON DELETE SET NULL; the snapshot name survives
        let loaded = db.listings().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.library_item_id, None);
        assert_eq!(loaded.name, "Relic");
    }

    #[tokio::test]
    async fn test_delete_shop_cascades_to_listings() {
        let (db, shop_id) = db_with_shop().await;
        let item_id = catalog_item(&db, "Rope").await;
        let listing = db
            .listings()
            .add_listing(&shop_id, &item_id, "Rope", None)
            .await
            .unwrap();

        db.shops().delete(&shop_id).await.unwrap();
        assert!(db.listings().get_by_id(&listing.id).await.unwrap().is_none());
    }
}
