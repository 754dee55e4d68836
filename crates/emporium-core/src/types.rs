//! # Domain Types
//!
//! Core domain types used throughout Emporium.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  Market ──┬── Shop ──┬── ShopItem ···> LibraryItem                  │
//! │           │          │   (listing)     (shared catalog)             │
//! │           │          └── till: Currency                             │
//! │           └── PlayerSession                                         │
//! │               └── wallet: Currency                                  │
//! │                                                                     │
//! │  A listing's price is its own Currency override when set,           │
//! │  otherwise the catalog item's single-denomination ItemCost.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Currency Column Convention
//! Wallets and tills are persisted as three integer columns
//! (`*_gold`, `*_silver`, `*_copper`). The structs mirror those columns and
//! expose a `Currency` accessor; values are rebuilt fresh on every read and
//! written back wholesale, never cached across calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, Denomination, ItemCost};
use crate::stock::Stock;

// =============================================================================
// Market
// =============================================================================

/// A market a DM runs for their campaign; owns shops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Market {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to players.
    pub name: String,

    /// Optional flavor text.
    pub description: Option<String>,

    /// When the market was created.
    pub created_at: DateTime<Utc>,

    /// When the market was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Shop
// =============================================================================

/// A shop inside a market.
///
/// The till is the shop's accumulated proceeds; purchases credit it and
/// buy-backs debit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shop {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Market this shop belongs to.
    pub market_id: String,

    /// Display name shown to players.
    pub name: String,

    /// Optional flavor text.
    pub description: Option<String>,

    /// Optional shopkeeper name for flavor.
    pub shopkeeper: Option<String>,

    /// Fraction of an item's cost the shop pays when buying back (0.0-1.0).
    pub sell_price_modifier: f64,

    /// Till, gold column.
    pub till_gold: u32,

    /// Till, silver column.
    pub till_silver: u32,

    /// Till, copper column.
    pub till_copper: u32,

    /// When the shop was created.
    pub created_at: DateTime<Utc>,

    /// When the shop was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Returns the till as a Currency value.
    #[inline]
    pub fn till(&self) -> Currency {
        Currency::new(self.till_gold, self.till_silver, self.till_copper)
    }
}

// =============================================================================
// Library Item
// =============================================================================

/// A shared catalog entry DMs stock shops from.
///
/// The cost is optional: homebrew items are often created before the DM has
/// settled on a price, and such items cannot be purchased until one is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LibraryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description (rules text, flavor).
    pub description: Option<String>,

    /// Optional category ("weapon", "potion", ...).
    pub category: Option<String>,

    /// Optional rarity ("common", "rare", ...).
    pub rarity: Option<String>,

    /// Canonical price: number of coins. NULL together with the denomination.
    pub cost_amount: Option<u32>,

    /// Canonical price: which coin.
    pub cost_denomination: Option<Denomination>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl LibraryItem {
    /// Returns the canonical cost, if one has been set.
    ///
    /// Both columns must be present; a half-set price counts as no price.
    #[inline]
    pub fn cost(&self) -> Option<ItemCost> {
        match (self.cost_amount, self.cost_denomination) {
            (Some(amount), Some(denomination)) => Some(ItemCost::new(amount, denomination)),
            _ => None,
        }
    }
}

// =============================================================================
// Shop Item
// =============================================================================

/// A listing of an item inside one shop.
///
/// ## Snapshot Pattern
/// The name is copied from the catalog item when the listing is created, so
/// the shop keeps displaying consistent data even if the catalog entry is
/// renamed later. `library_item_id` stays as the back-reference for the
/// canonical cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShopItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop this listing belongs to.
    pub shop_id: String,

    /// Catalog item this listing came from, if any.
    pub library_item_id: Option<String>,

    /// Name at time of listing (frozen).
    pub name: String,

    /// Shop-specific price override, gold column. All three columns are set
    /// together or not at all.
    pub price_gold: Option<u32>,

    /// Shop-specific price override, silver column.
    pub price_silver: Option<u32>,

    /// Shop-specific price override, copper column.
    pub price_copper: Option<u32>,

    /// Remaining quantity. NULL = unlimited.
    pub stock: Option<u32>,

    /// When the listing was created.
    pub created_at: DateTime<Utc>,

    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ShopItem {
    /// Returns the remaining stock as a tagged value.
    #[inline]
    pub fn stock(&self) -> Stock {
        Stock::from_count(self.stock)
    }

    /// Returns the shop-specific price override, if all three columns are set.
    #[inline]
    pub fn price_override(&self) -> Option<Currency> {
        match (self.price_gold, self.price_silver, self.price_copper) {
            (Some(gold), Some(silver), Some(copper)) => {
                Some(Currency::new(gold, silver, copper))
            }
            _ => None,
        }
    }

    /// Resolves the price a buyer actually pays.
    ///
    /// The override wins; otherwise the catalog item's canonical cost.
    /// `None` means the listing has no price set and cannot be purchased.
    pub fn effective_price(&self, catalog_cost: Option<ItemCost>) -> Option<Currency> {
        self.price_override()
            .or_else(|| catalog_cost.map(|cost| cost.to_currency()))
    }
}

// =============================================================================
// Player Session
// =============================================================================

/// A player browsing a market, with their wallet.
///
/// Sessions are lightweight: no account, just a name the player picked and
/// the wallet the DM granted them for this market.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlayerSession {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Market the player joined.
    pub market_id: String,

    /// Name the player chose when joining.
    pub player_name: String,

    /// Wallet, gold column.
    pub wallet_gold: u32,

    /// Wallet, silver column.
    pub wallet_silver: u32,

    /// Wallet, copper column.
    pub wallet_copper: u32,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// When the session was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PlayerSession {
    /// Returns the wallet as a Currency value.
    #[inline]
    pub fn wallet(&self) -> Currency {
        Currency::new(self.wallet_gold, self.wallet_silver, self.wallet_copper)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
