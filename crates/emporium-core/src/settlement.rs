//! # Purchase Settlement
//!
//! Executes a single-item purchase or sell-back as one effectively-atomic
//! business transaction spanning a buyer wallet, a shop till, and an external
//! stock counter, with compensation on partial failure.
//!
//! ## Purchase State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. Validate   item has a price          → "Item has no price set"  │
//! │  2. Afford     wallet covers price       → "You cannot afford..."   │
//! │  3. Reserve    atomic stock decrement    → "This item is out of..." │
//! │  4. Settle     wallet - price            → (compensate: restock)    │
//! │  5. Persist    till + price written back                            │
//! │  6. Success    both new balances returned                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Rationale
//! Stock is reserved *before* currency is touched because the stock
//! adjustment is the only step backed by a conflict-detecting atomic
//! primitive (the store's conditional decrement). Currency arithmetic is
//! pure and always succeeds after a passing afford-check, so the
//! compensation paths exist for robustness rather than load-bearing
//! correctness.
//!
//! ## Known Limitation: Till Lost-Update
//! The till write in step 5 is an absolute overwrite of a value read before
//! settlement began. Two concurrent successful settlements against the same
//! shop can each read the same stale till and one update wins. Stock
//! correctness does not depend on the till; callers that need a strictly
//! accurate till must serialize settlements per shop.
//!
//! ## Failure Model
//! Insufficient funds, out-of-stock and a till that cannot afford a buy-back
//! are ordinary business outcomes reported through [`PurchaseResult`], never
//! errors. Only the storage layer itself failing surfaces as
//! `"Purchase failed: <detail>"` / `"Sell failed: <detail>"`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::currency::{Currency, ItemCost};
use crate::error::StoreError;
use crate::DEFAULT_SELL_PRICE_MODIFIER;

// =============================================================================
// Storage Contracts
// =============================================================================

/// Atomic stock bookkeeping for shop listings.
///
/// Implemented by the database layer. The decrement must be conditional and
/// atomic: no other writer may interleave between the availability check and
/// the write on the same listing.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Atomically decreases stock by `quantity` if that much is available.
    ///
    /// Returns `Ok(false)` when stock is insufficient. Unlimited stock always
    /// succeeds without decrementing anything.
    async fn try_decrement(&self, item_id: &str, quantity: u32) -> Result<bool, StoreError>;

    /// Relative stock increase. No-op when stock is unlimited.
    async fn increment(&self, item_id: &str, quantity: u32) -> Result<(), StoreError>;
}

/// Persistence for shop tills.
///
/// `persist_till` overwrites the shop's stored currency value wholesale; see
/// the module docs for the resulting lost-update caveat.
#[async_trait]
pub trait TillStore: Send + Sync {
    /// Overwrites the shop's stored till.
    async fn persist_till(&self, shop_id: &str, till: Currency) -> Result<(), StoreError>;
}

// =============================================================================
// Requests & Result
// =============================================================================

/// Everything the engine needs to settle one purchase.
///
/// Balances are the values the caller just read from storage; the engine
/// never re-reads them.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    /// Shop whose till receives the payment.
    pub shop_id: String,
    /// Listing being purchased.
    pub item_id: String,
    /// Listing name, used in the confirmation message.
    pub item_name: String,
    /// Resolved price (listing override or catalog cost). `None` means the
    /// item has no price set and cannot be purchased.
    pub price: Option<Currency>,
    /// The buyer's wallet as currently persisted.
    pub buyer_wallet: Currency,
    /// The shop's till as currently persisted.
    pub shop_till: Currency,
}

/// Everything the engine needs to settle one sell-back.
#[derive(Debug, Clone)]
pub struct SellBackRequest {
    /// Shop buying the item back.
    pub shop_id: String,
    /// Listing the item returns to.
    pub item_id: String,
    /// Listing name, used in the confirmation message.
    pub item_name: String,
    /// Canonical catalog cost; the sell price is derived from it. `None`
    /// means the item has no price set and cannot be sold.
    pub cost: Option<ItemCost>,
    /// The seller's wallet as currently persisted.
    pub buyer_wallet: Currency,
    /// The shop's till as currently persisted.
    pub shop_till: Currency,
}

/// Outcome of a settlement attempt.
///
/// On success both new balances are present. The buyer's new wallet is
/// returned to the caller to persist - this component does not own
/// buyer-wallet storage. The till has already been written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResult {
    /// Whether the transaction completed.
    pub success: bool,
    /// Human-readable outcome for the player.
    pub message: String,
    /// The buyer's new wallet (success only).
    pub buyer_wallet: Option<Currency>,
    /// The shop's new till (success only).
    pub shop_till: Option<Currency>,
}

impl PurchaseResult {
    fn completed(message: String, buyer_wallet: Currency, shop_till: Currency) -> Self {
        PurchaseResult {
            success: true,
            message,
            buyer_wallet: Some(buyer_wallet),
            shop_till: Some(shop_till),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        PurchaseResult {
            success: false,
            message: message.into(),
            buyer_wallet: None,
            shop_till: None,
        }
    }
}

// =============================================================================
// Settlement Engine
// =============================================================================

/// Orchestrates purchases and sell-backs against the storage contracts.
///
/// ## Usage
/// ```rust,ignore
/// let engine = SettlementEngine::new(listings.clone(), shops.clone());
/// let result = engine.purchase(&request).await;
/// if result.success {
///     sessions.update_wallet(&session_id, result.buyer_wallet.unwrap()).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SettlementEngine<S, T> {
    stock: S,
    tills: T,
    sell_price_modifier: f64,
}

impl<S: StockStore, T: TillStore> SettlementEngine<S, T> {
    /// Creates an engine with the default sell price modifier (0.5).
    pub fn new(stock: S, tills: T) -> Self {
        SettlementEngine {
            stock,
            tills,
            sell_price_modifier: DEFAULT_SELL_PRICE_MODIFIER,
        }
    }

    /// Overrides the sell price modifier (fraction of cost paid on buy-back).
    pub fn with_sell_price_modifier(mut self, modifier: f64) -> Self {
        self.sell_price_modifier = modifier;
        self
    }

    /// Settles a single-item purchase.
    ///
    /// Walks the state machine in the module docs. Each rejection names its
    /// reason; the only side effects on a rejection path are the compensating
    /// stock restores.
    pub async fn purchase(&self, req: &PurchaseRequest) -> PurchaseResult {
        debug!(item = %req.item_id, shop = %req.shop_id, "Settling purchase");

        // 1. Validate
        let Some(price) = req.price else {
            return PurchaseResult::rejected("Item has no price set");
        };

        // 2. Afford-check, before any side effect
        if !req.buyer_wallet.can_afford(&price) {
            return PurchaseResult::rejected("You cannot afford this item");
        }

        // 3. Reserve stock - the one conflict-detecting step
        match self.stock.try_decrement(&req.item_id, 1).await {
            Ok(true) => {}
            Ok(false) => return PurchaseResult::rejected("This item is out of stock"),
            Err(e) => return PurchaseResult::rejected(format!("Purchase failed: {e}")),
        }

        // 4. Settle currency. The afford-check passed, so this only fails if
        // the caller raced its own balance reads; undo the reservation.
        let Some(new_wallet) = req.buyer_wallet.checked_sub(&price) else {
            self.restore_stock(&req.item_id, 1).await;
            return PurchaseResult::rejected("Transaction failed");
        };
        let new_till = req.shop_till + price;

        // 5. Persist the till. The buyer's wallet is the caller's to persist.
        if let Err(e) = self.tills.persist_till(&req.shop_id, new_till).await {
            self.restore_stock(&req.item_id, 1).await;
            return PurchaseResult::rejected(format!("Purchase failed: {e}"));
        }

        info!(
            item = %req.item_id,
            shop = %req.shop_id,
            price = %price,
            "Purchase settled"
        );

        PurchaseResult::completed(
            format!("Purchased {} for {}", req.item_name, price),
            new_wallet,
            new_till,
        )
    }

    /// Settles a sell-back: the shop buys an item from the player.
    ///
    /// Mirror of [`purchase`](SettlementEngine::purchase): the sell price is
    /// `floor(cost.amount * modifier)` in the cost's own denomination, the
    /// *shop's* till is afford-checked, and stock is increased first so that
    /// the compensating action is the conflict-detecting decrement.
    pub async fn sell_back(&self, req: &SellBackRequest) -> PurchaseResult {
        debug!(item = %req.item_id, shop = %req.shop_id, "Settling sell-back");

        let Some(cost) = req.cost else {
            return PurchaseResult::rejected("Item has no price set");
        };
        let sell_price = cost.sell_value(self.sell_price_modifier).to_currency();

        if !req.shop_till.can_afford(&sell_price) {
            return PurchaseResult::rejected("The shop cannot afford to buy this item");
        }

        if let Err(e) = self.stock.increment(&req.item_id, 1).await {
            return PurchaseResult::rejected(format!("Sell failed: {e}"));
        }

        let Some(new_till) = req.shop_till.checked_sub(&sell_price) else {
            self.release_stock(&req.item_id, 1).await;
            return PurchaseResult::rejected("Transaction failed");
        };
        let new_wallet = req.buyer_wallet + sell_price;

        if let Err(e) = self.tills.persist_till(&req.shop_id, new_till).await {
            self.release_stock(&req.item_id, 1).await;
            return PurchaseResult::rejected(format!("Sell failed: {e}"));
        }

        info!(
            item = %req.item_id,
            shop = %req.shop_id,
            price = %sell_price,
            "Sell-back settled"
        );

        PurchaseResult::completed(
            format!("Sold {} for {}", req.item_name, sell_price),
            new_wallet,
            new_till,
        )
    }

    /// Best-effort compensation: undo a stock reservation after a later
    /// purchase step failed. A failure here is logged and the original
    /// failure is still the one reported.
    async fn restore_stock(&self, item_id: &str, quantity: u32) {
        if let Err(e) = self.stock.increment(item_id, quantity).await {
            error!(item = %item_id, error = %e, "Stock compensation failed");
        }
    }

    /// Best-effort compensation: undo a stock increase after a later
    /// sell-back step failed.
    async fn release_stock(&self, item_id: &str, quantity: u32) {
        match self.stock.try_decrement(item_id, quantity).await {
            Ok(true) => {}
            Ok(false) => {
                error!(item = %item_id, "Stock compensation found nothing to release");
            }
            Err(e) => {
                error!(item = %item_id, error = %e, "Stock compensation failed");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
