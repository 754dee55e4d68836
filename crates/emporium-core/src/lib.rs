//! # emporium-core: Pure Business Logic for Emporium
//!
//! This crate is the **heart** of Emporium, the campaign shop manager. It
//! contains all business logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Emporium Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Application layer (out of scope here)            │  │
//! │  │     market browser ──► shop view ──► purchase / sell-back     │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │              ★ emporium-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │  ┌──────────┐ ┌─────────┐ ┌───────┐ ┌────────────┐            │  │
//! │  │  │ currency │ │  types  │ │ stock │ │ settlement │            │  │
//! │  │  │ Currency │ │ Market  │ │ Stock │ │   engine   │            │  │
//! │  │  │ ItemCost │ │ Shop .. │ │       │ │ + traits   │            │  │
//! │  │  └──────────┘ └─────────┘ └───────┘ └────────────┘            │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK                            │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │ StockStore / TillStore traits       │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │                  emporium-db (Database Layer)                 │  │
//! │  │          SQLite repositories, atomic stock decrement          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`currency`] - Currency, BaseUnits, Denomination, ItemCost
//! - [`stock`] - Stock sum type and availability check
//! - [`types`] - Domain entities (Market, Shop, ShopItem, ...)
//! - [`settlement`] - Purchase/sell-back engine and storage contracts
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure values**: Currency is immutable; every operation returns a new
//!    instance, and all arithmetic is lossless integer math in base units
//! 2. **No I/O**: storage is reached only through traits callers implement
//! 3. **Business outcomes are values**: insufficient funds and out-of-stock
//!    travel in `PurchaseResult`, never as errors
//!
//! ## Example Usage
//!
//! ```rust
//! use emporium_core::{Currency, Denomination, ItemCost};
//!
//! let wallet = Currency::new(5, 0, 0);
//! let price = ItemCost::new(3, Denomination::Gold).to_currency();
//!
//! assert!(wallet.can_afford(&price));
//! assert_eq!(wallet.checked_sub(&price), Some(Currency::new(2, 0, 0)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod currency;
pub mod error;
pub mod settlement;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use emporium_core::Currency` instead of
// `use emporium_core::currency::Currency`

pub use currency::{BaseUnits, Currency, Denomination, ItemCost};
pub use error::{CoreError, CoreResult, StoreError, ValidationError};
pub use settlement::{
    PurchaseRequest, PurchaseResult, SellBackRequest, SettlementEngine, StockStore, TillStore,
};
pub use stock::{Availability, Stock};
pub use types::{LibraryItem, Market, PlayerSession, Shop, ShopItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default fraction of an item's cost a shop pays when buying it back.
///
/// ## Business Reason
/// Matches the common tabletop convention of selling gear back at half
/// price. DMs can override it per shop.
pub const DEFAULT_SELL_PRICE_MODIFIER: f64 = 0.5;

/// Maximum length of any entity display name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum coin count for a single-denomination price.
///
/// ## Business Reason
/// Prevents typo prices (e.g. an extra digit) from overflowing anything
/// downstream and keeps displays readable.
pub const MAX_COST_AMOUNT: u32 = 1_000_000;

/// Maximum limited stock for a single listing.
pub const MAX_STOCK: u32 = 100_000;
