//! # emporium-db: Database Layer for Emporium
//!
//! This crate provides database access for the Emporium shop manager.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Emporium Data Flow                             │
//! │                                                                     │
//! │  emporium-core (Currency, SettlementEngine, storage contracts)      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   emporium-db (THIS CRATE)                    │ │
//! │  │                                                               │ │
//! │  │  ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │ │
//! │  │  │   Database    │   │  Repositories  │   │  Migrations  │   │ │
//! │  │  │   (pool.rs)   │   │ (market, shop, │   │  (embedded)  │   │ │
//! │  │  │               │   │  item, listing,│   │              │   │ │
//! │  │  │ SqlitePool    │◄──│  session)      │   │ 001_init.sql │   │ │
//! │  │  └───────────────┘   └────────────────┘   └──────────────┘   │ │
//! │  │                                                               │ │
//! │  │  ShopItemRepository implements StockStore,                    │ │
//! │  │  ShopRepository implements TillStore - together they plug     │ │
//! │  │  straight into emporium_core::SettlementEngine.               │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │                     SQLite Database (WAL mode)                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (market, shop, item, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use emporium_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/emporium.db")).await?;
//!
//! let market = db.markets().create("Waterdeep Bazaar", None).await?;
//! let shops = db.shops().list_by_market(&market.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::item::{LibraryItemRepository, NewLibraryItem};
pub use repository::listing::ShopItemRepository;
pub use repository::market::MarketRepository;
pub use repository::session::PlayerSessionRepository;
pub use repository::shop::ShopRepository;

// =============================================================================
// End-to-End Settlement Tests
// =============================================================================
