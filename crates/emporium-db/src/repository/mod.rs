//! # Repository Layer
//!
//! One repository per entity, all sharing the connection pool:
//!
//! - [`market`] - markets a DM runs
//! - [`shop`] - shops inside a market (owns the till)
//! - [`item`] - the shared item catalog
//! - [`listing`] - items stocked in a shop (owns the stock counter)
//! - [`session`] - player sessions and wallets
//!
//! [`listing::ShopItemRepository`] implements the `StockStore` contract and
//! [`shop::ShopRepository`] the `TillStore` contract, so the pair can be
//! handed straight to `emporium_core::SettlementEngine`.

pub mod item;
pub mod listing;
pub mod market;
pub mod session;
pub mod shop;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4 string).
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
