//! # Stock Module
//!
//! Remaining purchasable quantity of a shop listing.
//!
//! ## Why a Sum Type?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Stored form: a nullable integer column                             │
//! │                                                                     │
//! │    NULL  → no constraint (the shop never runs out)                  │
//! │    n     → exactly n left                                           │
//! │                                                                     │
//! │  In code the two meanings get their own variants instead of         │
//! │  overloading an Option in every caller:                             │
//! │                                                                     │
//! │    Stock::Unlimited                                                 │
//! │    Stock::Limited(n)                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Stock
// =============================================================================

/// Remaining quantity of a shop listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stock {
    /// The listing never runs out ("no constraint").
    Unlimited,
    /// Exactly this many remain ("constraint, possibly violated at 0").
    Limited(u32),
}

impl Stock {
    /// Builds a `Stock` from the stored nullable count (NULL = unlimited).
    #[inline]
    pub const fn from_count(count: Option<u32>) -> Self {
        match count {
            None => Stock::Unlimited,
            Some(n) => Stock::Limited(n),
        }
    }

    /// The stored nullable count (`None` = unlimited).
    #[inline]
    pub const fn count(&self) -> Option<u32> {
        match self {
            Stock::Unlimited => None,
            Stock::Limited(n) => Some(*n),
        }
    }

    /// Whether at least one unit can be purchased right now.
    #[inline]
    pub const fn is_available(&self) -> bool {
        match self {
            Stock::Unlimited => true,
            Stock::Limited(n) => *n > 0,
        }
    }

    /// Read-only stock check for display to players.
    #[inline]
    pub const fn availability(&self) -> Availability {
        match self {
            Stock::Unlimited => Availability::InStockUnlimited,
            Stock::Limited(0) => Availability::OutOfStock,
            Stock::Limited(_) => Availability::InStock,
        }
    }
}

// =============================================================================
// Availability
// =============================================================================

/// What a player sees when browsing a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Limited stock with at least one unit left.
    InStock,
    /// Unlimited stock - quantity is not tracked.
    InStockUnlimited,
    /// Limited stock, none left.
    OutOfStock,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Availability::InStock => "in stock",
            Availability::InStockUnlimited => "in stock, quantity unknown",
            Availability::OutOfStock => "out of stock",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_count_round_trips() {
        assert_eq!(Stock::from_count(None), Stock::Unlimited);
        assert_eq!(Stock::from_count(Some(3)), Stock::Limited(3));
        assert_eq!(Stock::Unlimited.count(), None);
        assert_eq!(Stock::Limited(0).count(), Some(0));
    }

    #[test]
    fn test_availability() {
        assert_eq!(Stock::Unlimited.availability(), Availability::InStockUnlimited);
        assert_eq!(Stock::Limited(5).availability(), Availability::InStock);
        assert_eq!(Stock::Limited(0).availability(), Availability::OutOfStock);
    }

    #[test]
    fn test_availability_messages() {
        assert_eq!(
            Stock::Unlimited.availability().to_string(),
            "in stock, quantity unknown"
        );
        assert_eq!(Stock::Limited(1).availability().to_string(), "in stock");
        assert_eq!(Stock::Limited(0).availability().to_string(), "out of stock");
    }

    #[test]
    fn test_is_available() {
        assert!(Stock::Unlimited.is_available());
        assert!(Stock::Limited(1).is_available());
        assert!(!Stock::Limited(0).is_available());
    }
}
