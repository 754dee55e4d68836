//! # Validation Module
//!
//! Input validation utilities for Emporium.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Caller (API / UI)                                         │
//! │  └── Basic format checks, immediate feedback                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL, CHECK and foreign key constraints                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use emporium_core::validation::{validate_name, validate_cost_amount};
//!
//! validate_name("shop", "The Gilded Flagon").unwrap();
//! validate_cost_amount(15).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_COST_AMOUNT, MAX_NAME_LENGTH, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name (market, shop, item, player).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price amount (a coin count in one denomination).
pub fn validate_cost_amount(amount: u32) -> ValidationResult<()> {
    if amount > MAX_COST_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "cost amount".to_string(),
            min: 0,
            max: MAX_COST_AMOUNT as i64,
        });
    }
    Ok(())
}

/// Validates a limited stock count. Unlimited stock needs no validation.
pub fn validate_stock(count: u32) -> ValidationResult<()> {
    if count > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK as i64,
        });
    }
    Ok(())
}

/// Validates a shop's sell price modifier.
///
/// A shop paying more than face value on buy-back would let players mint
/// money by buying and reselling, so the modifier is capped at 1.0.
pub fn validate_sell_price_modifier(modifier: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&modifier) || modifier.is_nan() {
        return Err(ValidationError::OutOfRangeFraction {
            field: "sell price modifier".to_string(),
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("shop", "The Gilded Flagon").is_ok());
        assert!(validate_name("shop", "  ").is_err());
        assert!(validate_name("shop", &"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(validate_name("shop", &"x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_cost_amount() {
        assert!(validate_cost_amount(0).is_ok());
        assert!(validate_cost_amount(MAX_COST_AMOUNT).is_ok());
        assert!(validate_cost_amount(MAX_COST_AMOUNT + 1).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(MAX_STOCK + 1).is_err());
    }

    #[test]
    fn test_validate_sell_price_modifier() {
        assert!(validate_sell_price_modifier(0.0).is_ok());
        assert!(validate_sell_price_modifier(0.5).is_ok());
        assert!(validate_sell_price_modifier(1.0).is_ok());
        assert!(validate_sell_price_modifier(1.01).is_err());
        assert!(validate_sell_price_modifier(-0.1).is_err());
        assert!(validate_sell_price_modifier(f64::NAN).is_err());
    }
}
