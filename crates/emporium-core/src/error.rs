//! # Error Types
//!
//! Domain-specific error types for emporium-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  emporium-core errors (this file)                                   │
//! │  ├── CoreError        - General domain errors                       │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── StoreError       - Opaque storage failure behind the           │
//! │                         settlement traits                           │
//! │                                                                     │
//! │  emporium-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                 │
//! │                         (converted into StoreError at the trait)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the split the settlement engine relies on: insufficient funds and
//! out-of-stock are NOT errors - they are ordinary business outcomes carried
//! in `PurchaseResult`. Only genuinely unexpected conditions (the store
//! itself failing) travel as `StoreError`.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity, id, field)
//! 3. Errors are enum variants, never bare String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations or domain logic failures and are
/// translated to user-facing messages by the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A shop listing references a catalog item that has been deleted.
    #[error("Listing {listing_id} references missing catalog item {item_id}")]
    DanglingCatalogReference {
        listing_id: String,
        item_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Fractional value is out of range (e.g. sell price modifier).
    #[error("{field} must be between {min} and {max}")]
    OutOfRangeFraction { field: String, min: f64, max: f64 },
}

// =============================================================================
// Store Error
// =============================================================================

/// An unexpected failure from the storage layer behind the settlement traits.
///
/// The settlement engine never matches on the detail; it wraps the message as
/// `"Purchase failed: <detail>"` / `"Sell failed: <detail>"` per the error
/// handling design, so the type stays deliberately opaque.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Creates a store error from any displayable detail.
    pub fn new(detail: impl Into<String>) -> Self {
        StoreError(detail.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
