//! # Error Types
//!
//! Domain-specific error types for lojinha-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lojinha-core errors (this file)                                        │
//! │  └── CoreError        - Domain errors (typed, with context)            │
//! │                                                                         │
//! │  lojinha-engine responses (separate crate)                              │
//! │  └── CartResponse     - What the presentation layer sees               │
//! │      (outcome + code + flash message; never a raw error)               │
//! │                                                                         │
//! │  Flow: CoreError → CartEngine folds it into CartResponse → Frontend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, name, counts)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recovered at the engine boundary - nothing here
//!    propagates past a cart operation

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The Display text is
/// diagnostic; the engine composes the user-facing flash message per
/// operation (the same `OutOfStock` reads differently on a first add
/// versus an add-more).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product id does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Insufficient stock to reserve the requested quantity.
    ///
    /// ## When This Occurs
    /// - First add on a sold-out product
    /// - Add-more when another session reserved the last unit first
    ///
    /// ## User Workflow
    /// ```text
    /// add_item(id)
    ///      │
    ///      ▼
    /// reserve(id, 1): available=0
    ///      │
    ///      ▼
    /// OutOfStock { name: "Shirt", available: 0, requested: 1 }
    ///      │
    ///      ▼
    /// UI shows: "Out of stock for Shirt."
    /// ```
    #[error("Out of stock for {name}: available {available}, requested {requested}")]
    OutOfStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart operation targeted a product id with no line in this session's cart.
    #[error("No cart line for product {0}")]
    LineNotFound(ProductId),

    /// Substring removal matched no line name in this session's cart.
    #[error("No cart line matching '{0}'")]
    NoLineMatches(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            name: "Shirt".to_string(),
            available: 0,
            requested: 1,
        };
        assert_eq!(
            err.to_string(),
            "Out of stock for Shirt: available 0, requested 1"
        );
    }

    #[test]
    fn test_not_found_carries_id() {
        let err = CoreError::ProductNotFound(ProductId(42));
        assert_eq!(err.to_string(), "Product not found: 42");
    }
}
