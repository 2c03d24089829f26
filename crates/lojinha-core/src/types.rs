//! # Domain Types
//!
//! Core domain types used throughout Lojinha.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │      Cart       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ProductId) │   │  product_id     │   │  lines (Vec)    │       │
//! │  │  name           │   │  name (frozen)  │   │  created_at     │       │
//! │  │  unit_price     │   │  unit_price     │   │  (cart.rs)      │       │
//! │  │  stock          │   │  quantity       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product is owned by the catalog; CartLine freezes a snapshot of       │
//! │  name and price at add-time so later catalog edits never reprice       │
//! │  a cart that is already in progress.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Catalog product identifier.
///
/// A small stable integer: the catalog is fixed for the process lifetime,
/// so ids never need coordination or reallocation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// ## Stock Semantics
/// Inside the catalog store, `stock` is the *live* counter shared by every
/// session; a `Product` value handed out by `find`/`reserve` is a snapshot
/// taken under the entry lock. The catalog never destroys a product at
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,

    /// Display name shown to the visitor.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub unit_price: Money,

    /// Units available. Non-negative by construction: the only path that
    /// decrements it is an atomic check-then-reserve.
    pub stock: i64,
}

impl Product {
    /// Creates a product.
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money, stock: i64) -> Self {
        Product {
            id,
            name: name.into(),
            unit_price,
            stock,
        }
    }

    /// Checks if at least one unit can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId(3).to_string(), "3");
    }

    #[test]
    fn test_product_id_serializes_transparently() {
        let json = serde_json::to_string(&ProductId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_in_stock() {
        let shirt = Product::new(ProductId(1), "Shirt", Money::from_cents(5000), 10);
        assert!(shirt.in_stock());

        let sold_out = Product::new(ProductId(2), "Pants", Money::from_cents(12000), 0);
        assert!(!sold_out.in_stock());
    }
}
