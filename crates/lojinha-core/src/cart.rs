//! # Cart Math
//!
//! Pure cart data structures and mutations. No stock accounting happens
//! here: the engine couples every cart mutation to the matching catalog
//! reserve/release, this module only keeps the line list consistent.
//!
//! ## Line State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Line Transitions                                │
//! │                                                                         │
//! │                 add_unit                 add_unit                       │
//! │   ┌────────┐ ────────────► ┌──────────┐ ────────► ┌──────────┐         │
//! │   │ absent │               │ qty = 1  │           │ qty = n  │          │
//! │   └────────┘ ◄──────────── └──────────┘ ◄──────── └──────────┘         │
//! │        ▲      remove_unit                remove_unit                    │
//! │        │      take_line                                                 │
//! │        └───── take_matching ── (from any present state)                 │
//! │               clear                                                     │
//! │                                                                         │
//! │  INVARIANT: a present line always has quantity >= 1.                    │
//! │             remove_unit at qty 1 drops the line, never leaves qty 0.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, ProductId};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the shopping cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the catalog product
/// - `name` / `unit_price`: Frozen copy of product data at time of adding.
///   This ensures the cart displays consistent data even if the catalog
///   changes after the line was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Catalog product this line reserves stock from.
    pub product_id: ProductId,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    /// This is critical: we lock in the price when added to cart.
    pub unit_price: Money,

    /// Units of this product in the cart. Always >= 1.
    pub quantity: i64,

    /// When this line was first added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a quantity-1 line from a product snapshot.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the catalog price changes
    /// later, this cart line retains the original price.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Case-insensitive substring match against the frozen name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

// =============================================================================
// Remove-One Outcome
// =============================================================================

/// What `Cart::remove_unit` did to the line.
///
/// Modelling this explicitly keeps the transition table exhaustive: the
/// caller always knows whether the line survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOne {
    /// Quantity was > 1; the line remains with `remaining` units.
    Decremented { remaining: i64 },
    /// Quantity was exactly 1; the line was dropped from the cart.
    Removed,
}

// =============================================================================
// Cart
// =============================================================================

/// One session's shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increments
///   the existing line instead of appending a duplicate)
/// - Quantity is always >= 1 while a line exists
/// - Insertion order is preserved across increments and removals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Lines in the cart, in insertion order.
    pub lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns the line for a product, if present.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Checks whether the cart holds a line for this product.
    #[inline]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - If the product already has a line: increments its quantity
    /// - If not: appends a new quantity-1 line with a name/price snapshot
    ///
    /// ## Returns
    /// `true` if a new line was appended, `false` if an existing line was
    /// incremented.
    pub fn add_unit(&mut self, product: &Product) -> bool {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
            return false;
        }
        self.lines.push(CartLine::from_product(product));
        true
    }

    /// Removes one unit of a product from the cart.
    ///
    /// ## Behavior
    /// - Quantity > 1: decrements in place
    /// - Quantity == 1: drops the line entirely (never leaves a qty-0 line)
    /// - No line: returns `None`, cart untouched
    pub fn remove_unit(&mut self, product_id: ProductId) -> Option<RemoveOne> {
        let idx = self.lines.iter().position(|l| l.product_id == product_id)?;
        if self.lines[idx].quantity > 1 {
            self.lines[idx].quantity -= 1;
            Some(RemoveOne::Decremented {
                remaining: self.lines[idx].quantity,
            })
        } else {
            self.lines.remove(idx);
            Some(RemoveOne::Removed)
        }
    }

    /// Removes and returns the whole line for a product.
    pub fn take_line(&mut self, product_id: ProductId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| l.product_id == product_id)?;
        Some(self.lines.remove(idx))
    }

    /// Removes and returns every line whose name contains `needle`
    /// (case-insensitive). Non-matching lines are retained in original
    /// order. Returns an empty vec if nothing matched.
    pub fn take_matching(&mut self, needle: &str) -> Vec<CartLine> {
        let (taken, kept): (Vec<CartLine>, Vec<CartLine>) = self
            .lines
            .drain(..)
            .partition(|line| line.name_contains(needle));
        self.lines = kept;
        taken
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct lines in the cart.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the cart total (Σ unit price × quantity), exactly in cents.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Computes the totals summary handed to the presentation layer.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct lines in the cart.
    pub item_count: usize,

    /// Σ quantity across lines.
    pub total_quantity: i64,

    /// Σ unit_price × quantity, in cents.
    pub total_cents: i64,
}

impl CartTotals {
    /// Returns the total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total_price().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new(ProductId(1), "Shirt", Money::from_cents(5000), 10)
    }

    fn pants() -> Product {
        Product::new(ProductId(2), "Pants", Money::from_cents(12000), 5)
    }

    #[test]
    fn test_add_unit_appends_then_increments() {
        let mut cart = Cart::new();

        assert!(cart.add_unit(&shirt())); // new line
        assert!(!cart.add_unit(&shirt())); // incremented

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(ProductId(1)).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        cart.add_unit(&pants());
        cart.add_unit(&shirt()); // increments, does not reorder

        let names: Vec<&str> = cart.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Shirt", "Pants"]);
    }

    #[test]
    fn test_price_is_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = shirt();
        cart.add_unit(&product);

        // Catalog price changes after the line exists
        product.unit_price = Money::from_cents(9999);
        cart.add_unit(&product);

        // Line keeps the original snapshot price
        let line = cart.line(ProductId(1)).unwrap();
        assert_eq!(line.unit_price, Money::from_cents(5000));
        assert_eq!(line.line_total(), Money::from_cents(10_000));
    }

    #[test]
    fn test_remove_unit_decrements_then_removes() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        cart.add_unit(&shirt());

        assert_eq!(
            cart.remove_unit(ProductId(1)),
            Some(RemoveOne::Decremented { remaining: 1 })
        );
        assert_eq!(cart.remove_unit(ProductId(1)), Some(RemoveOne::Removed));
        // Never a quantity-0 line: the line is gone
        assert!(!cart.contains(ProductId(1)));
        assert_eq!(cart.remove_unit(ProductId(1)), None);
    }

    #[test]
    fn test_take_line() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        cart.add_unit(&shirt());

        let line = cart.take_line(ProductId(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert!(cart.is_empty());
        assert!(cart.take_line(ProductId(1)).is_none());
    }

    #[test]
    fn test_take_matching_is_case_insensitive() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        cart.add_unit(&pants());

        let taken = cart.take_matching("SHI");
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].name, "Shirt");

        // Non-matching lines retained in original order
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].name, "Pants");
    }

    #[test]
    fn test_take_matching_no_match_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());

        let taken = cart.take_matching("xyz");
        assert!(taken.is_empty());
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        cart.add_unit(&shirt());
        cart.add_unit(&pants());

        let totals = cart.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total_cents, 22_000); // 2×$50.00 + 1×$120.00
        assert_eq!(totals.total_price(), Money::from_cents(22_000));
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        let totals = cart.totals();
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.total_quantity, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut cart = Cart::new();
        cart.add_unit(&shirt());

        let json = serde_json::to_value(&cart).unwrap();
        let line = &json["lines"][0];
        assert_eq!(line["productId"], 1);
        assert_eq!(line["unitPrice"], 5000);
        assert_eq!(line["quantity"], 1);
    }
}
