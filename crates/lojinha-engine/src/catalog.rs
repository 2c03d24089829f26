//! # Catalog Store
//!
//! The fixed product catalog with live, shared stock counters.
//!
//! ## Why Per-Product Locks?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    The Double-Spend Hazard                              │
//! │                                                                         │
//! │  Session A                        Session B                             │
//! │  ─────────                        ─────────                             │
//! │  read stock: 1                                                          │
//! │                                   read stock: 1                         │
//! │  1 > 0, decrement → 0                                                   │
//! │                                   1 > 0, decrement → -1  ❌             │
//! │                                                                         │
//! │  With reserve() the read and the decrement happen under one lock:      │
//! │                                                                         │
//! │  Session A: lock ── check 1 > 0 ── decrement → 0 ── unlock              │
//! │  Session B:          lock ── check 0 > 0 ── FAIL OutOfStock ── unlock   │
//! │                                                                         │
//! │  Exactly one session wins the last unit; stock never goes negative.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog itself is static for the process lifetime: products are
//! never added or destroyed at runtime, only their stock counters move.

use std::sync::Mutex;

use tracing::debug;

use lojinha_core::{CoreError, CoreResult, Money, Product, ProductId};

// =============================================================================
// Catalog Entry
// =============================================================================

/// One product plus its live stock counter.
///
/// `product.stock` holds the *initial* stock the entry was seeded with;
/// `stock` is the live counter every session reserves from.
#[derive(Debug)]
struct CatalogEntry {
    product: Product,
    stock: Mutex<i64>,
}

impl CatalogEntry {
    fn new(product: Product) -> Self {
        let stock = Mutex::new(product.stock);
        CatalogEntry { product, stock }
    }

    /// Snapshot with the live stock value, taken under the entry lock.
    fn snapshot(&self) -> Product {
        let stock = *self.stock.lock().expect("stock mutex poisoned");
        Product {
            stock,
            ..self.product.clone()
        }
    }
}

// =============================================================================
// Catalog Store
// =============================================================================

/// Process-wide product catalog.
///
/// Shared by every session; the only mutable state is the per-product
/// stock counter, and the only paths that touch it are `reserve` and
/// `release`.
#[derive(Debug)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
}

impl CatalogStore {
    /// Creates a catalog from a fixed product list. Each product's `stock`
    /// field becomes the entry's initial stock.
    pub fn new(products: Vec<Product>) -> Self {
        CatalogStore {
            entries: products.into_iter().map(CatalogEntry::new).collect(),
        }
    }

    fn entry(&self, id: ProductId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.product.id == id)
    }

    /// Looks up a product by id, returning a snapshot with live stock.
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.entry(id).map(CatalogEntry::snapshot)
    }

    /// Returns a live snapshot of the whole catalog, for menu rendering.
    pub fn products(&self) -> Vec<Product> {
        self.entries.iter().map(CatalogEntry::snapshot).collect()
    }

    /// Atomically reserves `qty` units of a product.
    ///
    /// The stock check and the decrement happen under the entry lock, so
    /// concurrent sessions can never double-reserve the same unit.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the id is unknown
    /// - `OutOfStock` if fewer than `qty` units remain - **no mutation**
    ///
    /// ## Returns
    /// The post-reserve product snapshot (callers need the frozen name and
    /// price for cart lines and messages).
    pub fn reserve(&self, id: ProductId, qty: i64) -> CoreResult<Product> {
        debug_assert!(qty >= 0, "reserve quantity must be non-negative");
        let entry = self.entry(id).ok_or(CoreError::ProductNotFound(id))?;

        let mut stock = entry.stock.lock().expect("stock mutex poisoned");
        if *stock < qty {
            return Err(CoreError::OutOfStock {
                name: entry.product.name.clone(),
                available: *stock,
                requested: qty,
            });
        }
        *stock -= qty;
        debug!(product_id = %id, qty, remaining = *stock, "reserved stock");

        Ok(Product {
            stock: *stock,
            ..entry.product.clone()
        })
    }

    /// Releases `qty` units back to a product's stock.
    ///
    /// Callers must only release amounts previously reserved; the store
    /// enforces non-negativity of `qty` but not the original capacity.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the id is unknown
    pub fn release(&self, id: ProductId, qty: i64) -> CoreResult<()> {
        debug_assert!(qty >= 0, "release quantity must be non-negative");
        let entry = self.entry(id).ok_or(CoreError::ProductNotFound(id))?;

        let mut stock = entry.stock.lock().expect("stock mutex poisoned");
        *stock += qty;
        debug!(product_id = %id, qty, remaining = *stock, "released stock");
        Ok(())
    }

    /// Returns the live stock counter for a product (test/inspection helper).
    pub fn stock(&self, id: ProductId) -> Option<i64> {
        self.entry(id)
            .map(|e| *e.stock.lock().expect("stock mutex poisoned"))
    }
}

// =============================================================================
// Demo Catalog
// =============================================================================

/// The five seeded demo products used by the development storefront.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new(ProductId(1), "Shirt", Money::from_cents(5000), 10),
        Product::new(ProductId(2), "Pants", Money::from_cents(12000), 5),
        Product::new(ProductId(3), "Sneakers", Money::from_cents(20000), 8),
        Product::new(ProductId(4), "Cap", Money::from_cents(3000), 15),
        Product::new(ProductId(5), "Jacket", Money::from_cents(15000), 7),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
