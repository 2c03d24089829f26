//! # lojinha-core: Pure Business Logic for Lojinha
//!
//! This crate is the **heart** of Lojinha. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lojinha Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation Layer (external)                      │   │
//! │  │    Menu view ──► Cart view ──► Checkout view ──► Flash UI      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ per-request dispatch                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    lojinha-engine                                │   │
//! │  │    CatalogStore, SessionStore, CartEngine operations            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lojinha-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   error   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ CoreError │  │   │
//! │  │   │ ProductId │  │ LineTotal │  │ CartLine  │  │  (typed)  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SESSIONS • NO SHARED STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductId)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart and CartLine math (add/decrement/remove/totals)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No Shared State**: The catalog and session stores live in lojinha-engine
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use lojinha_core::{Cart, Money, Product, ProductId};
//!
//! let shirt = Product::new(ProductId(1), "Shirt", Money::from_cents(5000), 10);
//!
//! let mut cart = Cart::new();
//! cart.add_unit(&shirt);
//! cart.add_unit(&shirt);
//!
//! let totals = cart.totals();
//! assert_eq!(totals.total_quantity, 2);
//! assert_eq!(totals.total_cents, 10_000); // $100.00, computed in cents
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lojinha_core::Money` instead of
// `use lojinha_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals, RemoveOne};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::{Product, ProductId};
