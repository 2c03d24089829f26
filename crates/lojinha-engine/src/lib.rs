//! # lojinha-engine: Shared Stores and Cart Operations
//!
//! Everything stateful lives here: the process-wide catalog with its live
//! stock counters, the session-keyed cart container, and the engine that
//! couples the two on every operation.
//!
//! ## State Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       CartEngine                                 │   │
//! │  │  add_item / add_more / remove_one / remove_all /                │   │
//! │  │  remove_matching / totals / checkout                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                              │                        │
//! │                 ▼                              ▼                        │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────────┐    │
//! │  │      CatalogStore        │  │         SessionStore             │    │
//! │  │                          │  │                                  │    │
//! │  │  SHARED across every     │  │  ISOLATED per session            │    │
//! │  │  session; per-product    │  │  Mutex<HashMap<SessionId, Cart>> │    │
//! │  │  Mutex<i64> stock        │  │                                  │    │
//! │  └──────────────────────────┘  └──────────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CatalogStore: check-then-decrement happens under the entry lock,    │
//! │    so two sessions can never both reserve the last unit               │
//! │  • SessionStore: one session is effectively single-writer, but the    │
//! │    map itself is shared across worker threads and stays guarded       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conservation Invariant
//!
//! For every product P, after every operation:
//!
//! `stock(P) + Σ(line quantities for P across all sessions) == initial_stock(P)`
//!
//! Reservation moves a unit from the catalog into a cart line; every
//! removal path releases it back; checkout discards the reserved units
//! permanently (sold) without restoring them.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod response;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{demo_catalog, CatalogStore};
pub use engine::CartEngine;
pub use response::{CartResponse, CartSnapshot, CheckoutReceipt, ErrorCode, Outcome};
pub use session::{SessionId, SessionStore};
