//! # Cart Engine
//!
//! The business operations: every cart mutation atomically coupled to the
//! matching catalog stock mutation.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operation Lifecycle                             │
//! │                                                                         │
//! │  Inbound action (add, add-more, remove-one, remove-all,                │
//! │  remove-matching, totals, checkout)                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. get(session) → working copy of the cart                    │    │
//! │  │  2. reserve/release stock (atomic check under the entry lock)  │    │
//! │  │  3. mutate the working copy                                    │    │
//! │  │  4. save(session, cart) ← the commit point                     │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CartResponse { outcome, code, message, cart }                          │
//! │                                                                         │
//! │  ERROR PATHS: steps 2-4 are skipped entirely - an error response        │
//! │  wraps the untouched cart, and the catalog was never mutated.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Restock Policy
//! Every removal path (remove-one, remove-all, remove-matching) releases
//! the removed quantity back to the catalog: an abandoned cart restocks.
//! Checkout does not: the reserved units are sold permanently. The
//! asymmetry is intentional business policy.

use tracing::{debug, error};

use lojinha_core::{CoreError, ProductId};

use crate::catalog::CatalogStore;
use crate::response::{CartResponse, CartSnapshot, CheckoutReceipt};
use crate::session::{SessionId, SessionStore};

// =============================================================================
// Cart Engine
// =============================================================================

/// The cart business logic, bound to an injected catalog and session store.
///
/// ## Thread Safety
/// All operations take `&self`; the stores guard their own state, so one
/// engine value can be shared (`Arc<CartEngine>`) across worker threads.
/// Operations are short synchronous units of work - no suspension, no
/// background tasks.
#[derive(Debug)]
pub struct CartEngine {
    catalog: CatalogStore,
    sessions: SessionStore,
}

impl CartEngine {
    /// Creates an engine over the given stores.
    pub fn new(catalog: CatalogStore, sessions: SessionStore) -> Self {
        CartEngine { catalog, sessions }
    }

    /// The shared catalog (menu rendering, stock inspection).
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    // -------------------------------------------------------------------------
    // Add operations
    // -------------------------------------------------------------------------

    /// Adds one unit of a product to the session's cart.
    ///
    /// ## Behavior
    /// - Unknown product → error "Product not found."
    /// - Sold out → error "Out of stock for {name}.", no mutation
    /// - Otherwise: reserve 1 unit, increment the existing line or append
    ///   a new quantity-1 line with a name/price snapshot, save
    pub fn add_item(&self, session: SessionId, product_id: ProductId) -> CartResponse {
        debug!(%session, product_id = %product_id, "add_item");
        let mut cart = self.sessions.get(session);

        // Single atomic stock check: two sessions racing for the last unit
        // can never both get here with a reservation.
        let product = match self.catalog.reserve(product_id, 1) {
            Ok(product) => product,
            Err(err) => {
                let message = match &err {
                    CoreError::OutOfStock { name, .. } => format!("Out of stock for {name}."),
                    _ => "Product not found.".to_string(),
                };
                return CartResponse::error(&err, message, &cart);
            }
        };

        cart.add_unit(&product);
        let response = CartResponse::success(format!("{} added to cart.", product.name), &cart);
        self.sessions.save(session, cart);
        response
    }

    /// Adds one more unit of a product already in the session's cart.
    ///
    /// ## Behavior
    /// - Unknown product → error "Product not found."
    /// - Sold out → error "No more units of {name} in stock.", no mutation
    /// - Line present → reserve 1 unit, increment
    /// - Line absent → explicit fall-through to first-add semantics: the
    ///   same reservation backs a fresh quantity-1 line instead
    pub fn add_more(&self, session: SessionId, product_id: ProductId) -> CartResponse {
        debug!(%session, product_id = %product_id, "add_more");
        let mut cart = self.sessions.get(session);

        let product = match self.catalog.reserve(product_id, 1) {
            Ok(product) => product,
            Err(err) => {
                let message = match &err {
                    CoreError::OutOfStock { name, .. } => {
                        format!("No more units of {name} in stock.")
                    }
                    _ => "Product not found.".to_string(),
                };
                return CartResponse::error(&err, message, &cart);
            }
        };

        // Explicit branch in the state machine: absent → present(1) is the
        // first-add transition, present(n) → present(n+1) is the increment.
        let created = cart.add_unit(&product);
        let message = if created {
            format!("{} added to cart.", product.name)
        } else {
            format!("One more unit of {} added.", product.name)
        };

        let response = CartResponse::success(message, &cart);
        self.sessions.save(session, cart);
        response
    }

    // -------------------------------------------------------------------------
    // Remove operations
    // -------------------------------------------------------------------------

    /// Removes one unit of a product from the session's cart, releasing it
    /// back to the catalog.
    ///
    /// ## Behavior
    /// - No matching line → error "Item not found in cart."
    /// - Quantity > 1 → decrement; quantity == 1 → drop the line entirely
    ///   (never a quantity-0 line)
    pub fn remove_one(&self, session: SessionId, product_id: ProductId) -> CartResponse {
        debug!(%session, product_id = %product_id, "remove_one");
        let mut cart = self.sessions.get(session);

        let name = match cart.line(product_id) {
            Some(line) => line.name.clone(),
            None => {
                let err = CoreError::LineNotFound(product_id);
                return CartResponse::error(&err, "Item not found in cart.", &cart);
            }
        };

        self.release_reserved(product_id, 1);
        cart.remove_unit(product_id);

        let response =
            CartResponse::success(format!("One unit of {name} removed from cart."), &cart);
        self.sessions.save(session, cart);
        response
    }

    /// Removes a product's whole line from the session's cart, releasing
    /// its full quantity back to the catalog.
    pub fn remove_all(&self, session: SessionId, product_id: ProductId) -> CartResponse {
        debug!(%session, product_id = %product_id, "remove_all");
        let mut cart = self.sessions.get(session);

        let line = match cart.take_line(product_id) {
            Some(line) => line,
            None => {
                let err = CoreError::LineNotFound(product_id);
                return CartResponse::error(&err, "Item not found in cart.", &cart);
            }
        };

        self.release_reserved(line.product_id, line.quantity);

        let response = CartResponse::success(
            format!("All units of {} removed from cart.", line.name),
            &cart,
        );
        self.sessions.save(session, cart);
        response
    }

    /// Removes every line whose name contains `needle` (case-insensitive),
    /// releasing the removed quantities back to the catalog. Non-matching
    /// lines are retained in original order.
    ///
    /// ## Behavior
    /// - At least one match → success "Items containing '{needle}' removed
    ///   from cart."
    /// - No match → error "No item containing '{needle}' in cart.", cart
    ///   unchanged (still re-saved, a no-op)
    pub fn remove_matching(&self, session: SessionId, needle: &str) -> CartResponse {
        debug!(%session, needle, "remove_matching");
        let mut cart = self.sessions.get(session);

        let taken = cart.take_matching(needle);
        if taken.is_empty() {
            let err = CoreError::NoLineMatches(needle.to_string());
            let response = CartResponse::error(
                &err,
                format!("No item containing '{needle}' in cart."),
                &cart,
            );
            self.sessions.save(session, cart);
            return response;
        }

        for line in &taken {
            self.release_reserved(line.product_id, line.quantity);
        }

        let response = CartResponse::success(
            format!("Items containing '{needle}' removed from cart."),
            &cart,
        );
        self.sessions.save(session, cart);
        response
    }

    // -------------------------------------------------------------------------
    // Totals & checkout
    // -------------------------------------------------------------------------

    /// Current cart contents plus totals (Σ unit price × quantity in exact
    /// cents, Σ quantity).
    pub fn totals(&self, session: SessionId) -> CartSnapshot {
        debug!(%session, "totals");
        CartSnapshot::from(&self.sessions.get(session))
    }

    /// Finalizes the purchase: computes the total over the current cart,
    /// clears it, and saves the empty cart.
    ///
    /// No stock is released - the reserved units are sold permanently.
    /// Checkout of an empty cart yields a $0.00 receipt.
    pub fn checkout(&self, session: SessionId) -> CheckoutReceipt {
        debug!(%session, "checkout");
        let mut cart = self.sessions.get(session);
        let totals = cart.totals();

        cart.clear();
        self.sessions.save(session, cart);

        CheckoutReceipt {
            total: totals.total_price(),
            total_quantity: totals.total_quantity,
            message: "Purchase complete. Thank you!".to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Releases previously reserved units back to the catalog.
    ///
    /// A cart line can only reference a catalog product and the catalog is
    /// static for the process lifetime, so the lookup cannot fail under
    /// correct usage; a failure here means the invariant is already broken
    /// and is logged rather than surfaced to the visitor.
    fn release_reserved(&self, product_id: ProductId, qty: i64) {
        if let Err(err) = self.catalog.release(product_id, qty) {
            error!(%product_id, qty, %err, "release failed for a reserved line");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::catalog::demo_catalog;
    use crate::response::{ErrorCode, Outcome};
    use lojinha_core::{Money, Product};

    const SHIRT: ProductId = ProductId(1);
    const PANTS: ProductId = ProductId(2);
    const CAP: ProductId = ProductId(4);

    fn engine() -> CartEngine {
        CartEngine::new(CatalogStore::new(demo_catalog()), SessionStore::new())
    }

    /// stock(P) + Σ(line quantities for P across all sessions) == initial_stock(P)
    fn assert_conserved(engine: &CartEngine, sessions: &[SessionId]) {
        for seed in demo_catalog() {
            let reserved: i64 = sessions
                .iter()
                .flat_map(|s| engine.totals(*s).items)
                .filter(|line| line.product_id == seed.id)
                .map(|line| line.quantity)
                .sum();
            assert_eq!(
                engine.catalog().stock(seed.id).unwrap() + reserved,
                seed.stock,
                "conservation violated for product {}",
                seed.id
            );
        }
    }

    // -------------------------------------------------------------------------
    // add_item
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_item_reserves_and_creates_line() {
        let engine = engine();
        let session = SessionId::new();

        let response = engine.add_item(session, SHIRT);
        assert!(response.is_success());
        assert_eq!(response.message, "Shirt added to cart.");
        assert_eq!(response.cart.items.len(), 1);
        assert_eq!(response.cart.items[0].quantity, 1);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));
    }

    #[test]
    fn test_add_item_unknown_product() {
        let engine = engine();
        let session = SessionId::new();

        let response = engine.add_item(session, ProductId(99));
        assert_eq!(response.outcome, Outcome::Error);
        assert_eq!(response.code, Some(ErrorCode::NotFound));
        assert_eq!(response.message, "Product not found.");
        assert!(response.cart.items.is_empty());
    }

    #[test]
    fn test_add_item_out_of_stock_never_creates_line() {
        let catalog = CatalogStore::new(vec![Product::new(
            SHIRT,
            "Shirt",
            Money::from_cents(5000),
            0,
        )]);
        let engine = CartEngine::new(catalog, SessionStore::new());
        let session = SessionId::new();

        for _ in 0..3 {
            let response = engine.add_item(session, SHIRT);
            assert_eq!(response.code, Some(ErrorCode::OutOfStock));
            assert_eq!(response.message, "Out of stock for Shirt.");
            assert!(response.cart.items.is_empty());
        }
        assert_eq!(engine.catalog().stock(SHIRT), Some(0));
    }

    // -------------------------------------------------------------------------
    // add_more
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_more_increments_existing_line() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        let response = engine.add_more(session, SHIRT);

        assert!(response.is_success());
        assert_eq!(response.message, "One more unit of Shirt added.");
        assert_eq!(response.cart.items[0].quantity, 2);
        assert_eq!(engine.catalog().stock(SHIRT), Some(8));
    }

    #[test]
    fn test_add_more_falls_through_to_first_add() {
        let engine = engine();
        let session = SessionId::new();

        // No line yet: add_more behaves exactly like a first add.
        let response = engine.add_more(session, SHIRT);
        assert!(response.is_success());
        assert_eq!(response.message, "Shirt added to cart.");
        assert_eq!(response.cart.items[0].quantity, 1);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));
    }

    #[test]
    fn test_add_more_out_of_stock_message() {
        let catalog = CatalogStore::new(vec![Product::new(
            SHIRT,
            "Shirt",
            Money::from_cents(5000),
            1,
        )]);
        let engine = CartEngine::new(catalog, SessionStore::new());
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        let response = engine.add_more(session, SHIRT);

        assert_eq!(response.code, Some(ErrorCode::OutOfStock));
        assert_eq!(response.message, "No more units of Shirt in stock.");
        assert_eq!(response.cart.items[0].quantity, 1); // unchanged
    }

    #[test]
    fn test_add_more_unknown_product() {
        let engine = engine();
        let response = engine.add_more(SessionId::new(), ProductId(99));
        assert_eq!(response.code, Some(ErrorCode::NotFound));
        assert_eq!(response.message, "Product not found.");
    }

    // -------------------------------------------------------------------------
    // remove_one
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_then_remove_one_round_trips() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        let response = engine.remove_one(session, SHIRT);

        assert!(response.is_success());
        assert_eq!(response.message, "One unit of Shirt removed from cart.");
        // Stock and cart are back to their prior state exactly
        assert!(response.cart.items.is_empty());
        assert_eq!(engine.catalog().stock(SHIRT), Some(10));
    }

    #[test]
    fn test_remove_one_decrements_when_quantity_above_one() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        engine.add_more(session, SHIRT);
        let response = engine.remove_one(session, SHIRT);

        assert_eq!(response.cart.items[0].quantity, 1);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));
    }

    #[test]
    fn test_remove_one_at_quantity_one_drops_the_line() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        let response = engine.remove_one(session, SHIRT);

        // The line is gone, not present with quantity 0
        assert!(response.cart.items.is_empty());
    }

    #[test]
    fn test_remove_one_missing_line() {
        let engine = engine();
        let response = engine.remove_one(SessionId::new(), SHIRT);

        assert_eq!(response.code, Some(ErrorCode::LineNotFound));
        assert_eq!(response.message, "Item not found in cart.");
        assert_eq!(engine.catalog().stock(SHIRT), Some(10));
    }

    // -------------------------------------------------------------------------
    // remove_all
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_all_releases_full_quantity() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        engine.add_more(session, SHIRT);
        engine.add_more(session, SHIRT);
        assert_eq!(engine.catalog().stock(SHIRT), Some(7));

        let response = engine.remove_all(session, SHIRT);
        assert!(response.is_success());
        assert_eq!(response.message, "All units of Shirt removed from cart.");
        assert!(response.cart.items.is_empty());
        assert_eq!(engine.catalog().stock(SHIRT), Some(10));
    }

    #[test]
    fn test_remove_all_twice_is_idempotent() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        assert!(engine.remove_all(session, SHIRT).is_success());

        // Second call: LineNotFound, no further stock change
        let second = engine.remove_all(session, SHIRT);
        assert_eq!(second.code, Some(ErrorCode::LineNotFound));
        assert_eq!(engine.catalog().stock(SHIRT), Some(10));
    }

    // -------------------------------------------------------------------------
    // remove_matching
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_matching_releases_and_retains_order() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        engine.add_item(session, PANTS);
        engine.add_item(session, CAP);
        engine.add_more(session, CAP);

        // "CAP" matches case-insensitively
        let response = engine.remove_matching(session, "CAP");
        assert!(response.is_success());
        assert_eq!(
            response.message,
            "Items containing 'CAP' removed from cart."
        );

        let names: Vec<&str> = response
            .cart
            .items
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Shirt", "Pants"]);

        // Both Cap units released
        assert_eq!(engine.catalog().stock(CAP), Some(15));
    }

    #[test]
    fn test_remove_matching_no_match_changes_nothing() {
        let engine = engine();
        let session = SessionId::new();

        engine.add_item(session, SHIRT);
        let response = engine.remove_matching(session, "xyz");

        assert_eq!(response.code, Some(ErrorCode::LineNotFound));
        assert_eq!(response.message, "No item containing 'xyz' in cart.");
        assert_eq!(response.cart.items.len(), 1);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));
    }

    // -------------------------------------------------------------------------
    // totals & checkout
    // -------------------------------------------------------------------------

    #[test]
    fn test_shirt_scenario_end_to_end() {
        let engine = engine();
        let session = SessionId::new();

        // add_item(1) → stock=9, cart=[{id:1, qty:1}]
        engine.add_item(session, SHIRT);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));

        // add_item(1) again → stock=8, cart=[{id:1, qty:2}]
        let response = engine.add_item(session, SHIRT);
        assert_eq!(engine.catalog().stock(SHIRT), Some(8));
        assert_eq!(response.cart.items[0].quantity, 2);

        // remove_one(1) → stock=9, cart=[{id:1, qty:1}]
        engine.remove_one(session, SHIRT);
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));

        // totals → ($50.00, 1)
        let snapshot = engine.totals(session);
        assert_eq!(snapshot.totals.total_cents, 5000);
        assert_eq!(snapshot.totals.total_quantity, 1);

        // checkout → total $50.00, cart empty, stock stays at 9 (sold)
        let receipt = engine.checkout(session);
        assert_eq!(receipt.total, Money::from_cents(5000));
        assert_eq!(receipt.total_quantity, 1);
        assert_eq!(receipt.message, "Purchase complete. Thank you!");
        assert!(engine.totals(session).items.is_empty());
        assert_eq!(engine.catalog().stock(SHIRT), Some(9));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let engine = engine();
        let receipt = engine.checkout(SessionId::new());
        assert_eq!(receipt.total, Money::zero());
        assert_eq!(receipt.total_quantity, 0);
    }

    // -------------------------------------------------------------------------
    // Invariants & concurrency
    // -------------------------------------------------------------------------

    #[test]
    fn test_stock_is_conserved_across_operation_sequences() {
        let engine = engine();
        let (a, b) = (SessionId::new(), SessionId::new());
        let sessions = [a, b];

        engine.add_item(a, SHIRT);
        assert_conserved(&engine, &sessions);

        engine.add_item(b, SHIRT);
        engine.add_more(b, SHIRT);
        assert_conserved(&engine, &sessions);

        engine.add_item(a, PANTS);
        engine.remove_one(a, SHIRT);
        assert_conserved(&engine, &sessions);

        engine.remove_all(b, SHIRT);
        assert_conserved(&engine, &sessions);

        engine.remove_matching(a, "pan");
        assert_conserved(&engine, &sessions);

        // Checkout discards session a's reservations permanently: the
        // invariant keeps holding for everything still reserved elsewhere.
        engine.add_item(a, CAP);
        engine.checkout(a);
        assert_eq!(engine.catalog().stock(CAP), Some(14));
        assert!(engine.totals(a).items.is_empty());
        assert_conserved(&engine, &[b]);
    }

    #[test]
    fn test_concurrent_sessions_race_for_last_unit() {
        let catalog = CatalogStore::new(vec![Product::new(
            SHIRT,
            "Shirt",
            Money::from_cents(5000),
            1,
        )]);
        let engine = Arc::new(CartEngine::new(catalog, SessionStore::new()));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let session = SessionId::new();
                thread::spawn(move || engine.add_item(session, SHIRT))
            })
            .collect();

        let results: Vec<CartResponse> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one session wins the last unit
        let successes = results.iter().filter(|r| r.is_success()).count();
        assert_eq!(successes, 1);

        let loser = results.iter().find(|r| !r.is_success()).unwrap();
        assert_eq!(loser.code, Some(ErrorCode::OutOfStock));

        // Stock never goes negative
        assert_eq!(engine.catalog().stock(SHIRT), Some(0));
    }

    #[test]
    fn test_many_threads_never_oversell() {
        let catalog = CatalogStore::new(vec![Product::new(
            SHIRT,
            "Shirt",
            Money::from_cents(5000),
            4,
        )]);
        let engine = Arc::new(CartEngine::new(catalog, SessionStore::new()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let session = SessionId::new();
                thread::spawn(move || engine.add_item(session, SHIRT))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(CartResponse::is_success)
            .count();

        assert_eq!(successes, 4);
        assert_eq!(engine.catalog().stock(SHIRT), Some(0));
    }
}
