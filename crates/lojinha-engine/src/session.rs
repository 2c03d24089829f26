//! # Session Store
//!
//! Session-keyed cart container. A pure container: no validation, no
//! stock accounting, just `get` and `save` keyed by session identity.
//!
//! ## Thread Safety
//! One session is effectively single-writer (one visitor, one browser),
//! but the map itself is shared across worker threads, so access stays
//! behind a Mutex. The lock is held only long enough to clone or replace
//! a cart - never across an engine operation.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lojinha_core::Cart;

// =============================================================================
// Session Id
// =============================================================================

/// Opaque session handle.
///
/// The presentation layer mints one per visitor (typically stored in a
/// cookie) and passes it into every engine call. The engine never
/// inspects it beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mints a fresh session handle.
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// In-memory session-id → Cart container.
///
/// The backend is swappable without touching business logic: anything
/// offering get/save by session identity (a distributed cache, a cookie
/// codec) can stand in for this map.
#[derive(Debug, Default)]
pub struct SessionStore {
    carts: Mutex<HashMap<SessionId, Cart>>,
}

impl SessionStore {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the session's cart; an empty cart on first access.
    pub fn get(&self, session: SessionId) -> Cart {
        let carts = self.carts.lock().expect("session mutex poisoned");
        carts.get(&session).cloned().unwrap_or_default()
    }

    /// Replaces the stored cart for a session.
    pub fn save(&self, session: SessionId, cart: Cart) {
        let mut carts = self.carts.lock().expect("session mutex poisoned");
        carts.insert(session, cart);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
