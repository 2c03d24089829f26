//! # Engine Responses
//!
//! The tagged results every cart operation returns to the presentation
//! layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Lojinha                                │
//! │                                                                         │
//! │  Presentation Layer              Cart Engine                            │
//! │  ──────────────────              ───────────                            │
//! │                                                                         │
//! │  dispatch add_item(session, 2)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Operation                                                       │  │
//! │  │         │                                                        │  │
//! │  │  Unknown product? ── CoreError::ProductNotFound ──┐              │  │
//! │  │         │                                         ▼              │  │
//! │  │  Sold out? ───────── CoreError::OutOfStock ──── CartResponse ───►│  │
//! │  │         │                                      (outcome=error)   │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─────────────────────────────────── CartResponse ──────►│  │
//! │  │                                              (outcome=success)   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The engine NEVER raises past its own call: every error is folded      │
//! │  into a tagged response the caller flashes to the visitor.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use lojinha_core::{Cart, CartLine, CartTotals, CoreError, Money};

// =============================================================================
// Outcome
// =============================================================================

/// Whether the operation succeeded, for flash-style UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Operation applied; message describes what happened.
    Success,
    /// Operation rejected; state is untouched, message says why.
    Error,
}

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error codes for programmatic handling.
///
/// The message alongside is for humans; the code lets the presentation
/// layer branch without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id referenced by any operation.
    NotFound,

    /// Reserve requested when catalog stock is insufficient.
    OutOfStock,

    /// Cart operation targeted a product id or substring absent from
    /// this session's cart.
    LineNotFound,
}

impl From<&CoreError> for ErrorCode {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::LineNotFound(_) | CoreError::NoLineMatches(_) => ErrorCode::LineNotFound,
        }
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Cart contents plus totals, for re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            items: cart.lines.clone(),
            totals: cart.totals(),
        }
    }
}

// =============================================================================
// Cart Response
// =============================================================================

/// Result of a cart operation: outcome tag, flash message, and the
/// resulting cart for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// Success or error tag.
    pub outcome: Outcome,

    /// Machine-readable code, set when `outcome` is `Error`.
    pub code: Option<ErrorCode>,

    /// Human-readable flash message for display.
    pub message: String,

    /// The session's cart after the operation (unchanged on error).
    pub cart: CartSnapshot,
}

impl CartResponse {
    /// Builds a success response around the updated cart.
    pub fn success(message: impl Into<String>, cart: &Cart) -> Self {
        CartResponse {
            outcome: Outcome::Success,
            code: None,
            message: message.into(),
            cart: CartSnapshot::from(cart),
        }
    }

    /// Builds an error response around the untouched cart.
    pub fn error(err: &CoreError, message: impl Into<String>, cart: &Cart) -> Self {
        CartResponse {
            outcome: Outcome::Error,
            code: Some(ErrorCode::from(err)),
            message: message.into(),
            cart: CartSnapshot::from(cart),
        }
    }

    /// Checks the outcome tag.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

// =============================================================================
// Checkout Receipt
// =============================================================================

/// Result of a checkout: the final total computed before the cart was
/// cleared. Reserved units are considered sold permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Total price of the purchase, exactly in cents.
    pub total: Money,

    /// Units sold across all lines.
    pub total_quantity: i64,

    /// Flash message for the confirmation view.
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
