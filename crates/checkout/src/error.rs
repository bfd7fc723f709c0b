//! Checkout error taxonomy.
//!
//! Field-level validation problems are not errors in this sense; they
//! live in [`crate::validation::ValidationErrors`] and block a step
//! without being faults. The variants here are the conditions the session
//! catches at its boundary and turns into a single user-visible message.
//! None of them propagate past it.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::store::StoreError;

/// Errors surfaced by the checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No authenticated user; checkout refuses to start.
    #[error("sign in to check out")]
    NotAuthenticated,

    /// The cart has no items; checkout refuses to start.
    #[error("your cart is empty")]
    EmptyCart,

    /// The payment processor declined or failed.
    #[error("payment error: {0}")]
    Gateway(#[from] GatewayError),

    /// The order store failed.
    #[error("order store error: {0}")]
    Store(#[from] StoreError),
}
