//! Navigation port.
//!
//! This core never renders; when checkout finishes (or fails after
//! payment dispatch) it asks the surrounding shell to show a view,
//! passing the payload that view needs.

use std::sync::Mutex;

use sheger_market_core::{Money, OrderId, TransactionId};

use crate::session::CheckoutStep;

/// A view-change request with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Show the order confirmation view.
    OrderConfirmation {
        order_id: OrderId,
        total: Money,
        /// Absent for cash on delivery.
        transaction_id: Option<TransactionId>,
    },
    /// Show the payment error view, with a way back into checkout.
    PaymentFailed {
        reason: String,
        /// The step to return the shopper to.
        retry_from: CheckoutStep,
    },
}

/// Receiver of navigation requests.
pub trait Navigator: Send + Sync {
    /// Request that the shell navigate to `target`.
    fn navigate(&self, target: NavigationTarget);
}

/// A navigator that records every request, for tests and the demo CLI.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    /// A navigator with no recorded requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<NavigationTarget> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last(&self) -> Option<NavigationTarget> {
        self.requests().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: NavigationTarget) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(target);
        }
    }
}
