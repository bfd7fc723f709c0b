//! Cart provider port.
//!
//! The cart lives with the surrounding storefront session; checkout only
//! reads its lines and subtotal, and clears it after a confirmed order.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sheger_market_core::ProductId;
use tokio::sync::RwLock;

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Price x quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The shopper's cart as checkout sees it.
#[async_trait]
pub trait CartProvider: Send + Sync {
    /// Current cart lines, in display order.
    async fn items(&self) -> Vec<CartItem>;

    /// Sum of line totals.
    async fn subtotal(&self) -> Decimal;

    /// Empty the cart. Called only after both persistence and payment
    /// have succeeded.
    async fn clear(&self);
}

/// A thread-safe in-memory cart for tests and the demo CLI.
#[derive(Default, Clone)]
pub struct InMemoryCart {
    lines: Arc<RwLock<Vec<CartItem>>>,
}

impl InMemoryCart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cart pre-filled with `items`.
    #[must_use]
    pub fn with_items(items: Vec<CartItem>) -> Self {
        Self {
            lines: Arc::new(RwLock::new(items)),
        }
    }

    /// Append a line to the cart.
    pub async fn add(&self, item: CartItem) {
        self.lines.write().await.push(item);
    }

    /// True when the cart holds no lines.
    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }
}

#[async_trait]
impl CartProvider for InMemoryCart {
    async fn items(&self) -> Vec<CartItem> {
        self.lines.read().await.clone()
    }

    async fn subtotal(&self) -> Decimal {
        self.lines
            .read()
            .await
            .iter()
            .map(CartItem::line_total)
            .sum()
    }

    async fn clear(&self) {
        self.lines.write().await.clear();
    }
}
