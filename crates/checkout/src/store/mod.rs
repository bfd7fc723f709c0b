//! Order store port.
//!
//! The production store is a hosted document database used opaquely:
//! `create_order` returns the store-assigned identifier, `update_order`
//! applies a partial update. Each call is atomic; the store gives
//! at-least-once delivery with no partial writes visible.

mod memory;

pub use memory::InMemoryOrderStore;

use async_trait::async_trait;
use sheger_market_core::OrderId;

use crate::models::order::{NewOrder, Order, OrderUpdate};

/// Errors from the order store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store rejected or failed the call.
    #[error("order store error: {0}")]
    Backend(String),

    /// No order exists with the given id.
    #[error("order not found: {0}")]
    NotFound(OrderId),
}

/// The order document store behind checkout.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order and return its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails.
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, StoreError>;

    /// Apply a partial update to an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Backend`] if the write fails.
    async fn update_order(&self, id: &OrderId, update: OrderUpdate) -> Result<(), StoreError>;

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the read fails.
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;
}
