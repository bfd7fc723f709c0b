//! In-memory order store.
//!
//! Backs tests and the demo CLI. Assigns random document ids the way the
//! hosted store does.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sheger_market_core::OrderId;
use tokio::sync::RwLock;

use super::{OrderStore, StoreError};
use crate::models::order::{NewOrder, Order, OrderUpdate};

/// A thread-safe in-memory order store.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders currently held.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// True when no orders have been created.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    /// Snapshot of all orders, in no particular order.
    pub async fn all_orders(&self) -> Vec<Order> {
        self.orders.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let id = OrderId::random();
        let order = order.into_order(id.clone(), Utc::now());

        let mut orders = self.orders.write().await;
        orders.insert(id.clone(), order);
        Ok(id)
    }

    async fn update_order(&self, id: &OrderId, update: OrderUpdate) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(payment_status) = update.payment_status {
            order.payment.status = payment_status;
        }
        if let Some(status) = update.status {
            order.status = status;
        }
        if let Some(transaction_id) = update.transaction_id {
            order.payment.transaction_id = Some(transaction_id);
        }
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }
}
