//! Order records.
//!
//! An order is created once at final checkout submission with a pending
//! payment; afterwards only its payment status, overall status, and
//! transaction id change. Orders are never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sheger_market_core::{
    Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, TransactionId, UserId,
};

use crate::cart::CartItem;
use crate::form::ShippingAddress;

/// A persisted order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier; immutable after creation.
    pub id: OrderId,
    pub user_id: UserId,
    /// Line items, in cart order.
    pub items: Vec<OrderItem>,
    /// Grand total charged for the order.
    pub total: Money,
    pub shipping_address: ShippingAddress,
    pub payment: OrderPayment,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One purchased line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Payment details attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Set once the processor has assigned a transaction.
    pub transaction_id: Option<TransactionId>,
}

/// An order draft, before the store assigns an identifier.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Materialize the draft into an [`Order`] with a store-assigned id.
    ///
    /// New orders start with both the payment and the order pending.
    #[must_use]
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            items: self.items,
            total: self.total,
            shipping_address: self.shipping_address,
            payment: OrderPayment {
                method: self.payment_method,
                status: PaymentStatus::Pending,
                transaction_id: None,
            },
            status: OrderStatus::Pending,
            created_at,
        }
    }
}

/// A partial update applied to an existing order.
///
/// Only the fields that may change after creation appear here.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub status: Option<OrderStatus>,
    pub transaction_id: Option<TransactionId>,
}

impl OrderUpdate {
    /// The update recorded after a confirmed payment.
    #[must_use]
    pub const fn payment_confirmed(status: OrderStatus, transaction_id: TransactionId) -> Self {
        Self {
            payment_status: Some(PaymentStatus::Completed),
            status: Some(status),
            transaction_id: Some(transaction_id),
        }
    }
}
