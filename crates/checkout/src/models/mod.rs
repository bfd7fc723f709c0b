//! Domain models persisted to the order store.

pub mod order;

pub use order::{NewOrder, Order, OrderItem, OrderPayment, OrderUpdate};
