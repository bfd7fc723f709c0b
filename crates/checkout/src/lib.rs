//! Sheger Market Checkout - Multi-step checkout core.
//!
//! This crate implements the checkout session for the storefront: a
//! four-step form (Contact, Shipping, Payment, Review) with per-step
//! validation, a payment-method switch covering the regional methods
//! (Telebirr mobile money, bank transfer, card, cash on delivery), and
//! finalization against a set of injected collaborator ports.
//!
//! # Architecture
//!
//! The [`session::CheckoutSession`] owns all mutable checkout state and is
//! the only component with side effects. Everything it talks to is a
//! trait:
//!
//! - [`gateway::PaymentGateway`] - the payment processor. The shipped
//!   [`gateway::SimulatedGateway`] stands in for a real processor with
//!   configurable latency; production wires a real adapter.
//! - [`store::OrderStore`] - the order document store.
//! - [`cart::CartProvider`] - the shopper's cart (items, subtotal, clear).
//! - [`identity::IdentityProvider`] - the authenticated shopper.
//! - [`navigation::Navigator`] - receives view-change requests; this crate
//!   never renders.
//!
//! Validation ([`validation`]) and pricing ([`pricing`]) are pure modules
//! with no side effects.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod navigation;
pub mod pricing;
pub mod session;
pub mod store;
pub mod validation;

pub use cart::{CartItem, CartProvider, InMemoryCart};
pub use config::{CheckoutConfig, ConfigError};
pub use error::CheckoutError;
pub use form::{CardDetails, CheckoutForm, ContactInfo, Field, PaymentData, ShippingAddress};
pub use gateway::{GatewayError, PaymentGateway, SimulatedGateway};
pub use identity::{AuthenticatedUser, IdentityProvider, StaticIdentity};
pub use models::order::{NewOrder, Order, OrderItem, OrderPayment, OrderUpdate};
pub use navigation::{NavigationTarget, Navigator, RecordingNavigator};
pub use session::{CheckoutPhase, CheckoutSession, CheckoutStep, SubmitOutcome};
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
pub use validation::{ETHIOPIAN_BANKS, ValidationErrors, validate_payment_data, validate_step};
