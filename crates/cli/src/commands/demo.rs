//! Scripted checkout demo.
//!
//! Wires the simulated gateway and the in-memory adapters together and
//! walks a full checkout for a sample cart, printing the resulting order.
//! Useful for eyeballing the flow end to end without a storefront.

use std::sync::Arc;

use rust_decimal_macros::dec;
use thiserror::Error;

use sheger_market_checkout::{
    AuthenticatedUser, CartItem, CheckoutConfig, CheckoutError, CheckoutSession, ConfigError,
    Field, InMemoryCart, InMemoryOrderStore, Navigator, OrderStore, RecordingNavigator,
    SimulatedGateway, StaticIdentity, SubmitOutcome,
};
use sheger_market_core::{Email, PaymentMethod, ProductId, ShippingMethod, UserId};

/// Errors that can occur while running the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Checkout refused to start.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The method argument was not a known payment method.
    #[error("unknown payment method: {0}. Valid: telebirr, bank_transfer, mastercard, cash_on_delivery")]
    UnknownMethod(String),

    /// The scripted flow hit an unexpected outcome.
    #[error("demo checkout did not complete: {0}")]
    Incomplete(String),
}

/// Run the scripted checkout.
pub async fn run(method: &str, express: bool) -> Result<(), DemoError> {
    let method: PaymentMethod = method
        .parse()
        .map_err(|_| DemoError::UnknownMethod(method.to_owned()))?;

    let config = CheckoutConfig::from_env()?;
    let gateway = Arc::new(SimulatedGateway::new(config.gateway_latency));
    let store = InMemoryOrderStore::new();
    let cart = sample_cart();
    let navigator = Arc::new(RecordingNavigator::new());
    let identity = StaticIdentity::signed_in(demo_shopper());

    let session = CheckoutSession::begin(
        config,
        &identity,
        gateway,
        Arc::new(store.clone()),
        Arc::new(cart),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    )
    .await?;

    fill_contact(&session).await;
    advance_or_report(&session, "contact").await?;

    fill_shipping(&session, express).await;
    advance_or_report(&session, "shipping").await?;

    fill_payment(&session, method).await;
    advance_or_report(&session, "payment").await?;

    let outcome = session.submit_final().await;
    let outcome = match outcome {
        SubmitOutcome::VerificationRequired { transaction_id } => {
            tracing::info!(%transaction_id, "verifying with the simulated wallet code");
            session.submit_verification("123456").await
        }
        other => other,
    };

    match outcome {
        SubmitOutcome::Confirmed { order_id, .. } => {
            print_order(&store, &order_id).await;
            Ok(())
        }
        SubmitOutcome::Failed { reason } => Err(DemoError::Incomplete(reason)),
        other => Err(DemoError::Incomplete(format!("unexpected outcome: {other:?}"))),
    }
}

fn demo_shopper() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new("usr_demo"),
        email: Email::parse("demo@shegermarket.et").expect("valid demo email"),
    }
}

fn sample_cart() -> InMemoryCart {
    InMemoryCart::with_items(vec![
        CartItem {
            id: ProductId::new("prod_yirgacheffe"),
            name: "Yirgacheffe Coffee 1kg".to_owned(),
            price: dec!(850.00),
            quantity: 1,
        },
        CartItem {
            id: ProductId::new("prod_shemma"),
            name: "Handwoven Shemma Scarf".to_owned(),
            price: dec!(1200.00),
            quantity: 2,
        },
    ])
}

async fn fill_contact(session: &CheckoutSession) {
    session.set_field(Field::Email, "demo@shegermarket.et").await;
    session.set_field(Field::FirstName, "Makeda").await;
    session.set_field(Field::LastName, "Alemu").await;
    session.set_field(Field::Phone, "+251911223344").await;
}

async fn fill_shipping(session: &CheckoutSession, express: bool) {
    session.set_field(Field::Address, "Bole Road 22").await;
    session.set_field(Field::City, "Addis Ababa").await;
    session.set_field(Field::State, "Addis Ababa").await;
    session.set_field(Field::Zip, "1000").await;
    let method = if express {
        ShippingMethod::Express
    } else {
        ShippingMethod::Standard
    };
    session.set_shipping_method(method).await;
}

async fn fill_payment(session: &CheckoutSession, method: PaymentMethod) {
    session.select_payment_method(method).await;
    match method {
        PaymentMethod::Telebirr => {
            session.set_field(Field::TelebirrPhone, "+251911223344").await;
        }
        PaymentMethod::BankTransfer => {
            session.set_field(Field::BankName, "Awash Bank").await;
            session.set_field(Field::AccountNumber, "123456789012").await;
        }
        PaymentMethod::Mastercard => {
            session.set_field(Field::CardNumber, "5555 4444 3333 2222").await;
            session.set_field(Field::CardHolder, "Makeda Alemu").await;
            session.set_field(Field::ExpiryDate, "09/28").await;
            session.set_field(Field::Cvv, "123").await;
        }
        PaymentMethod::CashOnDelivery => {}
    }
    session.set_agree_terms(true).await;
}

async fn advance_or_report(session: &CheckoutSession, step: &str) -> Result<(), DemoError> {
    if session.advance().await {
        return Ok(());
    }
    let errors: Vec<String> = session
        .errors()
        .await
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect();
    Err(DemoError::Incomplete(format!(
        "{step} step invalid: {}",
        errors.join(", ")
    )))
}

#[allow(clippy::print_stdout)]
async fn print_order(store: &InMemoryOrderStore, order_id: &sheger_market_core::OrderId) {
    let Ok(Some(order)) = store.get_order(order_id).await else {
        tracing::warn!(%order_id, "order missing from demo store");
        return;
    };

    println!("Order {}", order.id);
    println!("  status:  {:?}", order.status);
    println!(
        "  payment: {} ({:?}, txn {})",
        order.payment.method,
        order.payment.status,
        order
            .payment
            .transaction_id
            .as_ref()
            .map_or("-", |t| t.as_str())
    );
    for item in &order.items {
        println!("  {} x{} @ {}", item.name, item.quantity, item.price);
    }
    println!("  total:   {}", order.total);
}
