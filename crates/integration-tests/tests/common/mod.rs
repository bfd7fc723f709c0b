//! Shared scaffolding for checkout integration tests.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal_macros::dec;

use sheger_market_checkout::{
    AuthenticatedUser, CartItem, CheckoutConfig, CheckoutSession, Field, InMemoryCart,
    InMemoryOrderStore, Navigator, OrderStore, PaymentGateway, RecordingNavigator, StaticIdentity,
};
use sheger_market_core::{Email, PaymentMethod, ProductId, UserId};

/// A checkout session wired to in-memory collaborators.
pub struct Checkout {
    pub session: CheckoutSession,
    pub store: InMemoryOrderStore,
    pub cart: InMemoryCart,
    pub navigator: Arc<RecordingNavigator>,
}

/// The signed-in shopper used across the tests.
pub fn shopper() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new("usr_tester"),
        email: Email::parse("tester@example.com").expect("valid test email"),
    }
}

/// A cart whose subtotal is exactly 100.00.
pub fn hundred_birr_cart() -> InMemoryCart {
    InMemoryCart::with_items(vec![
        CartItem {
            id: ProductId::new("prod_coffee"),
            name: "Yirgacheffe Coffee".to_owned(),
            price: dec!(40.00),
            quantity: 2,
        },
        CartItem {
            id: ProductId::new("prod_honey"),
            name: "Forest Honey".to_owned(),
            price: dec!(20.00),
            quantity: 1,
        },
    ])
}

/// Start a session against `gateway` with the default config and a
/// 100.00 cart, persisting to a fresh in-memory store.
pub async fn start(gateway: impl PaymentGateway + 'static) -> Checkout {
    let store = InMemoryOrderStore::new();
    let cart = hundred_birr_cart();
    let navigator = Arc::new(RecordingNavigator::new());

    let session = begin_session(
        Arc::new(gateway),
        Arc::new(store.clone()),
        cart.clone(),
        Arc::clone(&navigator),
    )
    .await;

    Checkout {
        session,
        store,
        cart,
        navigator,
    }
}

/// Wire a session by hand; used when a test needs its own store double.
pub async fn begin_session(
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn OrderStore>,
    cart: InMemoryCart,
    navigator: Arc<RecordingNavigator>,
) -> CheckoutSession {
    CheckoutSession::begin(
        CheckoutConfig::default(),
        &StaticIdentity::signed_in(shopper()),
        gateway,
        store,
        Arc::new(cart),
        navigator as Arc<dyn Navigator>,
    )
    .await
    .expect("session should start")
}

/// Fill the contact and shipping steps and advance to the payment step.
pub async fn fill_to_payment(session: &CheckoutSession) {
    session.set_field(Field::Email, "a@b.com").await;
    session.set_field(Field::FirstName, "A").await;
    session.set_field(Field::LastName, "B").await;
    session.set_field(Field::Phone, "+251912345678").await;
    assert!(session.advance().await, "contact step should validate");

    session.set_field(Field::Address, "Bole Road 22").await;
    session.set_field(Field::City, "Addis Ababa").await;
    session.set_field(Field::State, "Addis Ababa").await;
    session.set_field(Field::Zip, "1000").await;
    assert!(session.advance().await, "shipping step should validate");
}

/// Fill everything through the payment step for `method` and land on
/// Review.
pub async fn fill_to_review(session: &CheckoutSession, method: PaymentMethod) {
    fill_to_payment(session).await;

    session.select_payment_method(method).await;
    match method {
        PaymentMethod::Telebirr => {
            session.set_field(Field::TelebirrPhone, "+251912345678").await;
        }
        PaymentMethod::BankTransfer => {
            session.set_field(Field::BankName, "Awash Bank").await;
            session.set_field(Field::AccountNumber, "123456789012").await;
        }
        PaymentMethod::Mastercard => {
            session.set_field(Field::CardNumber, "5555 4444 3333 2222").await;
            session.set_field(Field::CardHolder, "A Tester").await;
            session.set_field(Field::ExpiryDate, "09/28").await;
            session.set_field(Field::Cvv, "123").await;
        }
        PaymentMethod::CashOnDelivery => {}
    }
    session.set_agree_terms(true).await;
    assert!(session.advance().await, "payment step should validate");
}
