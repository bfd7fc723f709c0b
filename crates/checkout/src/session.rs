//! The checkout session state machine.
//!
//! One session per shopper per checkout. The session owns the form, the
//! current step, and the validation errors; collaborators (gateway, order
//! store, cart, navigation) are injected ports. All failures are caught
//! at this boundary and turned into field errors or a single form-level
//! message; nothing leaks to the surrounding shell.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sheger_market_core::{
    Money, OrderId, OrderStatus, PaymentMethod, ShippingMethod, TelebirrNumber, TransactionId,
};
use tokio::sync::Mutex;

use crate::cart::CartProvider;
use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use crate::form::{CheckoutForm, Field, PaymentData};
use crate::gateway::{
    BankTransferRequest, CardPaymentRequest, GatewayError, PaymentGateway, Receipt,
};
use crate::identity::{AuthenticatedUser, IdentityProvider};
use crate::models::order::{NewOrder, OrderUpdate};
use crate::navigation::{NavigationTarget, Navigator};
use crate::pricing::{self, OrderTotals};
use crate::store::{OrderStore, StoreError};
use crate::validation::{ValidationErrors, validate_payment_data, validate_step};

/// General message shown when the order store fails.
const STORE_FAILURE_MESSAGE: &str = "We could not save your order. Please try again.";

/// A checkout form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutStep {
    Contact,
    Shipping,
    Payment,
    Review,
}

impl CheckoutStep {
    /// Zero-based position of the step.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Contact => 0,
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }

    /// Heading shown for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Contact => "Contact Information",
            Self::Shipping => "Shipping",
            Self::Payment => "Payment Method",
            Self::Review => "Review Order",
        }
    }

    /// The following step; `Review` is the last.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Contact => Self::Shipping,
            Self::Shipping => Self::Payment,
            Self::Payment | Self::Review => Self::Review,
        }
    }

    /// The preceding step; `Contact` is the first.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Contact | Self::Shipping => Self::Contact,
            Self::Payment => Self::Shipping,
            Self::Review => Self::Payment,
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Walking the form steps.
    Form,
    /// Mobile money initiated; waiting for the shopper's confirmation
    /// code.
    AwaitingVerification {
        /// The pending gateway transaction.
        transaction_id: TransactionId,
    },
    /// Order confirmed; the session is finished.
    Completed,
}

/// Result of a final-submit or verification attempt.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Order persisted and payment arranged; confirmation navigation was
    /// requested.
    Confirmed {
        order_id: OrderId,
        total: Money,
        /// Absent for cash on delivery.
        transaction_id: Option<TransactionId>,
    },
    /// Mobile money initiated; call
    /// [`CheckoutSession::submit_verification`] next.
    VerificationRequired { transaction_id: TransactionId },
    /// Validation failed; errors are on the session.
    Invalid,
    /// The gateway declined or the store failed; the message is on the
    /// session.
    Failed { reason: String },
    /// Nothing happened: a submission is already in flight, the session
    /// is not at the right point, or checkout already completed.
    Ignored,
}

/// Mutable session state, guarded by the session's mutex.
struct SessionState {
    step: CheckoutStep,
    form: CheckoutForm,
    errors: ValidationErrors,
    error_message: Option<String>,
    phase: CheckoutPhase,
}

/// A shopper's checkout session.
pub struct CheckoutSession {
    user: AuthenticatedUser,
    config: CheckoutConfig,
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderStore>,
    cart: Arc<dyn CartProvider>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SessionState>,
    /// True while a gateway call is outstanding. Checked-and-set before
    /// any state is touched so a second submission is a no-op.
    processing: AtomicBool,
}

impl CheckoutSession {
    /// Start a checkout session for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAuthenticated`] when nobody is signed
    /// in and [`CheckoutError::EmptyCart`] when the cart has no items.
    pub async fn begin(
        config: CheckoutConfig,
        identity: &dyn IdentityProvider,
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderStore>,
        cart: Arc<dyn CartProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CheckoutError> {
        let user = identity
            .current_user()
            .ok_or(CheckoutError::NotAuthenticated)?;

        if cart.items().await.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        tracing::debug!(user_id = %user.id, "checkout session started");

        Ok(Self {
            user,
            config,
            gateway,
            orders,
            cart,
            navigator,
            state: Mutex::new(SessionState {
                step: CheckoutStep::Contact,
                form: CheckoutForm::default(),
                errors: ValidationErrors::new(),
                error_message: None,
                phase: CheckoutPhase::Form,
            }),
            processing: AtomicBool::new(false),
        })
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The current step.
    pub async fn step(&self) -> CheckoutStep {
        self.state.lock().await.step
    }

    /// The current lifecycle phase.
    pub async fn phase(&self) -> CheckoutPhase {
        self.state.lock().await.phase.clone()
    }

    /// Snapshot of the form as entered so far.
    pub async fn form(&self) -> CheckoutForm {
        self.state.lock().await.form.clone()
    }

    /// Current field-level validation errors.
    pub async fn errors(&self) -> ValidationErrors {
        self.state.lock().await.errors.clone()
    }

    /// Current form-level error message, if any.
    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error_message.clone()
    }

    /// True while a gateway call is outstanding.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Order summary lines for the current cart and shipping method.
    pub async fn totals(&self) -> OrderTotals {
        let subtotal = self.cart.subtotal().await;
        let method = self.state.lock().await.form.shipping.method;
        pricing::order_totals(
            subtotal,
            method,
            self.config.tax_rate,
            self.config.express_shipping_cost,
        )
    }

    // =========================================================================
    // Form editing
    // =========================================================================

    /// Set a text field and clear its pending validation error.
    ///
    /// Non-text fields (shipping method, payment method, terms checkbox)
    /// have dedicated setters and are ignored here.
    pub async fn set_field(&self, field: Field, value: &str) {
        let mut state = self.state.lock().await;
        let form = &mut state.form;

        match field {
            Field::Email => form.contact.email = value.to_owned(),
            Field::FirstName => form.contact.first_name = value.to_owned(),
            Field::LastName => form.contact.last_name = value.to_owned(),
            Field::Phone => form.contact.phone = value.to_owned(),
            Field::Address => form.shipping.address = value.to_owned(),
            Field::Apartment => {
                form.shipping.apartment = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_owned())
                };
            }
            Field::City => form.shipping.city = value.to_owned(),
            Field::State => form.shipping.state = value.to_owned(),
            Field::Zip => form.shipping.zip = value.to_owned(),
            Field::Country => form.shipping.country = value.to_owned(),
            Field::TelebirrPhone => {
                if let Some(PaymentData::Telebirr { phone }) = &mut form.payment {
                    *phone = value.to_owned();
                }
            }
            Field::BankName => {
                if let Some(PaymentData::BankTransfer { bank_name, .. }) = &mut form.payment {
                    *bank_name = value.to_owned();
                }
            }
            Field::AccountNumber => {
                if let Some(PaymentData::BankTransfer { account_number, .. }) = &mut form.payment {
                    *account_number = value.to_owned();
                }
            }
            Field::CardNumber => {
                if let Some(PaymentData::Mastercard(card)) = &mut form.payment {
                    card.number = value.to_owned();
                }
            }
            Field::CardHolder => {
                if let Some(PaymentData::Mastercard(card)) = &mut form.payment {
                    card.holder = value.to_owned();
                }
            }
            Field::ExpiryDate => {
                if let Some(PaymentData::Mastercard(card)) = &mut form.payment {
                    card.expiry = value.to_owned();
                }
            }
            Field::Cvv => {
                if let Some(PaymentData::Mastercard(card)) = &mut form.payment {
                    card.cvv = value.to_owned();
                }
            }
            Field::ShippingMethod
            | Field::PaymentMethod
            | Field::AgreeTerms
            | Field::VerificationCode => {
                tracing::debug!(%field, "set_field ignored non-text field");
            }
        }

        state.errors.clear(field);
    }

    /// Choose a shipping method.
    pub async fn set_shipping_method(&self, method: ShippingMethod) {
        let mut state = self.state.lock().await;
        state.form.shipping.method = method;
        state.errors.clear(Field::ShippingMethod);
    }

    /// Set the terms-of-service agreement checkbox.
    pub async fn set_agree_terms(&self, agreed: bool) {
        let mut state = self.state.lock().await;
        state.form.agree_terms = agreed;
        state.errors.clear(Field::AgreeTerms);
    }

    /// Select a payment method.
    ///
    /// Resets the payment payload to the empty shape for `method`, so
    /// details entered for a previously selected method are dropped
    /// rather than submitted.
    pub async fn select_payment_method(&self, method: PaymentMethod) {
        let mut state = self.state.lock().await;
        state.form.payment = Some(PaymentData::empty_for(method));
        for field in [
            Field::PaymentMethod,
            Field::TelebirrPhone,
            Field::BankName,
            Field::AccountNumber,
            Field::CardNumber,
            Field::CardHolder,
            Field::ExpiryDate,
            Field::Cvv,
        ] {
            state.errors.clear(field);
        }
        tracing::debug!(%method, "payment method selected");
    }

    // =========================================================================
    // Step transitions
    // =========================================================================

    /// Validate the current step and move forward on success.
    ///
    /// Returns `true` if the step advanced. On validation failure the
    /// step is unchanged and the errors are on the session.
    pub async fn advance(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.phase != CheckoutPhase::Form {
            return false;
        }

        let errors = validate_step(state.step, &state.form);
        if errors.is_empty() {
            let from = state.step;
            state.step = from.next();
            state.errors = ValidationErrors::new();
            tracing::debug!(from = from.index(), to = state.step.index(), "step advanced");
            true
        } else {
            tracing::debug!(step = state.step.index(), count = errors.len(), "step blocked");
            state.errors = errors;
            false
        }
    }

    /// Move back one step. No validation; a no-op on the first step.
    pub async fn back(&self) {
        let mut state = self.state.lock().await;
        if state.phase == CheckoutPhase::Form {
            state.step = state.step.prev();
        }
    }

    // =========================================================================
    // Final submission
    // =========================================================================

    /// Submit the order from the Review step.
    ///
    /// Re-validates the Payment step and the method payload, then creates
    /// and finalizes the order through the gateway. For mobile money this
    /// initiates the payment and parks the session in
    /// [`CheckoutPhase::AwaitingVerification`] instead.
    ///
    /// While a submission is in flight ([`Self::is_processing`]), further
    /// calls return [`SubmitOutcome::Ignored`] without creating anything.
    pub async fn submit_final(&self) -> SubmitOutcome {
        if self.processing.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission already in flight; ignored");
            return SubmitOutcome::Ignored;
        }

        let outcome = self.submit_final_inner().await;
        self.processing.store(false, Ordering::SeqCst);
        outcome
    }

    async fn submit_final_inner(&self) -> SubmitOutcome {
        let mut state = self.state.lock().await;

        if state.phase != CheckoutPhase::Form || state.step != CheckoutStep::Review {
            return SubmitOutcome::Ignored;
        }
        state.error_message = None;

        // Re-validate the payment step plus the method payload.
        let mut errors = validate_step(CheckoutStep::Payment, &state.form);
        if let Some(payment) = &state.form.payment {
            errors.merge(validate_payment_data(payment));
        }
        if !errors.is_empty() {
            state.errors = errors;
            return SubmitOutcome::Invalid;
        }

        let Some(payment) = state.form.payment.clone() else {
            // Unreachable after validation, but never panic at this boundary.
            state
                .errors
                .insert(Field::PaymentMethod, "Please select a payment method");
            return SubmitOutcome::Invalid;
        };

        let total = self.grand_total(state.form.shipping.method).await;

        match payment {
            PaymentData::Telebirr { phone } => {
                self.initiate_mobile_money(&mut state, &phone, total).await
            }
            PaymentData::BankTransfer {
                bank_name,
                account_number,
            } => {
                self.pay_for_new_order(&mut state, total, PaymentMethod::BankTransfer, |order_id| {
                    let request = BankTransferRequest {
                        bank_name,
                        account_number,
                        order_id,
                        amount: total,
                    };
                    let gateway = Arc::clone(&self.gateway);
                    async move { gateway.bank_transfer(request).await }
                })
                .await
            }
            PaymentData::Mastercard(card) => {
                self.pay_for_new_order(&mut state, total, PaymentMethod::Mastercard, |order_id| {
                    let request = CardPaymentRequest {
                        card,
                        order_id,
                        amount: total,
                    };
                    let gateway = Arc::clone(&self.gateway);
                    async move { gateway.card_payment(request).await }
                })
                .await
            }
            PaymentData::CashOnDelivery => self.submit_cash_on_delivery(&mut state, total).await,
        }
    }

    /// Confirm a pending mobile-money payment with the shopper's code.
    ///
    /// Only meaningful in [`CheckoutPhase::AwaitingVerification`]. On
    /// success the order is created and finalized; on failure the session
    /// stays awaiting verification with an error.
    pub async fn submit_verification(&self, code: &str) -> SubmitOutcome {
        if self.processing.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission already in flight; ignored");
            return SubmitOutcome::Ignored;
        }

        let outcome = self.submit_verification_inner(code).await;
        self.processing.store(false, Ordering::SeqCst);
        outcome
    }

    async fn submit_verification_inner(&self, code: &str) -> SubmitOutcome {
        let mut state = self.state.lock().await;

        let CheckoutPhase::AwaitingVerification { transaction_id } = state.phase.clone() else {
            return SubmitOutcome::Ignored;
        };
        state.error_message = None;

        if code.trim().is_empty() {
            state
                .errors
                .insert(Field::VerificationCode, "Confirmation code is required");
            return SubmitOutcome::Invalid;
        }

        match self.gateway.verify_mobile_money(&transaction_id, code).await {
            Ok(receipt) => {
                let total = self.grand_total(state.form.shipping.method).await;
                self.persist_and_confirm(
                    &mut state,
                    total,
                    PaymentMethod::Telebirr,
                    &receipt,
                    OrderStatus::Paid,
                )
                .await
            }
            Err(err) => {
                // Stay awaiting verification; the shopper can try again.
                tracing::warn!(%transaction_id, error = %err, "mobile-money verification failed");
                let reason = user_message(&err);
                state.error_message = Some(reason.clone());
                SubmitOutcome::Failed { reason }
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn grand_total(&self, method: ShippingMethod) -> Money {
        let subtotal = self.cart.subtotal().await;
        let totals = pricing::order_totals(
            subtotal,
            method,
            self.config.tax_rate,
            self.config.express_shipping_cost,
        );
        Money::new(totals.grand_total, self.config.currency)
    }

    async fn draft_order(&self, state: &SessionState, total: Money, method: PaymentMethod) -> NewOrder {
        let items = self.cart.items().await.into_iter().map(Into::into).collect();
        NewOrder {
            user_id: self.user.id.clone(),
            items,
            total,
            shipping_address: state.form.shipping.clone(),
            payment_method: method,
        }
    }

    async fn initiate_mobile_money(
        &self,
        state: &mut SessionState,
        phone: &str,
        total: Money,
    ) -> SubmitOutcome {
        let number = match TelebirrNumber::parse(phone) {
            Ok(number) => number,
            Err(err) => {
                state.errors.insert(Field::TelebirrPhone, err.to_string());
                return SubmitOutcome::Invalid;
            }
        };

        match self.gateway.initiate_mobile_money(total, &number).await {
            Ok(init) => {
                tracing::info!(transaction_id = %init.transaction_id, "awaiting mobile-money verification");
                state.phase = CheckoutPhase::AwaitingVerification {
                    transaction_id: init.transaction_id.clone(),
                };
                SubmitOutcome::VerificationRequired {
                    transaction_id: init.transaction_id,
                }
            }
            Err(err) => self.payment_failed(state, &err),
        }
    }

    /// Create the order, then run the gateway call that needs its id.
    ///
    /// Order creation happens-before the gateway dispatch; the completion
    /// update happens-after the gateway result is known.
    async fn pay_for_new_order<F, Fut>(
        &self,
        state: &mut SessionState,
        total: Money,
        method: PaymentMethod,
        dispatch: F,
    ) -> SubmitOutcome
    where
        F: FnOnce(OrderId) -> Fut,
        Fut: Future<Output = Result<Receipt, GatewayError>>,
    {
        let draft = self.draft_order(state, total, method).await;
        let order_id = match self.orders.create_order(draft).await {
            Ok(id) => id,
            Err(err) => return self.store_failed(state, &err),
        };

        match dispatch(order_id.clone()).await {
            Ok(receipt) => {
                let final_status = match method {
                    // A transfer is arranged but not yet settled.
                    PaymentMethod::BankTransfer => OrderStatus::Processing,
                    _ => OrderStatus::Paid,
                };
                self.confirm_order(state, order_id, total, &receipt, final_status)
                    .await
            }
            Err(err) => {
                // The order stays pending; the cart is untouched.
                self.payment_failed(state, &err)
            }
        }
    }

    async fn submit_cash_on_delivery(
        &self,
        state: &mut SessionState,
        total: Money,
    ) -> SubmitOutcome {
        let draft = self
            .draft_order(state, total, PaymentMethod::CashOnDelivery)
            .await;
        let order_id = match self.orders.create_order(draft).await {
            Ok(id) => id,
            Err(err) => return self.store_failed(state, &err),
        };

        // Payment stays pending until the courier collects; the order
        // itself moves to fulfillment.
        let update = OrderUpdate {
            status: Some(OrderStatus::Processing),
            ..OrderUpdate::default()
        };
        if let Err(err) = self.orders.update_order(&order_id, update).await {
            return self.store_failed(state, &err);
        }

        self.cart.clear().await;
        state.phase = CheckoutPhase::Completed;
        tracing::info!(%order_id, "cash-on-delivery order placed");

        self.navigator.navigate(NavigationTarget::OrderConfirmation {
            order_id: order_id.clone(),
            total,
            transaction_id: None,
        });

        SubmitOutcome::Confirmed {
            order_id,
            total,
            transaction_id: None,
        }
    }

    /// Persist a fresh order and immediately confirm it (mobile money,
    /// where the payment is verified before the order exists).
    async fn persist_and_confirm(
        &self,
        state: &mut SessionState,
        total: Money,
        method: PaymentMethod,
        receipt: &Receipt,
        final_status: OrderStatus,
    ) -> SubmitOutcome {
        let draft = self.draft_order(state, total, method).await;
        let order_id = match self.orders.create_order(draft).await {
            Ok(id) => id,
            Err(err) => return self.store_failed(state, &err),
        };
        self.confirm_order(state, order_id, total, receipt, final_status)
            .await
    }

    /// Record the confirmed payment on the order, clear the cart, and
    /// request confirmation navigation.
    async fn confirm_order(
        &self,
        state: &mut SessionState,
        order_id: OrderId,
        total: Money,
        receipt: &Receipt,
        final_status: OrderStatus,
    ) -> SubmitOutcome {
        let update =
            OrderUpdate::payment_confirmed(final_status, receipt.transaction_id.clone());
        if let Err(err) = self.orders.update_order(&order_id, update).await {
            // Payment went through but we could not record it; do not
            // clear the cart or navigate as if the order were confirmed.
            return self.store_failed(state, &err);
        }

        self.cart.clear().await;
        state.phase = CheckoutPhase::Completed;
        tracing::info!(%order_id, transaction_id = %receipt.transaction_id, "order confirmed");

        self.navigator.navigate(NavigationTarget::OrderConfirmation {
            order_id: order_id.clone(),
            total,
            transaction_id: Some(receipt.transaction_id.clone()),
        });

        SubmitOutcome::Confirmed {
            order_id,
            total,
            transaction_id: Some(receipt.transaction_id.clone()),
        }
    }

    fn payment_failed(&self, state: &mut SessionState, err: &GatewayError) -> SubmitOutcome {
        tracing::warn!(error = %err, "payment failed");
        let reason = user_message(err);
        state.error_message = Some(reason.clone());

        self.navigator.navigate(NavigationTarget::PaymentFailed {
            reason: reason.clone(),
            retry_from: CheckoutStep::Review,
        });

        SubmitOutcome::Failed { reason }
    }

    fn store_failed(&self, state: &mut SessionState, err: &StoreError) -> SubmitOutcome {
        tracing::error!(error = %err, "order store failure during checkout");
        state.error_message = Some(STORE_FAILURE_MESSAGE.to_owned());
        SubmitOutcome::Failed {
            reason: STORE_FAILURE_MESSAGE.to_owned(),
        }
    }
}

/// The message shown to the shopper for a gateway error.
fn user_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Declined(reason) => reason.clone(),
        GatewayError::Unavailable(_) => {
            "Payment could not be processed. Please try again.".to_owned()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;
    use sheger_market_core::{Email, ProductId, UserId};

    use super::*;
    use crate::cart::{CartItem, InMemoryCart};
    use crate::gateway::SimulatedGateway;
    use crate::identity::StaticIdentity;
    use crate::navigation::RecordingNavigator;
    use crate::store::InMemoryOrderStore;

    fn shopper() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new("usr_1"),
            email: Email::parse("abebe@example.com").unwrap(),
        }
    }

    fn cart_with_coffee() -> InMemoryCart {
        InMemoryCart::with_items(vec![CartItem {
            id: ProductId::new("prod_coffee"),
            name: "Yirgacheffe Coffee".to_owned(),
            price: dec!(50.00),
            quantity: 2,
        }])
    }

    struct Harness {
        session: CheckoutSession,
        store: InMemoryOrderStore,
        cart: InMemoryCart,
        navigator: Arc<RecordingNavigator>,
    }

    async fn harness(gateway: SimulatedGateway) -> Harness {
        let store = InMemoryOrderStore::new();
        let cart = cart_with_coffee();
        let navigator = Arc::new(RecordingNavigator::new());

        let session = CheckoutSession::begin(
            CheckoutConfig::default(),
            &StaticIdentity::signed_in(shopper()),
            Arc::new(gateway),
            Arc::new(store.clone()),
            Arc::new(cart.clone()),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )
        .await
        .unwrap();

        Harness {
            session,
            store,
            cart,
            navigator,
        }
    }

    async fn fill_to_review(session: &CheckoutSession) {
        session.set_field(Field::Email, "a@b.com").await;
        session.set_field(Field::FirstName, "A").await;
        session.set_field(Field::LastName, "B").await;
        session.set_field(Field::Phone, "+251912345678").await;
        assert!(session.advance().await);

        session.set_field(Field::Address, "Bole Road").await;
        session.set_field(Field::City, "Addis Ababa").await;
        session.set_field(Field::State, "Addis Ababa").await;
        session.set_field(Field::Zip, "1000").await;
        assert!(session.advance().await);

        session
            .select_payment_method(PaymentMethod::BankTransfer)
            .await;
        session.set_field(Field::BankName, "Awash Bank").await;
        session.set_field(Field::AccountNumber, "123456789012").await;
        session.set_agree_terms(true).await;
        assert!(session.advance().await);

        assert_eq!(session.step().await, CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_begin_requires_authenticated_user() {
        let result = CheckoutSession::begin(
            CheckoutConfig::default(),
            &StaticIdentity::anonymous(),
            Arc::new(SimulatedGateway::new(Duration::ZERO)),
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(cart_with_coffee()),
            Arc::new(RecordingNavigator::new()),
        )
        .await;
        assert!(matches!(result, Err(CheckoutError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_begin_requires_non_empty_cart() {
        let result = CheckoutSession::begin(
            CheckoutConfig::default(),
            &StaticIdentity::signed_in(shopper()),
            Arc::new(SimulatedGateway::new(Duration::ZERO)),
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryCart::new()),
            Arc::new(RecordingNavigator::new()),
        )
        .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_advance_blocked_until_step_is_valid() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;

        assert!(!h.session.advance().await);
        assert_eq!(h.session.step().await, CheckoutStep::Contact);
        assert!(!h.session.errors().await.is_empty());
    }

    #[tokio::test]
    async fn test_editing_a_field_clears_its_error() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;

        h.session.advance().await;
        assert!(h.session.errors().await.get(Field::Email).is_some());

        h.session.set_field(Field::Email, "a@b.com").await;
        let errors = h.session.errors().await;
        assert!(errors.get(Field::Email).is_none());
        // Untouched fields keep their errors until the next advance
        assert!(errors.get(Field::FirstName).is_some());
    }

    #[tokio::test]
    async fn test_back_stops_at_first_step() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;

        h.session.back().await;
        assert_eq!(h.session.step().await, CheckoutStep::Contact);
    }

    #[tokio::test]
    async fn test_advance_caps_at_review() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;
        fill_to_review(&h.session).await;

        assert!(h.session.advance().await);
        assert_eq!(h.session.step().await, CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_switching_method_drops_stale_payload() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;

        h.session
            .select_payment_method(PaymentMethod::BankTransfer)
            .await;
        h.session.set_field(Field::AccountNumber, "123456789012").await;

        h.session.select_payment_method(PaymentMethod::Telebirr).await;
        let form = h.session.form().await;
        assert_eq!(
            form.payment,
            Some(PaymentData::Telebirr {
                phone: String::new()
            })
        );
    }

    #[tokio::test]
    async fn test_submit_ignored_before_review() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;

        let outcome = h.session.submit_final().await;
        assert!(matches!(outcome, SubmitOutcome::Ignored));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_creates_exactly_one_order() {
        let h = harness(SimulatedGateway::new(Duration::from_secs(1))).await;
        fill_to_review(&h.session).await;

        let (first, second) = tokio::join!(h.session.submit_final(), h.session.submit_final());

        let outcomes = [&first, &second];
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, SubmitOutcome::Confirmed { .. }))
                .count(),
            1
        );
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, SubmitOutcome::Ignored))
                .count(),
            1
        );
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_submit_after_completion_is_ignored() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;
        fill_to_review(&h.session).await;

        assert!(matches!(
            h.session.submit_final().await,
            SubmitOutcome::Confirmed { .. }
        ));
        assert!(h.cart.is_empty().await);

        assert!(matches!(h.session.submit_final().await, SubmitOutcome::Ignored));
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_submit_revalidates_payment_step() {
        let h = harness(SimulatedGateway::new(Duration::ZERO)).await;
        fill_to_review(&h.session).await;

        // Withdraw consent after reaching Review
        h.session.set_agree_terms(false).await;

        let outcome = h.session.submit_final().await;
        assert!(matches!(outcome, SubmitOutcome::Invalid));
        assert!(h.session.errors().await.get(Field::AgreeTerms).is_some());
        assert!(h.store.is_empty().await);
        assert!(h.navigator.requests().is_empty());
    }
}
