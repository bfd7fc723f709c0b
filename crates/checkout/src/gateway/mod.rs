//! Payment gateway port.
//!
//! One operation per payment method; mobile money is two-phase (initiate,
//! then verify with the code sent to the shopper's wallet). The checkout
//! session depends only on the [`PaymentGateway`] trait; the shipped
//! [`SimulatedGateway`] stands in for a real processor, and production
//! wires an adapter that talks to the actual gateway.

mod simulated;

pub use simulated::SimulatedGateway;

use async_trait::async_trait;
use sheger_market_core::{Money, OrderId, PaymentStatus, TelebirrNumber, TransactionId};

use crate::form::CardDetails;

/// Errors from a payment gateway operation.
///
/// `Declined` is the recoverable "the processor said no" outcome the
/// session surfaces to the shopper; it is never a crash.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The processor rejected the payment or verification.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The processor could not be reached or returned garbage.
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

/// Result of initiating a mobile-money payment.
///
/// The transaction is pending until the shopper confirms it with the code
/// pushed to their wallet.
#[derive(Debug, Clone)]
pub struct MobileMoneyInit {
    pub transaction_id: TransactionId,
    pub status: PaymentStatus,
}

/// A bank transfer dispatch. The processor needs the order identifier to
/// reference the transfer, so the order exists before this is sent.
#[derive(Debug, Clone)]
pub struct BankTransferRequest {
    pub bank_name: String,
    pub account_number: String,
    pub order_id: OrderId,
    pub amount: Money,
}

/// A card payment dispatch.
#[derive(Debug, Clone)]
pub struct CardPaymentRequest {
    pub card: CardDetails,
    pub order_id: OrderId,
    pub amount: Money,
}

/// A confirmed payment.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub detail: ReceiptDetail,
}

/// Method-specific receipt data.
#[derive(Debug, Clone)]
pub enum ReceiptDetail {
    /// Mobile money confirmed; nothing beyond the transaction id.
    MobileMoney,
    /// Bank transfer accepted; the processor's transfer reference.
    BankTransfer { reference: String },
    /// Card charged; last four digits for the confirmation view.
    Card { last4: String },
}

/// The payment processor behind checkout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a mobile-money payment against the shopper's wallet.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] if the wallet rejects the
    /// request, [`GatewayError::Unavailable`] if the processor cannot be
    /// reached.
    async fn initiate_mobile_money(
        &self,
        amount: Money,
        phone: &TelebirrNumber,
    ) -> Result<MobileMoneyInit, GatewayError>;

    /// Confirm a pending mobile-money payment with the shopper's code.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] for a wrong or expired code.
    async fn verify_mobile_money(
        &self,
        transaction_id: &TransactionId,
        code: &str,
    ) -> Result<Receipt, GatewayError>;

    /// Execute a bank transfer for an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] if the transfer is rejected.
    async fn bank_transfer(&self, request: BankTransferRequest) -> Result<Receipt, GatewayError>;

    /// Charge a card for an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] if the charge is rejected.
    async fn card_payment(&self, request: CardPaymentRequest) -> Result<Receipt, GatewayError>;
}
