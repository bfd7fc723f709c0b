//! Simulated payment gateway.
//!
//! Models a call to an external payment processor it does not actually
//! make: each operation sleeps for a configurable latency and then
//! fabricates a result. Bank transfer and card payment always succeed;
//! mobile-money verification accepts any 6-character code. That code rule
//! is a stand-in only, and a production adapter must verify against the
//! real processor.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use sheger_market_core::{Money, PaymentStatus, TelebirrNumber, TransactionId};
use uuid::Uuid;

use super::{
    BankTransferRequest, CardPaymentRequest, GatewayError, MobileMoneyInit, PaymentGateway,
    Receipt, ReceiptDetail,
};

/// Length of a valid (simulated) mobile-money confirmation code.
const CONFIRMATION_CODE_LENGTH: usize = 6;

/// A stand-in payment processor with simulated latency.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
    decline_reason: Option<String>,
}

impl SimulatedGateway {
    /// A gateway that approves everything after `latency`.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self {
            latency,
            decline_reason: None,
        }
    }

    /// A gateway that declines every operation with `reason`, for
    /// exercising failure paths.
    #[must_use]
    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            decline_reason: Some(reason.into()),
        }
    }

    async fn simulate_processor_call(&self) -> Result<(), GatewayError> {
        tokio::time::sleep(self.latency).await;
        match &self.decline_reason {
            Some(reason) => Err(GatewayError::Declined(reason.clone())),
            None => Ok(()),
        }
    }

    fn transaction_id(prefix: &str) -> TransactionId {
        TransactionId::new(format!("{prefix}_{}", Uuid::new_v4().simple()))
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn initiate_mobile_money(
        &self,
        amount: Money,
        phone: &TelebirrNumber,
    ) -> Result<MobileMoneyInit, GatewayError> {
        self.simulate_processor_call().await?;

        let transaction_id = Self::transaction_id("tb");
        tracing::info!(%transaction_id, %amount, %phone, "simulated mobile-money initiation");

        Ok(MobileMoneyInit {
            transaction_id,
            status: PaymentStatus::Pending,
        })
    }

    async fn verify_mobile_money(
        &self,
        transaction_id: &TransactionId,
        code: &str,
    ) -> Result<Receipt, GatewayError> {
        self.simulate_processor_call().await?;

        if code.chars().count() != CONFIRMATION_CODE_LENGTH {
            tracing::warn!(%transaction_id, "simulated verification rejected code");
            return Err(GatewayError::Declined(
                "Invalid confirmation code".to_owned(),
            ));
        }

        tracing::info!(%transaction_id, "simulated mobile-money verification succeeded");
        Ok(Receipt {
            transaction_id: transaction_id.clone(),
            detail: ReceiptDetail::MobileMoney,
        })
    }

    async fn bank_transfer(&self, request: BankTransferRequest) -> Result<Receipt, GatewayError> {
        self.simulate_processor_call().await?;

        let reference = format!("SMB-{:08}", rand::rng().random_range(0..100_000_000u32));
        let transaction_id = Self::transaction_id("bt");
        tracing::info!(
            %transaction_id,
            order_id = %request.order_id,
            bank = %request.bank_name,
            %reference,
            "simulated bank transfer accepted"
        );

        Ok(Receipt {
            transaction_id,
            detail: ReceiptDetail::BankTransfer { reference },
        })
    }

    async fn card_payment(&self, request: CardPaymentRequest) -> Result<Receipt, GatewayError> {
        self.simulate_processor_call().await?;

        let transaction_id = Self::transaction_id("card");
        let last4 = request.card.last4();
        tracing::info!(
            %transaction_id,
            order_id = %request.order_id,
            last4,
            "simulated card charge accepted"
        );

        Ok(Receipt {
            transaction_id,
            detail: ReceiptDetail::Card { last4 },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use sheger_market_core::{CurrencyCode, OrderId};

    use super::*;
    use crate::form::CardDetails;

    fn amount() -> Money {
        Money::new(dec!(108.00), CurrencyCode::ETB)
    }

    #[tokio::test]
    async fn test_initiation_returns_pending() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let phone = TelebirrNumber::parse("+251912345678").unwrap();

        let init = gateway.initiate_mobile_money(amount(), &phone).await.unwrap();
        assert_eq!(init.status, PaymentStatus::Pending);
        assert!(init.transaction_id.as_str().starts_with("tb_"));
    }

    #[tokio::test]
    async fn test_verification_accepts_six_character_code() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let txn = TransactionId::new("tb_test");

        assert!(gateway.verify_mobile_money(&txn, "123456").await.is_ok());
    }

    #[tokio::test]
    async fn test_verification_rejects_other_lengths() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let txn = TransactionId::new("tb_test");

        for code in ["", "1234", "1234567"] {
            let result = gateway.verify_mobile_money(&txn, code).await;
            assert!(matches!(result, Err(GatewayError::Declined(_))), "code {code:?}");
        }
    }

    #[tokio::test]
    async fn test_bank_transfer_succeeds_with_reference() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let receipt = gateway
            .bank_transfer(BankTransferRequest {
                bank_name: "Awash Bank".to_owned(),
                account_number: "123456789012".to_owned(),
                order_id: OrderId::new("ord_1"),
                amount: amount(),
            })
            .await
            .unwrap();

        assert!(matches!(receipt.detail, ReceiptDetail::BankTransfer { .. }));
    }

    #[tokio::test]
    async fn test_card_payment_reports_last4() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let receipt = gateway
            .card_payment(CardPaymentRequest {
                card: CardDetails {
                    number: "5555 4444 3333 2222".to_owned(),
                    holder: "Abebe Bikila".to_owned(),
                    expiry: "09/27".to_owned(),
                    cvv: "123".to_owned(),
                },
                order_id: OrderId::new("ord_1"),
                amount: amount(),
            })
            .await
            .unwrap();

        match receipt.detail {
            ReceiptDetail::Card { last4 } => assert_eq!(last4, "2222"),
            other => panic!("unexpected receipt detail: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_declining_gateway_declines_everything() {
        let gateway = SimulatedGateway::declining("Insufficient funds");
        let phone = TelebirrNumber::parse("+251912345678").unwrap();

        let result = gateway.initiate_mobile_money(amount(), &phone).await;
        match result {
            Err(GatewayError::Declined(reason)) => assert_eq!(reason, "Insufficient funds"),
            other => panic!("expected decline, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let gateway = SimulatedGateway::new(Duration::from_secs(1));
        let start = tokio::time::Instant::now();
        let txn = TransactionId::new("tb_test");

        gateway.verify_mobile_money(&txn, "123456").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
