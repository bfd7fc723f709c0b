//! Status and method enums for checkout entities.

use serde::{Deserialize, Serialize};

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Telebirr mobile money (two-phase: initiate, then verify).
    #[default]
    Telebirr,
    /// Direct bank transfer.
    BankTransfer,
    /// Card payment.
    Mastercard,
    /// Pay with cash when the order arrives.
    CashOnDelivery,
}

impl PaymentMethod {
    /// Human-readable label, as shown on the payment step.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Telebirr => "Telebirr Payment",
            Self::BankTransfer => "Bank Transfer",
            Self::Mastercard => "Mastercard",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Telebirr => write!(f, "telebirr"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::Mastercard => write!(f, "mastercard"),
            Self::CashOnDelivery => write!(f, "cash_on_delivery"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telebirr" => Ok(Self::Telebirr),
            "bank_transfer" => Ok(Self::BankTransfer),
            "mastercard" => Ok(Self::Mastercard),
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Status of the payment attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment not yet confirmed by the processor.
    #[default]
    Pending,
    /// Payment confirmed.
    Completed,
    /// Payment attempted and declined.
    Failed,
}

/// Overall order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created; payment outcome not yet known.
    #[default]
    Pending,
    /// Payment arranged; order moving to fulfillment.
    Processing,
    /// Funds captured.
    Paid,
}

/// Shipping method offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Free, 3-5 business days.
    #[default]
    Standard,
    /// Paid, 1-2 business days.
    Express,
}

impl ShippingMethod {
    /// Delivery window shown beside the method.
    #[must_use]
    pub const fn delivery_estimate(self) -> &'static str {
        match self {
            Self::Standard => "3-5 business days",
            Self::Express => "1-2 business days",
        }
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Express => write!(f, "express"),
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [
            PaymentMethod::Telebirr,
            PaymentMethod::BankTransfer,
            PaymentMethod::Mastercard,
            PaymentMethod::CashOnDelivery,
        ] {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_payment_method_serde_names() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
    }

    #[test]
    fn test_payment_status_serde_names() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_shipping_method_parse_rejects_unknown() {
        assert!("overnight".parse::<ShippingMethod>().is_err());
    }
}
