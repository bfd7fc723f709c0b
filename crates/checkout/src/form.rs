//! Checkout form data.
//!
//! The form is owned by the checkout session for the lifetime of checkout.
//! Payment details are an enum keyed by method, so a payload can never
//! outlive the method it was entered for: selecting a different method
//! swaps in that method's empty variant.

use serde::{Deserialize, Serialize};
use sheger_market_core::{PaymentMethod, ShippingMethod};

/// All data collected across the checkout steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Contact step fields.
    pub contact: ContactInfo,
    /// Shipping step fields.
    pub shipping: ShippingAddress,
    /// Payment payload for the selected method; `None` until a method is
    /// chosen.
    pub payment: Option<PaymentData>,
    /// Terms-of-service agreement checkbox.
    pub agree_terms: bool,
}

impl CheckoutForm {
    /// The currently selected payment method, if any.
    #[must_use]
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment.as_ref().map(PaymentData::method)
    }
}

/// Contact information (step 1). Raw input; validated on advance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Shipping address and method (step 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    /// Apartment, suite, etc. Optional.
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub method: ShippingMethod,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            address: String::new(),
            apartment: None,
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: "Ethiopia".to_owned(),
            method: ShippingMethod::Standard,
        }
    }
}

/// Method-specific payment payload.
///
/// The variant is the selected method, which keeps the payload shape and
/// the method in lockstep by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentData {
    /// Telebirr mobile money: the wallet phone number.
    Telebirr { phone: String },
    /// Bank transfer: bank and account number.
    BankTransfer {
        bank_name: String,
        account_number: String,
    },
    /// Card payment.
    Mastercard(CardDetails),
    /// Cash on delivery carries no payload.
    CashOnDelivery,
}

impl PaymentData {
    /// The empty payload shape for a method.
    #[must_use]
    pub fn empty_for(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Telebirr => Self::Telebirr {
                phone: String::new(),
            },
            PaymentMethod::BankTransfer => Self::BankTransfer {
                bank_name: String::new(),
                account_number: String::new(),
            },
            PaymentMethod::Mastercard => Self::Mastercard(CardDetails::default()),
            PaymentMethod::CashOnDelivery => Self::CashOnDelivery,
        }
    }

    /// The method this payload belongs to.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Telebirr { .. } => PaymentMethod::Telebirr,
            Self::BankTransfer { .. } => PaymentMethod::BankTransfer,
            Self::Mastercard(_) => PaymentMethod::Mastercard,
            Self::CashOnDelivery => PaymentMethod::CashOnDelivery,
        }
    }
}

/// Card fields as entered. The number may contain grouping spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    /// Expiry in `MM/YY` form.
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// The card number with grouping spaces removed.
    #[must_use]
    pub fn digits(&self) -> String {
        self.number.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Last four digits of the card number.
    #[must_use]
    pub fn last4(&self) -> String {
        let digits = self.digits();
        let skip = digits.len().saturating_sub(4);
        digits.chars().skip(skip).collect()
    }
}

/// A form field, used as the key in validation error maps.
///
/// `as_str` yields the wire names used by the storefront forms
/// (camelCase for checkout fields, snake_case for the bank transfer form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Email,
    FirstName,
    LastName,
    Phone,
    Address,
    Apartment,
    City,
    State,
    Zip,
    Country,
    ShippingMethod,
    PaymentMethod,
    AgreeTerms,
    TelebirrPhone,
    BankName,
    AccountNumber,
    CardNumber,
    CardHolder,
    ExpiryDate,
    Cvv,
    VerificationCode,
}

impl Field {
    /// The field's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Apartment => "apartment",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::Country => "country",
            Self::ShippingMethod => "shippingMethod",
            Self::PaymentMethod => "paymentMethod",
            Self::AgreeTerms => "agreeTerms",
            Self::TelebirrPhone => "telebirrPhone",
            Self::BankName => "bank_name",
            Self::AccountNumber => "account_number",
            Self::CardNumber => "cardNumber",
            Self::CardHolder => "cardHolder",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::VerificationCode => "verificationCode",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_for_matches_method() {
        for method in [
            PaymentMethod::Telebirr,
            PaymentMethod::BankTransfer,
            PaymentMethod::Mastercard,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(PaymentData::empty_for(method).method(), method);
        }
    }

    #[test]
    fn test_card_digits_strips_spaces() {
        let card = CardDetails {
            number: "1234 5678 9012 3456".to_owned(),
            ..CardDetails::default()
        };
        assert_eq!(card.digits(), "1234567890123456");
        assert_eq!(card.last4(), "3456");
    }

    #[test]
    fn test_default_form_has_no_payment() {
        let form = CheckoutForm::default();
        assert!(form.payment_method().is_none());
        assert!(!form.agree_terms);
    }
}
