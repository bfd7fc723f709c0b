//! Per-step and per-method form validation.
//!
//! All functions here are pure: they map form fields to a set of
//! field-keyed error messages and never touch session state. The session
//! decides what to do with a non-empty result (block the step advance and
//! surface the messages).

use std::collections::BTreeMap;

use sheger_market_core::{Email, PhoneNumber, TelebirrNumber};

use crate::form::{CardDetails, CheckoutForm, Field, PaymentData};
use crate::session::CheckoutStep;

/// Banks supported for direct transfer.
pub const ETHIOPIAN_BANKS: &[&str] = &[
    "Commercial Bank of Ethiopia",
    "Dashen Bank",
    "Awash Bank",
    "Unity Bank",
    "Nebu Bank",
    "Amhara Bank",
    "Oromia International Bank",
];

/// Field-keyed validation error messages.
///
/// Empty means valid. Errors are recomputed wholesale on each advance
/// attempt and cleared per-field when the field is edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error message for a field, replacing any existing one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The message for a field, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Remove a field's error (called when the field is edited).
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    /// True when no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fold another error set into this one.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Validate the fields belonging to one checkout step.
///
/// The Review step has no fields of its own; the session re-runs the
/// Payment validation (plus [`validate_payment_data`]) on final submit.
#[must_use]
pub fn validate_step(step: CheckoutStep, form: &CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match step {
        CheckoutStep::Contact => validate_contact(form, &mut errors),
        CheckoutStep::Shipping => validate_shipping(form, &mut errors),
        CheckoutStep::Payment => validate_payment(form, &mut errors),
        CheckoutStep::Review => {}
    }

    errors
}

fn validate_contact(form: &CheckoutForm, errors: &mut ValidationErrors) {
    let contact = &form.contact;

    if contact.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if Email::parse(contact.email.trim()).is_err() {
        errors.insert(Field::Email, "Please enter a valid email address");
    }

    if contact.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required");
    }

    if contact.last_name.trim().is_empty() {
        errors.insert(Field::LastName, "Last name is required");
    }

    if contact.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone is required");
    } else if PhoneNumber::parse(&contact.phone).is_err() {
        errors.insert(Field::Phone, "Please enter a valid phone number");
    }
}

fn validate_shipping(form: &CheckoutForm, errors: &mut ValidationErrors) {
    let shipping = &form.shipping;

    if shipping.address.trim().is_empty() {
        errors.insert(Field::Address, "Address is required");
    }
    if shipping.city.trim().is_empty() {
        errors.insert(Field::City, "City is required");
    }
    if shipping.state.trim().is_empty() {
        errors.insert(Field::State, "State is required");
    }
    if shipping.zip.trim().is_empty() {
        errors.insert(Field::Zip, "ZIP code is required");
    }
    if shipping.country.trim().is_empty() {
        errors.insert(Field::Country, "Country is required");
    }
    // shipping.method is an enum; any value it holds is one of the two
    // offered methods, so there is nothing further to check here.
}

fn validate_payment(form: &CheckoutForm, errors: &mut ValidationErrors) {
    if form.payment.is_none() {
        errors.insert(Field::PaymentMethod, "Please select a payment method");
    }

    if !form.agree_terms {
        errors.insert(Field::AgreeTerms, "You must agree to the terms");
    }
}

/// Validate the method-specific payment payload.
///
/// These are the per-method checks the payment forms apply before their
/// payload is submitted.
#[must_use]
pub fn validate_payment_data(data: &PaymentData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match data {
        PaymentData::Telebirr { phone } => {
            if phone.trim().is_empty() {
                errors.insert(Field::TelebirrPhone, "Phone number is required");
            } else if TelebirrNumber::parse(phone).is_err() {
                errors.insert(
                    Field::TelebirrPhone,
                    "Please enter a valid Ethiopian phone number (e.g., +251912345678)",
                );
            }
        }
        PaymentData::BankTransfer {
            bank_name,
            account_number,
        } => {
            if bank_name.trim().is_empty() {
                errors.insert(Field::BankName, "Please select your bank");
            }
            if account_number.trim().is_empty() {
                errors.insert(Field::AccountNumber, "Account number is required");
            } else if !is_digits(account_number) || !(12..=16).contains(&account_number.len()) {
                errors.insert(
                    Field::AccountNumber,
                    "Please enter a valid account number (12-16 digits)",
                );
            }
        }
        PaymentData::Mastercard(card) => validate_card(card, &mut errors),
        PaymentData::CashOnDelivery => {}
    }

    errors
}

fn validate_card(card: &CardDetails, errors: &mut ValidationErrors) {
    let digits = card.digits();
    if digits.len() != 16 || !is_digits(&digits) {
        errors.insert(Field::CardNumber, "Invalid card number");
    }

    if card.holder.trim().is_empty() {
        errors.insert(Field::CardHolder, "Card holder name is required");
    }

    if !is_valid_expiry(&card.expiry) {
        errors.insert(Field::ExpiryDate, "Invalid expiry date (MM/YY)");
    }

    if !is_digits(&card.cvv) || !(3..=4).contains(&card.cvv.len()) {
        errors.insert(Field::Cvv, "Invalid CVV");
    }
}

/// `MM/YY` with month 01-12.
fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 || !is_digits(month) || !is_digits(year) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ContactInfo;

    fn valid_contact_form() -> CheckoutForm {
        CheckoutForm {
            contact: ContactInfo {
                email: "a@b.com".to_owned(),
                first_name: "A".to_owned(),
                last_name: "B".to_owned(),
                phone: "+251912345678".to_owned(),
            },
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_contact_step_requires_every_field() {
        let errors = validate_step(CheckoutStep::Contact, &CheckoutForm::default());
        for field in [Field::Email, Field::FirstName, Field::LastName, Field::Phone] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn test_contact_step_valid_input_passes() {
        let errors = validate_step(CheckoutStep::Contact, &valid_contact_form());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_contact_step_rejects_malformed_email() {
        let mut form = valid_contact_form();
        form.contact.email = "not-an-email".to_owned();
        let errors = validate_step(CheckoutStep::Contact, &form);
        assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_contact_step_rejects_short_phone() {
        let mut form = valid_contact_form();
        form.contact.phone = "12345".to_owned();
        let errors = validate_step(CheckoutStep::Contact, &form);
        assert!(errors.get(Field::Phone).is_some());
    }

    #[test]
    fn test_shipping_step_requires_address_fields() {
        let mut form = CheckoutForm::default();
        form.shipping.country = String::new();
        let errors = validate_step(CheckoutStep::Shipping, &form);
        for field in [Field::Address, Field::City, Field::State, Field::Zip, Field::Country] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn test_payment_step_requires_method_and_terms() {
        let errors = validate_step(CheckoutStep::Payment, &CheckoutForm::default());
        assert!(errors.get(Field::PaymentMethod).is_some());
        assert!(errors.get(Field::AgreeTerms).is_some());
    }

    #[test]
    fn test_review_step_has_no_own_fields() {
        let errors = validate_step(CheckoutStep::Review, &CheckoutForm::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_telebirr_phone_requires_country_code() {
        let valid = PaymentData::Telebirr {
            phone: "+251912345678".to_owned(),
        };
        assert!(validate_payment_data(&valid).is_empty());

        let missing_code = PaymentData::Telebirr {
            phone: "0912345678".to_owned(),
        };
        let errors = validate_payment_data(&missing_code);
        assert!(errors.get(Field::TelebirrPhone).is_some());
    }

    #[test]
    fn test_bank_account_number_length() {
        let valid = PaymentData::BankTransfer {
            bank_name: "Awash Bank".to_owned(),
            account_number: "123456789012".to_owned(),
        };
        assert!(validate_payment_data(&valid).is_empty());

        let short = PaymentData::BankTransfer {
            bank_name: "Awash Bank".to_owned(),
            account_number: "12345".to_owned(),
        };
        assert!(validate_payment_data(&short).get(Field::AccountNumber).is_some());
    }

    #[test]
    fn test_bank_name_required() {
        let data = PaymentData::BankTransfer {
            bank_name: String::new(),
            account_number: "123456789012".to_owned(),
        };
        assert_eq!(
            validate_payment_data(&data).get(Field::BankName),
            Some("Please select your bank")
        );
    }

    #[test]
    fn test_card_validation() {
        let valid = PaymentData::Mastercard(CardDetails {
            number: "5555 4444 3333 2222".to_owned(),
            holder: "Abebe Bikila".to_owned(),
            expiry: "09/27".to_owned(),
            cvv: "123".to_owned(),
        });
        assert!(validate_payment_data(&valid).is_empty());

        let bad = PaymentData::Mastercard(CardDetails {
            number: "1234".to_owned(),
            holder: String::new(),
            expiry: "13/27".to_owned(),
            cvv: "12".to_owned(),
        });
        let errors = validate_payment_data(&bad);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_expiry_month_bounds() {
        assert!(is_valid_expiry("01/30"));
        assert!(is_valid_expiry("12/30"));
        assert!(!is_valid_expiry("00/30"));
        assert!(!is_valid_expiry("13/30"));
        assert!(!is_valid_expiry("1/30"));
        assert!(!is_valid_expiry("0130"));
    }

    #[test]
    fn test_cash_on_delivery_needs_no_payload() {
        assert!(validate_payment_data(&PaymentData::CashOnDelivery).is_empty());
    }
}
