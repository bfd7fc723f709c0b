//! Order total arithmetic.
//!
//! All amounts are [`Decimal`]; the grand total is
//! `subtotal + shipping + subtotal * tax_rate`, matching the order summary
//! shown beside the checkout form.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sheger_market_core::ShippingMethod;

/// Default sales tax rate applied to the cart subtotal.
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.08);

/// Default cost of express shipping. Standard shipping is free.
pub const DEFAULT_EXPRESS_SHIPPING_COST: Decimal = dec!(9.99);

/// The line amounts of an order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of item price x quantity across the cart.
    pub subtotal: Decimal,
    /// Shipping cost for the chosen method.
    pub shipping: Decimal,
    /// Tax on the subtotal.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub grand_total: Decimal,
}

/// Shipping cost for a method, given the configured express cost.
#[must_use]
pub fn shipping_cost(method: ShippingMethod, express_cost: Decimal) -> Decimal {
    match method {
        ShippingMethod::Standard => Decimal::ZERO,
        ShippingMethod::Express => express_cost,
    }
}

/// Compute the order summary lines from the cart subtotal.
#[must_use]
pub fn order_totals(
    subtotal: Decimal,
    method: ShippingMethod,
    tax_rate: Decimal,
    express_cost: Decimal,
) -> OrderTotals {
    let shipping = shipping_cost(method, express_cost);
    let tax = subtotal * tax_rate;
    OrderTotals {
        subtotal,
        shipping,
        tax,
        grand_total: subtotal + shipping + tax,
    }
}
