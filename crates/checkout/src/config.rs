//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CHECKOUT_TAX_RATE` - Sales tax rate as a decimal fraction (default: 0.08)
//! - `CHECKOUT_EXPRESS_SHIPPING_COST` - Express shipping cost (default: 9.99)
//! - `CHECKOUT_CURRENCY` - ISO 4217 currency code (default: ETB)
//! - `CHECKOUT_GATEWAY_LATENCY_MS` - Simulated gateway latency in
//!   milliseconds (default: 1000)

use std::time::Duration;

use rust_decimal::Decimal;
use sheger_market_core::CurrencyCode;
use thiserror::Error;

use crate::pricing::{DEFAULT_EXPRESS_SHIPPING_COST, DEFAULT_TAX_RATE};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Sales tax rate applied to the cart subtotal.
    pub tax_rate: Decimal,
    /// Express shipping cost; standard shipping is free.
    pub express_shipping_cost: Decimal,
    /// Currency orders are charged in.
    pub currency: CurrencyCode,
    /// Latency the simulated gateway sleeps per call.
    pub gateway_latency: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            express_shipping_cost: DEFAULT_EXPRESS_SHIPPING_COST,
            currency: CurrencyCode::ETB,
            gateway_latency: Duration::from_secs(1),
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    /// Every variable is optional; missing ones fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let tax_rate = parse_env("CHECKOUT_TAX_RATE", defaults.tax_rate)?;
        let express_shipping_cost = parse_env(
            "CHECKOUT_EXPRESS_SHIPPING_COST",
            defaults.express_shipping_cost,
        )?;
        let currency = parse_env("CHECKOUT_CURRENCY", defaults.currency)?;
        let latency_ms = parse_env(
            "CHECKOUT_GATEWAY_LATENCY_MS",
            defaults.gateway_latency.as_millis().try_into().unwrap_or(u64::MAX),
        )?;

        Ok(Self {
            tax_rate,
            express_shipping_cost,
            currency,
            gateway_latency: Duration::from_millis(latency_ms),
        })
    }
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}
